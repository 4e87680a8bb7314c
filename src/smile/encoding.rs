// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Smile encoding primitives: zigzag, VInt, and 7-bit packing.
//!
//! Smile keeps every byte after a token out of the 0xF8-0xFF range it
//! reserves for structure and markers. Numbers and binary are therefore
//! packed into 7-bit groups, and the VInt flags its last byte with the high
//! bit (carrying only 6 payload bits) instead of flagging continuation the
//! way LEB128 does.
//!
//! # References
//!
//! - **Zigzag**: signed-to-unsigned mapping from Protocol Buffers, so small
//!   negative numbers stay small.
//! - **Smile format specification**: <https://github.com/FasterXML/smile-format-specification>

/// Maximum VInt bytes for a u64 (6 bits in the last byte, 7 in the rest)
pub const MAX_VINT_BYTES: usize = 10;

// ============================================================================
// ZIGZAG
// ============================================================================

pub fn zigzag32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

pub fn zigzag64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

// ============================================================================
// VINT
// ============================================================================

/// Encode an unsigned VInt: 7-bit groups big-endian, last byte 0x80 | 6 bits.
pub fn encode_vint(mut value: u64, buf: &mut Vec<u8>) {
    let mut tmp = [0u8; MAX_VINT_BYTES];
    let mut pos = MAX_VINT_BYTES - 1;
    tmp[pos] = 0x80 | (value & 0x3F) as u8;
    value >>= 6;
    while value != 0 {
        pos -= 1;
        tmp[pos] = (value & 0x7F) as u8;
        value >>= 7;
    }
    buf.extend_from_slice(&tmp[pos..]);
}

// ============================================================================
// 7-BIT PACKING
// ============================================================================

/// Pack bytes into 7-bit groups, most significant bits first.
///
/// Every 7 input bytes become 8 output bytes. A trailing partial group is
/// written right-aligned, so the decoder knows its width from the length.
pub fn encode_7bit(data: &[u8], buf: &mut Vec<u8>) {
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    for &byte in data {
        acc = (acc << 8) | u32::from(byte);
        bits += 8;
        while bits >= 7 {
            bits -= 7;
            buf.push(((acc >> bits) & 0x7F) as u8);
        }
        acc &= (1 << bits) - 1;
    }
    if bits > 0 {
        buf.push(acc as u8);
    }
}

/// VInt length prefix followed by the 7-bit packed bytes.
pub fn encode_7bit_with_length(data: &[u8], buf: &mut Vec<u8>) {
    encode_vint(data.len() as u64, buf);
    encode_7bit(data, buf);
}

/// Output size of `encode_7bit` for `len` input bytes.
pub fn packed_7bit_len(len: usize) -> usize {
    (len * 8).div_ceil(7)
}

// ============================================================================
// FLOATS
// ============================================================================

/// IEEE bits of a float as 5 bytes of 7 bits (top group carries 4 bits).
pub fn encode_f32_bits(value: f32, buf: &mut Vec<u8>) {
    let bits = value.to_bits();
    for group in (0..5).rev() {
        buf.push(((bits >> (7 * group)) & 0x7F) as u8);
    }
}

/// IEEE bits of a double as 10 bytes of 7 bits (top group carries 1 bit).
pub fn encode_f64_bits(value: f64, buf: &mut Vec<u8>) {
    let bits = value.to_bits();
    for group in (0..10).rev() {
        buf.push(((bits >> (7 * group)) & 0x7F) as u8);
    }
}
