// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Arbitrary-precision number values accepted by the write API.
//!
//! Generators only need the wire representation: a minimal big-endian two's
//! complement magnitude, plus a scale for decimals. Nothing here does
//! arithmetic.

use std::fmt;

/// Signed integer of any width, stored as minimal two's complement bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigInteger {
    bytes: Vec<u8>,
}

impl BigInteger {
    /// Build from big-endian two's complement bytes. Redundant sign bytes
    /// are stripped; an empty slice is zero.
    pub fn from_signed_bytes_be(bytes: &[u8]) -> Self {
        if bytes.is_empty() {
            return Self { bytes: vec![0] };
        }
        let mut start = 0;
        while start + 1 < bytes.len() {
            let (lead, next) = (bytes[start], bytes[start + 1]);
            let redundant = (lead == 0x00 && next & 0x80 == 0) || (lead == 0xFF && next & 0x80 != 0);
            if !redundant {
                break;
            }
            start += 1;
        }
        Self {
            bytes: bytes[start..].to_vec(),
        }
    }

    /// Minimal big-endian two's complement bytes (at least one byte).
    pub fn to_signed_bytes_be(&self) -> &[u8] {
        &self.bytes
    }

    pub fn is_negative(&self) -> bool {
        self.bytes[0] & 0x80 != 0
    }

    /// The value as `i64`, if it fits.
    pub fn to_i64(&self) -> Option<i64> {
        if self.bytes.len() > 8 {
            return None;
        }
        let fill = if self.is_negative() { 0xFF } else { 0x00 };
        let mut buf = [fill; 8];
        buf[8 - self.bytes.len()..].copy_from_slice(&self.bytes);
        Some(i64::from_be_bytes(buf))
    }
}

impl From<i64> for BigInteger {
    fn from(value: i64) -> Self {
        Self::from_signed_bytes_be(&value.to_be_bytes())
    }
}

impl fmt::Display for BigInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_i64() {
            Some(v) => write!(f, "{}", v),
            None => {
                write!(f, "0x")?;
                for b in &self.bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// Decimal value `unscaled * 10^-scale`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BigDecimal {
    unscaled: BigInteger,
    scale: i32,
}

impl BigDecimal {
    pub fn new(unscaled: BigInteger, scale: i32) -> Self {
        Self { unscaled, scale }
    }

    pub fn unscaled(&self) -> &BigInteger {
        &self.unscaled
    }

    pub fn scale(&self) -> i32 {
        self.scale
    }
}

/// Same as a long-valued decimal constructor: scale zero.
impl From<i64> for BigDecimal {
    fn from(value: i64) -> Self {
        Self::new(BigInteger::from(value), 0)
    }
}

impl fmt::Display for BigDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}E{}", self.unscaled, -i64::from(self.scale))
    }
}
