// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Smile: binary JSON, the generator under test.
//!
//! Smile is JSON's data model with a byte-oriented encoding: one token byte
//! per value, lengths folded into the token for short strings, numbers as
//! zigzag VInts or 7-bit groups, and optional back-references for repeated
//! strings. The format reserves 0xF8-0xFF for structure and markers, which
//! is why almost every payload byte is squeezed into 7 bits.
//!
//! This is the concrete encoder the harness fuzzes. It is deliberately
//! small and does not try to be a complete Jackson replacement; it exists to
//! give the harness real state to push around: a header whose declarations
//! are fixed at construction, features that can be flipped mid-stream, a
//! scope stack, a back-reference table, and readers that can run dry.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ HEADER (optional, 4 bytes)               │
//! │   ":)\n"                                 │
//! │   flags: version << 4 | raw-binary       │
//! │          | shared-values | shared-names │
//! ├──────────────────────────────────────────┤
//! │ VALUES (token byte + payload)            │
//! ├──────────────────────────────────────────┤
//! │ END MARKER (optional, 0xFF)              │
//! └──────────────────────────────────────────┘
//! ```

mod encoding;
mod factory;
mod generator;
mod header;

pub use encoding::{
    encode_7bit, encode_7bit_with_length, encode_f32_bits, encode_f64_bits, encode_vint,
    packed_7bit_len, zigzag32, zigzag64, MAX_VINT_BYTES,
};
pub use factory::{SmileFactory, SmileFactoryBuilder};
pub use generator::SmileGenerator;
pub use header::*;
