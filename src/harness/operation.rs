// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The write-operation menu.
//!
//! One variant per selector value in `1..=20`. Drawing a variant consumes the
//! selector and then exactly the parameters that variant needs, so the bytes
//! after the selector mean something different for every row. Array lengths
//! are drawn from `1..=5`; nothing here loops on an unbounded count.

use std::fmt;

use super::cursor::FuzzInput;
use crate::generator::{BigDecimal, BigInteger, Generator, Result, SerializedString};

/// Range the selector is drawn from
pub const SELECTOR_MIN: u32 = 1;
pub const SELECTOR_MAX: u32 = 20;

/// Range array lengths are drawn from
pub const MAX_ARRAY_LEN: u32 = 5;

/// One fully-parameterised call on a generator.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    RawByte(u8),
    RawBytes(Vec<u8>),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
    DoubleArray(Vec<f64>),
    String(String),
    Chars(Vec<char>),
    Serialized(SerializedString),
    RawUtf8(Vec<u8>),
    Utf8(Vec<u8>),
    Binary(Vec<u8>),
    Boolean(bool),
    Null,
    Int(i32),
    Long(i64),
    Double(f64),
    Float(f32),
    BigDecimal(BigDecimal),
    BigInteger(BigInteger),
    NumberString(String),
}

impl Operation {
    /// Draw the selector, then the parameters of the selected variant.
    pub fn draw(input: &mut FuzzInput<'_>) -> Self {
        let selector = input.int_in_range(SELECTOR_MIN..=SELECTOR_MAX);
        Self::draw_params(selector, input)
    }

    /// Parameters for a known selector. Out-of-range selectors are clamped,
    /// which `draw` never produces.
    pub fn draw_params(selector: u32, input: &mut FuzzInput<'_>) -> Self {
        match selector.clamp(SELECTOR_MIN, SELECTOR_MAX) {
            1 => Operation::RawByte(input.consume_byte()),
            2 => Operation::RawBytes(input.remaining_bytes()),
            3 => {
                let len = array_len(input);
                Operation::IntArray(input.consume_i32s(len))
            }
            4 => {
                let len = array_len(input);
                Operation::LongArray(input.consume_i64s(len))
            }
            5 => {
                let len = array_len(input);
                Operation::DoubleArray((0..len).map(|_| input.consume_f64()).collect())
            }
            6 => Operation::String(input.remaining_string()),
            7 => Operation::Chars(input.remaining_string().chars().collect()),
            8 => Operation::Serialized(SerializedString::new(input.remaining_string())),
            9 => Operation::RawUtf8(input.remaining_bytes()),
            10 => Operation::Utf8(input.remaining_bytes()),
            11 => Operation::Binary(input.remaining_bytes()),
            12 => Operation::Boolean(input.consume_bool()),
            13 => Operation::Null,
            14 => Operation::Int(input.consume_i32()),
            15 => Operation::Long(input.consume_i64()),
            16 => Operation::Double(input.consume_f64()),
            17 => Operation::Float(input.consume_f32()),
            18 => Operation::BigDecimal(BigDecimal::from(input.consume_i64())),
            19 => Operation::BigInteger(BigInteger::from(input.consume_i64())),
            _ => Operation::NumberString(input.remaining_string()),
        }
    }

    /// Selector value that maps to this variant.
    pub fn selector(&self) -> u32 {
        match self {
            Operation::RawByte(_) => 1,
            Operation::RawBytes(_) => 2,
            Operation::IntArray(_) => 3,
            Operation::LongArray(_) => 4,
            Operation::DoubleArray(_) => 5,
            Operation::String(_) => 6,
            Operation::Chars(_) => 7,
            Operation::Serialized(_) => 8,
            Operation::RawUtf8(_) => 9,
            Operation::Utf8(_) => 10,
            Operation::Binary(_) => 11,
            Operation::Boolean(_) => 12,
            Operation::Null => 13,
            Operation::Int(_) => 14,
            Operation::Long(_) => 15,
            Operation::Double(_) => 16,
            Operation::Float(_) => 17,
            Operation::BigDecimal(_) => 18,
            Operation::BigInteger(_) => 19,
            Operation::NumberString(_) => 20,
        }
    }

    /// Stable kebab-case name, used in reports and seed file names.
    pub fn name(&self) -> &'static str {
        selector_name(self.selector())
    }

    /// Invoke the one generator call this variant stands for.
    pub fn apply<G: Generator>(&self, generator: &mut G) -> Result<()> {
        match self {
            Operation::RawByte(b) => generator.write_raw_byte(*b),
            Operation::RawBytes(bytes) => generator.write_raw_bytes(bytes),
            Operation::IntArray(values) => generator.write_i32_array(values),
            Operation::LongArray(values) => generator.write_i64_array(values),
            Operation::DoubleArray(values) => generator.write_f64_array(values),
            Operation::String(s) => generator.write_string(s),
            Operation::Chars(chars) => generator.write_chars(chars),
            Operation::Serialized(s) => generator.write_serialized(s),
            Operation::RawUtf8(bytes) => generator.write_raw_utf8_string(bytes),
            Operation::Utf8(bytes) => generator.write_utf8_string(bytes),
            Operation::Binary(bytes) => {
                let mut reader: &[u8] = bytes;
                generator.write_binary(&mut reader, bytes.len())
            }
            Operation::Boolean(b) => generator.write_bool(*b),
            Operation::Null => generator.write_null(),
            Operation::Int(v) => generator.write_i32(*v),
            Operation::Long(v) => generator.write_i64(*v),
            Operation::Double(v) => generator.write_f64(*v),
            Operation::Float(v) => generator.write_f32(*v),
            Operation::BigDecimal(v) => generator.write_big_decimal(v),
            Operation::BigInteger(v) => generator.write_big_integer(v),
            Operation::NumberString(s) => generator.write_number_str(s),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::RawByte(b) => write!(f, "raw-byte 0x{:02x}", b),
            Operation::RawBytes(b) | Operation::RawUtf8(b) | Operation::Utf8(b) | Operation::Binary(b) => {
                write!(f, "{} ({} bytes)", self.name(), b.len())
            }
            Operation::IntArray(v) => write!(f, "int-array {:?}", v),
            Operation::LongArray(v) => write!(f, "long-array {:?}", v),
            Operation::DoubleArray(v) => write!(f, "double-array {:?}", v),
            Operation::String(s) | Operation::NumberString(s) => write!(f, "{} {:?}", self.name(), s),
            Operation::Chars(c) => write!(f, "chars ({} chars)", c.len()),
            Operation::Serialized(s) => write!(f, "serialized-string {:?}", s.as_str()),
            Operation::Boolean(b) => write!(f, "boolean {}", b),
            Operation::Null => write!(f, "null"),
            Operation::Int(v) => write!(f, "int {}", v),
            Operation::Long(v) => write!(f, "long {}", v),
            Operation::Double(v) => write!(f, "double {}", v),
            Operation::Float(v) => write!(f, "float {}", v),
            Operation::BigDecimal(v) => write!(f, "big-decimal {}", v),
            Operation::BigInteger(v) => write!(f, "big-integer {}", v),
        }
    }
}

/// Name of the variant a selector maps to.
pub fn selector_name(selector: u32) -> &'static str {
    match selector.clamp(SELECTOR_MIN, SELECTOR_MAX) {
        1 => "raw-byte",
        2 => "raw-bytes",
        3 => "int-array",
        4 => "long-array",
        5 => "double-array",
        6 => "string",
        7 => "chars",
        8 => "serialized-string",
        9 => "raw-utf8-string",
        10 => "utf8-string",
        11 => "binary",
        12 => "boolean",
        13 => "null",
        14 => "int",
        15 => "long",
        16 => "double",
        17 => "float",
        18 => "big-decimal",
        19 => "big-integer",
        _ => "number-string",
    }
}

fn array_len(input: &mut FuzzInput<'_>) -> usize {
    input.int_in_range(1..=MAX_ARRAY_LEN) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_roundtrip_for_every_row() {
        for selector in SELECTOR_MIN..=SELECTOR_MAX {
            let op = Operation::draw_params(selector, &mut FuzzInput::new(&[]));
            assert_eq!(op.selector(), selector);
            assert_eq!(op.name(), selector_name(selector));
        }
    }

    #[test]
    fn test_draw_reads_selector_first() {
        // 12 % 20 + 1 = 13
        let op = Operation::draw(&mut FuzzInput::new(&[12]));
        assert_eq!(op, Operation::Null);
    }

    #[test]
    fn test_array_lengths_stay_bounded() {
        for len_byte in 0..=255u8 {
            let data = [2, len_byte];
            let op = Operation::draw(&mut FuzzInput::new(&data));
            match op {
                Operation::IntArray(v) => assert!((1..=5).contains(&v.len())),
                other => panic!("expected int-array, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_exhausted_parameters_use_defaults() {
        let op = Operation::draw_params(18, &mut FuzzInput::new(&[]));
        assert_eq!(op, Operation::BigDecimal(BigDecimal::from(0)));
        let op = Operation::draw_params(5, &mut FuzzInput::new(&[]));
        assert_eq!(op, Operation::DoubleArray(vec![0.0]));
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = (SELECTOR_MIN..=SELECTOR_MAX).map(selector_name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 20);
    }
}
