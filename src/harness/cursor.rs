// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Total, order-dependent reads from the fuzzer's byte buffer.
//!
//! `arbitrary::Unstructured` already consumes bytes deterministically and
//! pads with zeros once the buffer runs dry. This wrapper removes the
//! `Result` from every call: the harness must behave identically for a given
//! buffer, and an empty buffer is an input like any other.

use arbitrary::Unstructured;
use std::ops::RangeInclusive;

/// Cursor over one fuzz input.
pub struct FuzzInput<'a> {
    u: Unstructured<'a>,
}

impl<'a> FuzzInput<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            u: Unstructured::new(data),
        }
    }

    /// Bytes not consumed yet.
    pub fn remaining(&self) -> usize {
        self.u.len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.u.is_empty()
    }

    pub fn consume_bool(&mut self) -> bool {
        self.u.arbitrary().unwrap_or(false)
    }

    pub fn consume_byte(&mut self) -> u8 {
        self.u.arbitrary().unwrap_or(0)
    }

    pub fn consume_i32(&mut self) -> i32 {
        self.u.arbitrary().unwrap_or(0)
    }

    pub fn consume_i64(&mut self) -> i64 {
        self.u.arbitrary().unwrap_or(0)
    }

    pub fn consume_f32(&mut self) -> f32 {
        self.u.arbitrary().unwrap_or(0.0)
    }

    pub fn consume_f64(&mut self) -> f64 {
        self.u.arbitrary().unwrap_or(0.0)
    }

    /// Integer in `range`; the lower bound once the buffer is exhausted.
    pub fn int_in_range(&mut self, range: RangeInclusive<u32>) -> u32 {
        let lo = *range.start();
        self.u.int_in_range(range).unwrap_or(lo)
    }

    pub fn consume_i32s(&mut self, count: usize) -> Vec<i32> {
        (0..count).map(|_| self.consume_i32()).collect()
    }

    pub fn consume_i64s(&mut self, count: usize) -> Vec<i64> {
        (0..count).map(|_| self.consume_i64()).collect()
    }

    /// Everything left in the buffer.
    pub fn remaining_bytes(&mut self) -> Vec<u8> {
        let len = self.u.len();
        self.u.bytes(len).map(<[u8]>::to_vec).unwrap_or_default()
    }

    /// Everything left, cut back to its longest valid UTF-8 prefix.
    pub fn remaining_string(&mut self) -> String {
        let bytes = self.remaining_bytes();
        match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => {
                let valid = e.utf8_error().valid_up_to();
                let mut bytes = e.into_bytes();
                bytes.truncate(valid);
                // Prefix is valid by construction
                String::from_utf8(bytes).unwrap_or_default()
            }
        }
    }

    /// One element of `choices`, or `None` if there is nothing to choose from.
    pub fn pick<T: Copy>(&mut self, choices: &[T]) -> Option<T> {
        let last = u32::try_from(choices.len().checked_sub(1)?).unwrap_or(u32::MAX);
        let index = self.int_in_range(0..=last) as usize;
        choices.get(index).copied()
    }
}
