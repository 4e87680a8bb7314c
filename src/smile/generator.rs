// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Streaming Smile generator.
//!
//! Tokens are assembled in an internal buffer and pushed to the writer on
//! `flush` and `close`. The generator tracks open arrays and objects so
//! unbalanced ends are refused and `close` can finish whatever is still
//! open. Values are accepted directly inside an object scope; property names
//! are not part of this write API.

use std::collections::HashMap;
use std::io::{Read, Write};

use super::encoding::{
    encode_7bit, encode_7bit_with_length, encode_f32_bits, encode_f64_bits, encode_vint,
    zigzag32, zigzag64,
};
use super::header::*;
use crate::generator::{
    BigDecimal, BigInteger, GenerateError, Generator, Result, SerializedString,
};

/// Chunk size when pulling binary payloads from a reader
const READ_CHUNK: usize = 8 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Array,
    Object,
}

impl Scope {
    fn end_token(self) -> u8 {
        match self {
            Scope::Array => TOKEN_END_ARRAY,
            Scope::Object => TOKEN_END_OBJECT,
        }
    }
}

/// Short string values seen so far and the back-reference index of each.
#[derive(Debug, Default)]
struct SharedValues {
    indexes: HashMap<Vec<u8>, usize>,
    /// Index the next new string takes, counting strings left out of `indexes`
    next: usize,
}

impl SharedValues {
    fn get(&self, bytes: &[u8]) -> Option<usize> {
        self.indexes.get(bytes).copied()
    }

    /// Count a newly written string. Indexes whose low byte would be 0xFE or
    /// 0xFF are used up but never referenced.
    fn remember(&mut self, bytes: &[u8]) {
        if self.next >= MAX_SHARED_STRING_VALUES {
            self.indexes.clear();
            self.next = 0;
        }
        let index = self.next;
        self.next += 1;
        if is_valid_back_reference(index) {
            self.indexes.insert(bytes.to_vec(), index);
        }
    }
}

fn is_valid_back_reference(index: usize) -> bool {
    index < MAX_SHARED_STRING_VALUES && (index & 0xFF) < 0xFE
}

/// Smile encoder bound to one writer.
#[derive(Debug)]
pub struct SmileGenerator<W: Write> {
    out: W,
    buf: Vec<u8>,
    features: FeatureFlags,
    scopes: Vec<Scope>,
    /// `Some` only when shared string values were declared in the header
    shared_values: Option<SharedValues>,
    closed: bool,
}

impl<W: Write> SmileGenerator<W> {
    /// Create a generator and write the header if `WriteHeader` is set.
    ///
    /// Shared string values are only used when they were enabled here,
    /// because the header is the decoder's only hint that back-references
    /// may appear.
    pub fn new(out: W, features: FeatureFlags) -> Self {
        let shared_values = features
            .contains(Feature::CheckSharedStringValues)
            .then(SharedValues::default);
        let mut generator = Self {
            out,
            buf: Vec::with_capacity(256),
            features,
            scopes: Vec::new(),
            shared_values,
            closed: false,
        };
        if features.contains(Feature::WriteHeader) {
            generator.buf.extend_from_slice(&SIGNATURE);
            generator.buf.push(features.header_byte());
        }
        generator
    }

    /// Current nesting depth of open arrays and objects.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Give back the writer. Unflushed bytes are dropped.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn check_open(&self, what: &str) -> Result<()> {
        if self.closed {
            return Err(GenerateError::InvalidState(format!(
                "cannot {} after the generator was closed",
                what
            )));
        }
        Ok(())
    }

    fn end_scope(&mut self, expected: Scope) -> Result<()> {
        match self.scopes.last() {
            Some(&scope) if scope == expected => {
                self.scopes.pop();
                self.buf.push(expected.end_token());
                Ok(())
            }
            current => Err(GenerateError::InvalidState(format!(
                "cannot end {:?}, current scope is {:?}",
                expected, current
            ))),
        }
    }

    fn write_small_or_int(&mut self, value: i32) {
        if (-16..=15).contains(&value) {
            self.buf.push(TOKEN_SMALL_INT + zigzag32(value) as u8);
        } else {
            self.buf.push(TOKEN_INT32);
            encode_vint(u64::from(zigzag32(value)), &mut self.buf);
        }
    }

    fn write_long_value(&mut self, value: i64) {
        match i32::try_from(value) {
            Ok(v) => self.write_small_or_int(v),
            Err(_) => {
                self.buf.push(TOKEN_INT64);
                encode_vint(zigzag64(value), &mut self.buf);
            }
        }
    }

    fn write_double_value(&mut self, value: f64) {
        self.buf.push(TOKEN_FLOAT64);
        encode_f64_bits(value, &mut self.buf);
    }

    /// Write UTF-8 bytes as a string value, choosing the token by byte
    /// length and whether every byte is ASCII. The bytes are trusted.
    fn write_utf8_value(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            self.buf.push(TOKEN_EMPTY_STRING);
            return Ok(());
        }
        if bytes.len() <= MAX_SHARED_STRING_LENGTH_BYTES && self.try_shared_reference(bytes)? {
            return Ok(());
        }

        let len = bytes.len();
        let ascii = bytes.is_ascii();
        match (ascii, len) {
            (true, 1..=MAX_TINY_ASCII) => self.buf.push(TOKEN_TINY_ASCII + (len - 1) as u8),
            (true, _) if len <= MAX_SHORT_ASCII => {
                self.buf.push(TOKEN_SHORT_ASCII + (len - MAX_TINY_ASCII - 1) as u8)
            }
            (false, 2..=MAX_TINY_UNICODE) => self.buf.push(TOKEN_TINY_UNICODE + (len - 2) as u8),
            (false, _) if (MAX_TINY_UNICODE + 1..=MAX_SHORT_UNICODE).contains(&len) => self
                .buf
                .push(TOKEN_SHORT_UNICODE + (len - MAX_TINY_UNICODE - 1) as u8),
            _ => {
                self.buf.push(if ascii {
                    TOKEN_LONG_ASCII
                } else {
                    TOKEN_LONG_UNICODE
                });
                self.buf.extend_from_slice(bytes);
                self.buf.push(BYTE_END_OF_STRING);
                return Ok(());
            }
        }
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    /// Emit a back-reference if `bytes` was written before, otherwise
    /// remember it. Returns true when a reference was written.
    fn try_shared_reference(&mut self, bytes: &[u8]) -> Result<bool> {
        let Some(table) = self.shared_values.as_mut() else {
            return Ok(false);
        };
        if let Some(index) = table.get(bytes) {
            write_shared_reference(&mut self.buf, index)?;
            return Ok(true);
        }
        table.remember(bytes);
        Ok(false)
    }
}

fn write_shared_reference(buf: &mut Vec<u8>, index: usize) -> Result<()> {
    if index < SHORT_SHARED_REF_LIMIT {
        buf.push((index + 1) as u8);
        return Ok(());
    }
    if !is_valid_back_reference(index) {
        return Err(GenerateError::Internal(format!(
            "shared string index {} is not a valid back-reference",
            index
        )));
    }
    buf.push(TOKEN_SHARED_STRING_LONG | (index >> 8) as u8);
    buf.push((index & 0xFF) as u8);
    Ok(())
}

impl<W: Write> Generator for SmileGenerator<W> {
    type Feature = Feature;

    fn configure(&mut self, feature: Feature, enabled: bool) -> Result<()> {
        self.features.set(feature, enabled);
        Ok(())
    }

    fn is_enabled(&self, feature: Feature) -> bool {
        self.features.contains(feature)
    }

    fn write_start_object(&mut self) -> Result<()> {
        self.check_open("start an object")?;
        self.scopes.push(Scope::Object);
        self.buf.push(TOKEN_START_OBJECT);
        Ok(())
    }

    fn write_end_object(&mut self) -> Result<()> {
        self.check_open("end an object")?;
        self.end_scope(Scope::Object)
    }

    fn write_raw_byte(&mut self, byte: u8) -> Result<()> {
        self.check_open("write raw bytes")?;
        self.buf.push(byte);
        Ok(())
    }

    fn write_raw_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_open("write raw bytes")?;
        self.buf.extend_from_slice(bytes);
        Ok(())
    }

    fn write_i32_array(&mut self, values: &[i32]) -> Result<()> {
        self.check_open("write an array")?;
        self.buf.push(TOKEN_START_ARRAY);
        for &v in values {
            self.write_small_or_int(v);
        }
        self.buf.push(TOKEN_END_ARRAY);
        Ok(())
    }

    fn write_i64_array(&mut self, values: &[i64]) -> Result<()> {
        self.check_open("write an array")?;
        self.buf.push(TOKEN_START_ARRAY);
        for &v in values {
            self.write_long_value(v);
        }
        self.buf.push(TOKEN_END_ARRAY);
        Ok(())
    }

    fn write_f64_array(&mut self, values: &[f64]) -> Result<()> {
        self.check_open("write an array")?;
        self.buf.push(TOKEN_START_ARRAY);
        for &v in values {
            self.write_double_value(v);
        }
        self.buf.push(TOKEN_END_ARRAY);
        Ok(())
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.check_open("write a string")?;
        self.write_utf8_value(value.as_bytes())
    }

    fn write_chars(&mut self, chars: &[char]) -> Result<()> {
        self.check_open("write a string")?;
        let value: String = chars.iter().collect();
        self.write_utf8_value(value.as_bytes())
    }

    fn write_serialized(&mut self, value: &SerializedString) -> Result<()> {
        self.check_open("write a string")?;
        self.write_utf8_value(value.as_utf8())
    }

    fn write_raw_utf8_string(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_open("write a string")?;
        self.write_utf8_value(bytes)
    }

    fn write_utf8_string(&mut self, bytes: &[u8]) -> Result<()> {
        self.check_open("write a string")?;
        match std::str::from_utf8(bytes) {
            Ok(_) => self.write_utf8_value(bytes),
            Err(_) if self.features.contains(Feature::LenientUtfEncoding) => {
                let repaired = String::from_utf8_lossy(bytes).into_owned();
                self.write_utf8_value(repaired.as_bytes())
            }
            Err(e) => Err(GenerateError::Malformed(format!(
                "invalid UTF-8 at byte {}",
                e.valid_up_to()
            ))),
        }
    }

    fn write_binary(&mut self, reader: &mut dyn Read, len: usize) -> Result<()> {
        self.check_open("write binary")?;
        let mut data = Vec::with_capacity(len.min(READ_CHUNK));
        let mut chunk = [0u8; READ_CHUNK];
        while data.len() < len {
            let want = (len - data.len()).min(READ_CHUNK);
            let got = reader.read(&mut chunk[..want])?;
            if got == 0 {
                return Err(GenerateError::InvalidArgument(format!(
                    "too few bytes available: missing {} bytes (out of {})",
                    len - data.len(),
                    len
                )));
            }
            data.extend_from_slice(&chunk[..got]);
        }

        if self.features.contains(Feature::EncodeBinaryAs7Bit) {
            self.buf.push(TOKEN_BINARY_7BIT);
            encode_7bit_with_length(&data, &mut self.buf);
        } else {
            self.buf.push(TOKEN_RAW_BINARY);
            encode_vint(data.len() as u64, &mut self.buf);
            self.buf.extend_from_slice(&data);
        }
        Ok(())
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.check_open("write a boolean")?;
        self.buf.push(if value { TOKEN_TRUE } else { TOKEN_FALSE });
        Ok(())
    }

    fn write_null(&mut self) -> Result<()> {
        self.check_open("write a null")?;
        self.buf.push(TOKEN_NULL);
        Ok(())
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.check_open("write a number")?;
        self.write_small_or_int(value);
        Ok(())
    }

    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.check_open("write a number")?;
        self.write_long_value(value);
        Ok(())
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        self.check_open("write a number")?;
        self.write_double_value(value);
        Ok(())
    }

    fn write_f32(&mut self, value: f32) -> Result<()> {
        self.check_open("write a number")?;
        self.buf.push(TOKEN_FLOAT32);
        encode_f32_bits(value, &mut self.buf);
        Ok(())
    }

    fn write_big_decimal(&mut self, value: &BigDecimal) -> Result<()> {
        self.check_open("write a number")?;
        self.buf.push(TOKEN_BIG_DECIMAL);
        encode_vint(u64::from(zigzag32(value.scale())), &mut self.buf);
        encode_7bit_with_length(value.unscaled().to_signed_bytes_be(), &mut self.buf);
        Ok(())
    }

    fn write_big_integer(&mut self, value: &BigInteger) -> Result<()> {
        self.check_open("write a number")?;
        self.buf.push(TOKEN_BIG_INTEGER);
        encode_7bit_with_length(value.to_signed_bytes_be(), &mut self.buf);
        Ok(())
    }

    fn write_number_str(&mut self, encoded: &str) -> Result<()> {
        self.check_open("write a number")?;
        let trimmed = encoded.trim();
        if let Ok(v) = trimmed.parse::<i64>() {
            self.write_long_value(v);
        } else if let Ok(v) = trimmed.parse::<f64>() {
            self.write_double_value(v);
        } else {
            // Not a number we can encode natively: keep the text
            self.write_utf8_value(encoded.as_bytes())?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if !self.buf.is_empty() {
            self.out.write_all(&self.buf)?;
            self.buf.clear();
        }
        self.out.flush()?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        while let Some(scope) = self.scopes.pop() {
            self.buf.push(scope.end_token());
        }
        if self.features.contains(Feature::WriteEndMarker) {
            self.buf.push(BYTE_END_OF_CONTENT);
        }
        self.flush()
    }

    fn is_closed(&self) -> bool {
        self.closed
    }
}
