// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The write-API contract the harness drives.
//!
//! Three traits, three lifetimes. A `FactoryBuilder` collects feature
//! toggles and is consumed by `build`. The resulting `GeneratorFactory` can
//! stamp out generators bound to an `OutputSink`. A `Generator` is single
//! use: configured, written to, flushed, and closed exactly once.
//!
//! The harness never names a concrete generator. The Smile encoder in
//! [`crate::smile`] is one implementation, [`crate::trace`] wraps any
//! implementation to record calls.
//!
//! ```text
//! FactoryBuilder ──build──▶ GeneratorFactory ──create_generator(sink)──▶ Generator
//!   enable/disable                                                        configure
//!   features()                                                            write_*
//!                                                                         flush/close
//! ```

mod error;
mod number;

use std::cell::RefCell;
use std::fmt;
use std::io::{self, Read, Write};
use std::rc::Rc;

pub use error::{GenerateError, Result};
pub use number::{BigDecimal, BigInteger};

// ============================================================================
// COLLABORATOR TRAITS
// ============================================================================

/// Build-time configuration of a generator factory.
pub trait FactoryBuilder: Sized {
    type Feature: Copy + fmt::Debug + 'static;
    type Factory: GeneratorFactory<Feature = Self::Feature>;

    /// Every feature the generator recognises, in a fixed order.
    fn features() -> &'static [Self::Feature];

    fn enable(self, feature: Self::Feature) -> Self;
    fn disable(self, feature: Self::Feature) -> Self;
    fn build(self) -> Self::Factory;
}

/// Creates generators that share the factory's feature configuration.
pub trait GeneratorFactory {
    type Feature: Copy + fmt::Debug + 'static;
    type Generator: Generator<Feature = Self::Feature>;

    fn create_generator(&self, sink: OutputSink) -> Result<Self::Generator>;
}

/// Streaming writer of one JSON-like document.
///
/// Every call can fail. Callers must reach `close` even after a failure so
/// the handle does not outlive the invocation that opened it.
pub trait Generator {
    type Feature: Copy + fmt::Debug + 'static;

    /// Toggle a feature on the live generator.
    fn configure(&mut self, feature: Self::Feature, enabled: bool) -> Result<()>;
    fn is_enabled(&self, feature: Self::Feature) -> bool;

    fn write_start_object(&mut self) -> Result<()>;
    fn write_end_object(&mut self) -> Result<()>;

    /// Single byte straight to the output, no token.
    fn write_raw_byte(&mut self, byte: u8) -> Result<()>;
    /// Bytes straight to the output, no token.
    fn write_raw_bytes(&mut self, bytes: &[u8]) -> Result<()>;

    fn write_i32_array(&mut self, values: &[i32]) -> Result<()>;
    fn write_i64_array(&mut self, values: &[i64]) -> Result<()>;
    fn write_f64_array(&mut self, values: &[f64]) -> Result<()>;

    fn write_string(&mut self, value: &str) -> Result<()>;
    fn write_chars(&mut self, chars: &[char]) -> Result<()>;
    fn write_serialized(&mut self, value: &SerializedString) -> Result<()>;
    /// UTF-8 bytes written as a string value without validation.
    fn write_raw_utf8_string(&mut self, bytes: &[u8]) -> Result<()>;
    /// UTF-8 bytes written as a string value after validation.
    fn write_utf8_string(&mut self, bytes: &[u8]) -> Result<()>;
    /// Binary value of exactly `len` bytes pulled from `reader`.
    fn write_binary(&mut self, reader: &mut dyn Read, len: usize) -> Result<()>;

    fn write_bool(&mut self, value: bool) -> Result<()>;
    fn write_null(&mut self) -> Result<()>;
    fn write_i32(&mut self, value: i32) -> Result<()>;
    fn write_i64(&mut self, value: i64) -> Result<()>;
    fn write_f64(&mut self, value: f64) -> Result<()>;
    fn write_f32(&mut self, value: f32) -> Result<()>;
    fn write_big_decimal(&mut self, value: &BigDecimal) -> Result<()>;
    fn write_big_integer(&mut self, value: &BigInteger) -> Result<()>;
    /// Number given in its textual form.
    fn write_number_str(&mut self, encoded: &str) -> Result<()>;

    fn flush(&mut self) -> Result<()>;
    /// Terminal. Must be idempotent.
    fn close(&mut self) -> Result<()>;
    fn is_closed(&self) -> bool;
}

// ============================================================================
// OUTPUT SINK
// ============================================================================

/// In-memory growable byte buffer handed to a generator.
///
/// Clones share the buffer, so the caller can keep a handle and read what
/// the generator wrote after the generator is gone. `!Send`:
/// one sink belongs to one invocation on one thread.
#[derive(Debug, Clone, Default)]
pub struct OutputSink {
    buf: Rc<RefCell<Vec<u8>>>,
}

impl OutputSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.borrow().is_empty()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.buf.borrow().clone()
    }

    /// Move the bytes out, leaving the sink empty.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.buf.borrow_mut())
    }
}

impl Write for OutputSink {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        self.buf.borrow_mut().extend_from_slice(bytes);
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ============================================================================
// SERIALIZED STRING
// ============================================================================

/// String whose UTF-8 encoding is computed once and reused.
///
/// Generators can write it without re-encoding or re-validating, the same
/// way a pre-serialized field name or constant would be.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SerializedString {
    value: Box<str>,
    char_len: usize,
}

impl SerializedString {
    pub fn new(value: impl Into<Box<str>>) -> Self {
        let value = value.into();
        let char_len = value.chars().count();
        Self { value, char_len }
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn as_utf8(&self) -> &[u8] {
        self.value.as_bytes()
    }

    /// Length in characters, not bytes.
    pub fn char_len(&self) -> usize {
        self.char_len
    }
}

impl fmt::Display for SerializedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
