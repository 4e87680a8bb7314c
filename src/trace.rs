// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Call recording and fault injection for any generator.
//!
//! `TracedBuilder` wraps a real builder. Everything built from it (factory,
//! generators) appends to one shared `TraceLog`, so after an invocation you
//! can ask exactly which calls happened and in what order. That is how the
//! harness's "exactly one operation, exactly one close" properties are
//! checked, and what `smilefuzz explain` prints.
//!
//! Faults turn a named call into a failure before it reaches the inner
//! generator: either a returned error or a panic. They exist to drive the
//! harness down its classification and cleanup paths on demand.

use std::cell::RefCell;
use std::fmt;
use std::io::Read;
use std::rc::Rc;

use log::warn;

use crate::generator::{
    BigDecimal, BigInteger, FactoryBuilder, GenerateError, Generator, GeneratorFactory,
    OutputSink, Result, SerializedString,
};

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub detail: Option<String>,
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Some(detail) => write!(f, "{}({})", self.method, detail),
            None => write!(f, "{}()", self.method),
        }
    }
}

/// What an injected fault does.
#[derive(Clone, Copy)]
pub enum Fault {
    Error(fn() -> GenerateError),
    Panic,
}

impl fmt::Debug for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fault::Error(make) => write!(f, "Error({})", make().kind()),
            Fault::Panic => write!(f, "Panic"),
        }
    }
}

#[derive(Debug, Default)]
struct TraceState {
    calls: Vec<Call>,
    faults: Vec<(&'static str, Fault)>,
}

/// Shared, ordered record of calls.
#[derive(Debug, Clone, Default)]
pub struct TraceLog {
    state: Rc<RefCell<TraceState>>,
}

impl TraceLog {
    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn call_names(&self) -> Vec<&'static str> {
        self.state.borrow().calls.iter().map(|c| c.method).collect()
    }

    /// How many times `method` was called.
    pub fn count(&self, method: &str) -> usize {
        self.state
            .borrow()
            .calls
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.state.borrow().calls.is_empty()
    }

    /// Record a call that faults never apply to.
    fn note(&self, method: &'static str, detail: Option<String>) {
        self.state.borrow_mut().calls.push(Call { method, detail });
    }

    fn record(&self, method: &'static str, detail: Option<String>) -> Result<()> {
        let fault = {
            let mut state = self.state.borrow_mut();
            state.calls.push(Call { method, detail });
            state
                .faults
                .iter()
                .find(|(m, _)| *m == method)
                .map(|&(_, fault)| fault)
        };
        match fault {
            None => Ok(()),
            Some(Fault::Error(make)) => Err(make()),
            Some(Fault::Panic) => panic!("injected panic in {}", method),
        }
    }
}

// ============================================================================
// BUILDER / FACTORY
// ============================================================================

/// Calls on the builder itself, which cannot carry a fault.
const BUILDER_METHODS: &[&str] = &["enable", "disable", "build"];

/// Builder wrapper that records calls and injects faults.
#[derive(Debug)]
pub struct TracedBuilder<B> {
    inner: B,
    log: TraceLog,
}

impl<B: FactoryBuilder> TracedBuilder<B> {
    pub fn new(inner: B) -> Self {
        Self {
            inner,
            log: TraceLog::default(),
        }
    }

    /// Handle on the log shared by everything this builder produces.
    pub fn log(&self) -> TraceLog {
        self.log.clone()
    }

    /// Make every call named `method` fail with `fault`.
    ///
    /// Builder calls (`enable`, `disable`, `build`) have no error path, so
    /// faults are refused for them: they are recorded but always succeed.
    /// Faults apply from `create_generator` on.
    pub fn with_fault(self, method: &'static str, fault: Fault) -> Self {
        if BUILDER_METHODS.contains(&method) {
            warn!("ignoring {:?} fault on builder call {}", fault, method);
            return self;
        }
        self.log.state.borrow_mut().faults.push((method, fault));
        self
    }

    pub fn failing_on(self, method: &'static str, make: fn() -> GenerateError) -> Self {
        self.with_fault(method, Fault::Error(make))
    }

    pub fn panicking_on(self, method: &'static str) -> Self {
        self.with_fault(method, Fault::Panic)
    }
}

impl<B: FactoryBuilder> FactoryBuilder for TracedBuilder<B> {
    type Feature = B::Feature;
    type Factory = TracedFactory<B::Factory>;

    fn features() -> &'static [Self::Feature] {
        B::features()
    }

    fn enable(self, feature: Self::Feature) -> Self {
        self.log.note("enable", Some(format!("{:?}", feature)));
        Self {
            inner: self.inner.enable(feature),
            log: self.log,
        }
    }

    fn disable(self, feature: Self::Feature) -> Self {
        self.log.note("disable", Some(format!("{:?}", feature)));
        Self {
            inner: self.inner.disable(feature),
            log: self.log,
        }
    }

    fn build(self) -> Self::Factory {
        self.log.note("build", None);
        TracedFactory {
            inner: self.inner.build(),
            log: self.log,
        }
    }
}

#[derive(Debug)]
pub struct TracedFactory<F> {
    inner: F,
    log: TraceLog,
}

impl<F: GeneratorFactory> GeneratorFactory for TracedFactory<F> {
    type Feature = F::Feature;
    type Generator = TracedGenerator<F::Generator>;

    fn create_generator(&self, sink: OutputSink) -> Result<Self::Generator> {
        self.log.record("create_generator", None)?;
        Ok(TracedGenerator {
            inner: self.inner.create_generator(sink)?,
            log: self.log.clone(),
        })
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

#[derive(Debug)]
pub struct TracedGenerator<G> {
    inner: G,
    log: TraceLog,
}

impl<G> TracedGenerator<G> {
    pub fn inner(&self) -> &G {
        &self.inner
    }
}

impl<G: Generator> Generator for TracedGenerator<G> {
    type Feature = G::Feature;

    fn configure(&mut self, feature: Self::Feature, enabled: bool) -> Result<()> {
        self.log
            .record("configure", Some(format!("{:?}, {}", feature, enabled)))?;
        self.inner.configure(feature, enabled)
    }

    fn is_enabled(&self, feature: Self::Feature) -> bool {
        self.inner.is_enabled(feature)
    }

    fn write_start_object(&mut self) -> Result<()> {
        self.log.record("write_start_object", None)?;
        self.inner.write_start_object()
    }

    fn write_end_object(&mut self) -> Result<()> {
        self.log.record("write_end_object", None)?;
        self.inner.write_end_object()
    }

    fn write_raw_byte(&mut self, byte: u8) -> Result<()> {
        self.log
            .record("write_raw_byte", Some(format!("0x{:02x}", byte)))?;
        self.inner.write_raw_byte(byte)
    }

    fn write_raw_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        self.log.record("write_raw_bytes", Some(byte_count(bytes)))?;
        self.inner.write_raw_bytes(bytes)
    }

    fn write_i32_array(&mut self, values: &[i32]) -> Result<()> {
        self.log
            .record("write_i32_array", Some(format!("{:?}", values)))?;
        self.inner.write_i32_array(values)
    }

    fn write_i64_array(&mut self, values: &[i64]) -> Result<()> {
        self.log
            .record("write_i64_array", Some(format!("{:?}", values)))?;
        self.inner.write_i64_array(values)
    }

    fn write_f64_array(&mut self, values: &[f64]) -> Result<()> {
        self.log
            .record("write_f64_array", Some(format!("{:?}", values)))?;
        self.inner.write_f64_array(values)
    }

    fn write_string(&mut self, value: &str) -> Result<()> {
        self.log.record("write_string", Some(format!("{:?}", value)))?;
        self.inner.write_string(value)
    }

    fn write_chars(&mut self, chars: &[char]) -> Result<()> {
        self.log
            .record("write_chars", Some(format!("{} chars", chars.len())))?;
        self.inner.write_chars(chars)
    }

    fn write_serialized(&mut self, value: &SerializedString) -> Result<()> {
        self.log
            .record("write_serialized", Some(format!("{:?}", value.as_str())))?;
        self.inner.write_serialized(value)
    }

    fn write_raw_utf8_string(&mut self, bytes: &[u8]) -> Result<()> {
        self.log
            .record("write_raw_utf8_string", Some(byte_count(bytes)))?;
        self.inner.write_raw_utf8_string(bytes)
    }

    fn write_utf8_string(&mut self, bytes: &[u8]) -> Result<()> {
        self.log.record("write_utf8_string", Some(byte_count(bytes)))?;
        self.inner.write_utf8_string(bytes)
    }

    fn write_binary(&mut self, reader: &mut dyn Read, len: usize) -> Result<()> {
        self.log
            .record("write_binary", Some(format!("len {}", len)))?;
        self.inner.write_binary(reader, len)
    }

    fn write_bool(&mut self, value: bool) -> Result<()> {
        self.log.record("write_bool", Some(value.to_string()))?;
        self.inner.write_bool(value)
    }

    fn write_null(&mut self) -> Result<()> {
        self.log.record("write_null", None)?;
        self.inner.write_null()
    }

    fn write_i32(&mut self, value: i32) -> Result<()> {
        self.log.record("write_i32", Some(value.to_string()))?;
        self.inner.write_i32(value)
    }

    fn write_i64(&mut self, value: i64) -> Result<()> {
        self.log.record("write_i64", Some(value.to_string()))?;
        self.inner.write_i64(value)
    }

    fn write_f64(&mut self, value: f64) -> Result<()> {
        self.log.record("write_f64", Some(value.to_string()))?;
        self.inner.write_f64(value)
    }

    fn write_f32(&mut self, value: f32) -> Result<()> {
        self.log.record("write_f32", Some(value.to_string()))?;
        self.inner.write_f32(value)
    }

    fn write_big_decimal(&mut self, value: &BigDecimal) -> Result<()> {
        self.log.record("write_big_decimal", Some(value.to_string()))?;
        self.inner.write_big_decimal(value)
    }

    fn write_big_integer(&mut self, value: &BigInteger) -> Result<()> {
        self.log.record("write_big_integer", Some(value.to_string()))?;
        self.inner.write_big_integer(value)
    }

    fn write_number_str(&mut self, encoded: &str) -> Result<()> {
        self.log
            .record("write_number_str", Some(format!("{:?}", encoded)))?;
        self.inner.write_number_str(encoded)
    }

    fn flush(&mut self) -> Result<()> {
        self.log.record("flush", None)?;
        self.inner.flush()
    }

    fn close(&mut self) -> Result<()> {
        let recorded = self.log.record("close", None);
        // An injected close failure still releases the inner generator
        let closed = self.inner.close();
        recorded.and(closed)
    }

    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }
}

fn byte_count(bytes: &[u8]) -> String {
    format!("{} bytes", bytes.len())
}
