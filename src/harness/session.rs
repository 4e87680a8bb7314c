// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! One generator's life inside one invocation.
//!
//! `Session` owns the generator from the moment it is created and is the only
//! way the harness touches it. The happy path ends in `finish`. Every other
//! way out of the invocation (an early `?`, a finding) drops the session,
//! and the drop closes the generator. Millions of iterations run in one
//! process, so a handle that outlives its input is a leak the fuzzer will
//! eventually find in the harness instead of the target.
//!
//! ```text
//! Configuring ──open_scope──▶ Opened ──execute──▶ OperationExecuted ──finish──▶ Closed
//!      │                        │                        │
//!      └────────────────────────┴──────── drop ──────────┴──────────────────▶ Closed
//! ```

use log::debug;

use super::operation::Operation;
use crate::generator::{GenerateError, Generator, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Generator exists, scope not opened yet
    Configuring,
    /// Object scope open, no operation yet
    Opened,
    /// Exactly one operation ran
    OperationExecuted,
    /// Scope closed, flushed, generator closed
    Closed,
}

/// Drop guard around a live generator.
pub struct Session<G: Generator> {
    generator: G,
    state: SessionState,
}

impl<G: Generator> Session<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            state: SessionState::Configuring,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn configure(&mut self, feature: G::Feature, enabled: bool) -> Result<()> {
        self.expect(SessionState::Configuring, "configure")?;
        self.generator.configure(feature, enabled)
    }

    /// Open the object scope the operation writes into.
    pub fn open_scope(&mut self) -> Result<()> {
        self.expect(SessionState::Configuring, "open the scope")?;
        self.generator.write_start_object()?;
        self.state = SessionState::Opened;
        Ok(())
    }

    /// Run the one operation of this invocation.
    pub fn execute(&mut self, operation: &Operation) -> Result<()> {
        self.expect(SessionState::Opened, "execute an operation")?;
        // Counts as executed even if the call fails: it must not run twice
        self.state = SessionState::OperationExecuted;
        operation.apply(&mut self.generator)
    }

    /// Close the scope, flush, close. The generator is closed even if ending
    /// the scope or flushing fails; the first error wins.
    pub fn finish(mut self) -> Result<()> {
        self.expect(SessionState::OperationExecuted, "finish")?;
        let result = self
            .generator
            .write_end_object()
            .and_then(|()| self.generator.flush());
        let closed = self.generator.close();
        self.state = SessionState::Closed;
        result.and(closed)
    }

    fn expect(&self, state: SessionState, what: &str) -> Result<()> {
        if self.state != state {
            return Err(GenerateError::InvalidState(format!(
                "session cannot {} in state {:?}",
                what, self.state
            )));
        }
        Ok(())
    }
}

impl<G: Generator> Drop for Session<G> {
    fn drop(&mut self) {
        if self.state == SessionState::Closed {
            return;
        }
        // A second panic while unwinding would abort and bury the first one
        if std::thread::panicking() {
            return;
        }
        if let Err(e) = self.generator.close() {
            debug!("close after early exit from {:?} failed: {}", self.state, e);
        }
        self.state = SessionState::Closed;
    }
}
