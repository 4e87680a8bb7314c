// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Errors raised by a generator.
//!
//! The kinds mirror how a generator can refuse a call: the sink failed, the
//! payload was malformed, an argument was out of range, or the call came at
//! the wrong time. Those four are the generator doing its job. `Internal` is
//! the generator admitting it broke one of its own invariants, which is
//! exactly what a fuzzer is looking for.

use std::io;

/// Result alias for generator calls.
pub type Result<T> = std::result::Result<T, GenerateError>;

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed input: {0}")]
    Malformed(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl GenerateError {
    /// True for the kinds that represent a correct rejection of hostile input.
    pub fn is_benign(&self) -> bool {
        match self {
            GenerateError::Io(_)
            | GenerateError::Malformed(_)
            | GenerateError::InvalidArgument(_)
            | GenerateError::InvalidState(_) => true,
            GenerateError::Internal(_) => false,
        }
    }

    /// Short stable name of the kind, used in reports.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerateError::Io(_) => "io",
            GenerateError::Malformed(_) => "malformed",
            GenerateError::InvalidArgument(_) => "invalid-argument",
            GenerateError::InvalidState(_) => "invalid-state",
            GenerateError::Internal(_) => "internal",
        }
    }
}
