// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Structured fuzzing for a streaming Smile generator.
//!
//! A coverage-guided fuzzer hands us opaque bytes. The harness reads them as
//! a recipe: which generator features to flip at build time, which to flip
//! again on the live generator, and which one of twenty write calls to make
//! with what arguments. The generator either succeeds, rejects the input
//! with an error it is allowed to raise, or does something else. Only the
//! something else is interesting.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐     ┌──────────────┐
//! │  harness/    │────▶│   generator/     │◀────│   smile/     │
//! │ (FuzzInput,  │     │ (Generator,      │     │ (SmileFactory│
//! │  Operation,  │     │  FactoryBuilder, │     │  SmileGen.)  │
//! │  Session)    │     │  GenerateError)  │     │              │
//! └──────────────┘     └──────────────────┘     └──────────────┘
//!        │                      ▲
//!        ▼                      │
//! ┌──────────────┐     ┌──────────────────┐
//! │  corpus.rs   │     │    trace.rs      │
//! │ (replay,     │     │ (TracedBuilder,  │
//! │  seeds)      │     │  faults)         │
//! └──────────────┘     └──────────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use smilefuzz::harness::{run_one_input, Operation};
//!
//! // enable WriteHeader, disable WriteEndMarker, six `false` flags, selector 13
//! let iteration = run_one_input(&[0, 1, 0, 0, 0, 0, 0, 0, 12]).unwrap();
//! assert_eq!(iteration.operation, Some(Operation::Null));
//! assert_eq!(iteration.output, [0x3A, 0x29, 0x0A, 0x01, 0xFA, 0x21, 0xFB]);
//! ```

pub mod corpus;
pub mod generator;
pub mod harness;
pub mod smile;
pub mod trace;

pub use generator::{
    BigDecimal, BigInteger, FactoryBuilder, GenerateError, Generator, GeneratorFactory,
    OutputSink, SerializedString,
};
pub use harness::{run_one_input, run_one_input_with, Finding, Iteration, Operation, Outcome};
