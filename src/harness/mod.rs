// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The fuzz harness: bytes in, one generator invocation out.
//!
//! Each input is read front to back exactly once, and every read has a
//! default for when the bytes run out, so a given buffer always produces the
//! same configuration, the same call sequence, and the same verdict.
//!
//! ```text
//! bytes ─▶ FuzzInput
//!            │ pick enable, pick disable
//!            ▼
//!          FactoryBuilder ─build─▶ GeneratorFactory ─create─▶ Session(Generator)
//!            │ one bool per feature                              │
//!            ▼                                                   ▼
//!          configure(feature, bool)  ───────────────▶  write_start_object
//!            │ selector in 1..=20                                │
//!            ▼                                                   ▼
//!          Operation::draw  ─────────────────────────▶  Operation::apply
//!                                                                │
//!                                      write_end_object, flush, close (or drop)
//!                                                                │
//!                                                                ▼
//!                                     Ok(Iteration)  /  Err(Finding)
//! ```
//!
//! # Verdicts
//!
//! Errors the generator reports as I/O, malformed input, invalid argument or
//! invalid state are the generator rejecting hostile input correctly. The
//! invocation ends with `Outcome::Rejected` and the fuzzer moves on. Any other
//! error becomes a `Finding`. Panics are not caught here: they unwind
//! straight into the fuzzing engine, which is the report it wants.

pub mod cursor;
pub mod operation;
pub mod session;

use std::fmt;

use log::{debug, trace};

use crate::generator::{FactoryBuilder, GenerateError, GeneratorFactory, OutputSink};
use crate::smile::SmileFactory;

pub use cursor::FuzzInput;
pub use operation::{selector_name, Operation, MAX_ARRAY_LEN, SELECTOR_MAX, SELECTOR_MIN};
pub use session::{Session, SessionState};

/// Where in the invocation an error surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Configuration,
    Replay,
    Dispatch,
    Finalization,
}

impl Stage {
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Configuration => "configuration",
            Stage::Replay => "replay",
            Stage::Dispatch => "dispatch",
            Stage::Finalization => "finalization",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an invocation that did not produce a finding ended.
#[derive(Debug)]
pub enum Outcome {
    /// Every call succeeded
    Completed,
    /// The generator refused the input with a benign error
    Rejected { stage: Stage, error: GenerateError },
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }
}

/// Record of one invocation.
#[derive(Debug)]
pub struct Iteration {
    /// `None` if the run stopped before the operation was drawn
    pub operation: Option<Operation>,
    pub outcome: Outcome,
    /// Everything the generator wrote, including what `close` emitted
    pub output: Vec<u8>,
}

/// A non-benign error: what the fuzzing engine should report.
#[derive(Debug, thiserror::Error)]
#[error("finding during {stage}{}: {error}", operation_suffix(.operation))]
pub struct Finding {
    pub stage: Stage,
    pub operation: Option<Operation>,
    #[source]
    pub error: GenerateError,
    /// What the generator wrote before the failure, including anything
    /// `close` flushed
    pub output: Vec<u8>,
}

fn operation_suffix(operation: &Option<Operation>) -> String {
    operation
        .as_ref()
        .map(|op| format!(" of {}", op.name()))
        .unwrap_or_default()
}

#[derive(Debug)]
struct Progress {
    stage: Stage,
    operation: Option<Operation>,
}

/// Run one input against the Smile generator.
pub fn run_one_input(data: &[u8]) -> Result<Iteration, Finding> {
    run_one_input_with(SmileFactory::builder(), data)
}

/// Run one input against any generator.
pub fn run_one_input_with<B: FactoryBuilder>(builder: B, data: &[u8]) -> Result<Iteration, Finding> {
    let mut input = FuzzInput::new(data);
    let sink = OutputSink::new();
    let mut progress = Progress {
        stage: Stage::Configuration,
        operation: None,
    };

    // The session is dropped inside `drive`, so the generator is closed
    // before the sink is read
    let result = drive(builder, &mut input, &sink, &mut progress);
    let output = sink.take();
    let Progress { stage, operation } = progress;

    match result {
        Ok(()) => Ok(Iteration {
            operation,
            outcome: Outcome::Completed,
            output,
        }),
        Err(error) if error.is_benign() => {
            debug!("rejected during {}: {}", stage, error);
            Ok(Iteration {
                operation,
                outcome: Outcome::Rejected { stage, error },
                output,
            })
        }
        Err(error) => Err(Finding {
            stage,
            operation,
            error,
            output,
        }),
    }
}

fn drive<B: FactoryBuilder>(
    builder: B,
    input: &mut FuzzInput<'_>,
    sink: &OutputSink,
    progress: &mut Progress,
) -> Result<(), GenerateError> {
    let features = B::features();

    let mut builder = builder;
    if let Some(feature) = input.pick(features) {
        builder = builder.enable(feature);
    }
    if let Some(feature) = input.pick(features) {
        builder = builder.disable(feature);
    }
    let factory = builder.build();
    let mut session = Session::new(factory.create_generator(sink.clone())?);

    progress.stage = Stage::Replay;
    for &feature in features {
        let enabled = input.consume_bool();
        trace!("configure {:?} = {}", feature, enabled);
        session.configure(feature, enabled)?;
    }

    progress.stage = Stage::Dispatch;
    session.open_scope()?;
    let operation = Operation::draw(input);
    debug!("selector {} -> {}", operation.selector(), operation);
    let executed = session.execute(&operation);
    progress.operation = Some(operation);
    executed?;

    progress.stage = Stage::Finalization;
    session.finish()
}
