//! Error classification and resource safety under injected faults.

use std::io;
use std::panic::{self, AssertUnwindSafe};

use crate::common::{framed, input_for, traced};
use smilefuzz::harness::{run_one_input_with, Operation, Outcome, Stage};
use smilefuzz::GenerateError;

fn short_read() -> GenerateError {
    GenerateError::InvalidArgument("too few bytes available".into())
}

fn broken_invariant() -> GenerateError {
    GenerateError::Internal("unbalanced scope stack".into())
}

fn sink_gone() -> GenerateError {
    GenerateError::Io(io::Error::other("sink closed"))
}

fn wrong_time() -> GenerateError {
    GenerateError::InvalidState("already closed".into())
}

fn rejected_stage(outcome: &Outcome) -> Option<Stage> {
    match outcome {
        Outcome::Rejected { stage, .. } => Some(*stage),
        Outcome::Completed => None,
    }
}

#[test]
fn test_invalid_argument_is_rejected_and_closed() {
    let (builder, log) = traced();
    let builder = builder.failing_on("write_binary", short_read);
    let iteration = run_one_input_with(builder, &input_for(11, &[1, 2, 3])).unwrap();

    assert_eq!(rejected_stage(&iteration.outcome), Some(Stage::Dispatch));
    assert_eq!(iteration.operation, Some(Operation::Binary(vec![1, 2, 3])));
    assert_eq!(log.count("close"), 1);
    assert_eq!(log.count("write_end_object"), 0);
    // close ends the open object on its own
    assert_eq!(iteration.output, framed(&[]));
}

#[test]
fn test_internal_error_is_a_finding() {
    let (builder, log) = traced();
    let builder = builder.failing_on("write_null", broken_invariant);
    let finding = run_one_input_with(builder, &input_for(13, &[])).unwrap_err();

    assert_eq!(finding.stage, Stage::Dispatch);
    assert_eq!(finding.operation, Some(Operation::Null));
    assert!(matches!(finding.error, GenerateError::Internal(_)));
    assert_eq!(log.count("close"), 1);
    // The scope was opened before the failure and ended by close
    assert_eq!(finding.output, framed(&[]));
}

#[test]
fn test_construction_failure_has_nothing_to_close() {
    let (builder, log) = traced();
    let builder = builder.failing_on("create_generator", sink_gone);
    let iteration = run_one_input_with(builder, &input_for(13, &[])).unwrap();

    assert_eq!(rejected_stage(&iteration.outcome), Some(Stage::Configuration));
    assert_eq!(iteration.operation, None);
    assert!(iteration.output.is_empty());
    assert_eq!(log.count("close"), 0);
    assert_eq!(log.count("configure"), 0);
}

#[test]
fn test_replay_failure_stops_before_the_scope() {
    let (builder, log) = traced();
    let builder = builder.failing_on("configure", wrong_time);
    let iteration = run_one_input_with(builder, &input_for(13, &[])).unwrap();

    assert_eq!(rejected_stage(&iteration.outcome), Some(Stage::Replay));
    assert_eq!(log.count("configure"), 1);
    assert_eq!(log.count("write_start_object"), 0);
    assert_eq!(log.count("close"), 1);
}

#[test]
fn test_flush_failure_still_closes_once() {
    let (builder, log) = traced();
    let builder = builder.failing_on("flush", sink_gone);
    let iteration = run_one_input_with(builder, &input_for(13, &[])).unwrap();

    assert_eq!(rejected_stage(&iteration.outcome), Some(Stage::Finalization));
    assert_eq!(log.count("close"), 1);
}

#[test]
fn test_internal_error_on_close_is_a_finding() {
    let (builder, log) = traced();
    let builder = builder.failing_on("close", broken_invariant);
    let finding = run_one_input_with(builder, &input_for(13, &[])).unwrap_err();

    assert_eq!(finding.stage, Stage::Finalization);
    assert_eq!(finding.operation, Some(Operation::Null));
    assert_eq!(log.count("close"), 1);
    assert_eq!(
        finding.to_string(),
        "finding during finalization of null: internal error: unbalanced scope stack"
    );
}

#[test]
fn test_panic_propagates_without_close() {
    let (builder, log) = traced();
    let builder = builder.panicking_on("write_null");
    let data = input_for(13, &[]);
    let result = panic::catch_unwind(AssertUnwindSafe(|| run_one_input_with(builder, &data)));

    assert!(result.is_err());
    assert_eq!(log.count("write_null"), 1);
    assert_eq!(log.count("close"), 0);
}
