// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the harness itself.
//!
//! A crash reproducer is only useful if the same bytes do the same thing
//! twice. This target runs every input twice through a traced generator and
//! checks the call sequences, verdicts and output match, and that each run
//! made exactly one write operation and exactly one close.

#![no_main]

use libfuzzer_sys::fuzz_target;
use smilefuzz::harness::{run_one_input_with, Outcome};
use smilefuzz::smile::SmileFactory;
use smilefuzz::trace::{Call, TracedBuilder};

/// Generator calls that are not one of the twenty operations.
const FRAMING_CALLS: &[&str] = &[
    "enable",
    "disable",
    "build",
    "create_generator",
    "configure",
    "write_start_object",
    "write_end_object",
    "flush",
    "close",
];

struct Run {
    calls: Vec<Call>,
    verdict: String,
    output: Vec<u8>,
}

fn run(data: &[u8]) -> Run {
    let builder = TracedBuilder::new(SmileFactory::builder());
    let log = builder.log();
    let (verdict, output) = match run_one_input_with(builder, data) {
        Ok(iteration) => {
            let verdict = match &iteration.outcome {
                Outcome::Completed => "completed".to_string(),
                Outcome::Rejected { stage, error } => format!("rejected {} {}", stage, error.kind()),
            };
            (verdict, iteration.output)
        }
        Err(finding) => panic!("{}", finding),
    };
    Run {
        calls: log.calls(),
        verdict,
        output,
    }
}

fuzz_target!(|data: &[u8]| {
    let first = run(data);
    let second = run(data);

    // INVARIANT 1: same bytes, same calls, same verdict, same output
    assert_eq!(first.calls, second.calls, "call sequence differs between runs");
    assert_eq!(first.verdict, second.verdict);
    assert_eq!(first.output, second.output);

    // INVARIANT 2: exactly one close, whatever happened before it
    let closes = first.calls.iter().filter(|c| c.method == "close").count();
    assert_eq!(closes, 1, "generator closed {} times", closes);

    // INVARIANT 3: at most one operation; exactly one when the run got that far
    let operations = first
        .calls
        .iter()
        .filter(|c| !FRAMING_CALLS.contains(&c.method))
        .count();
    assert!(operations <= 1, "{} operations in one run", operations);
    if first.calls.iter().any(|c| c.method == "write_start_object") {
        assert_eq!(operations, 1);
    }
});
