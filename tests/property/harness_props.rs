//! Harness invariants over arbitrary inputs.

use crate::common::{input_for, traced};
use proptest::prelude::*;
use smilefuzz::harness::{run_one_input, run_one_input_with, SELECTOR_MAX, SELECTOR_MIN};

/// Calls that frame the operation rather than being one.
const FRAMING: &[&str] = &[
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

fn input_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Property: the Smile generator never produces a finding.
    #[test]
    fn prop_no_findings(data in input_strategy()) {
        let result = run_one_input(&data);
        prop_assert!(result.is_ok(), "{}", result.unwrap_err());
    }

    /// Property: the same bytes produce the same calls and output.
    #[test]
    fn prop_deterministic(data in input_strategy()) {
        let (first, first_log) = traced();
        let (second, second_log) = traced();
        let a = run_one_input_with(first, &data).unwrap();
        let b = run_one_input_with(second, &data).unwrap();

        prop_assert_eq!(first_log.calls(), second_log.calls());
        prop_assert_eq!(a.operation.map(|op| op.selector()), b.operation.map(|op| op.selector()));
        prop_assert_eq!(a.output, b.output);
        prop_assert_eq!(a.outcome.is_completed(), b.outcome.is_completed());
    }

    /// Property: exactly one close and exactly one operation per run.
    #[test]
    fn prop_one_close_one_operation(data in input_strategy()) {
        let (builder, log) = traced();
        run_one_input_with(builder, &data).unwrap();

        prop_assert_eq!(log.count("close"), 1);
        let operations = log
            .call_names()
            .into_iter()
            .filter(|name| !FRAMING.contains(name))
            .count();
        prop_assert_eq!(operations, 1);
    }

    /// Property: a forced selector always dispatches to itself.
    #[test]
    fn prop_forced_selector_dispatches(
        selector in SELECTOR_MIN..=SELECTOR_MAX,
        payload in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let iteration = run_one_input(&input_for(selector, &payload)).unwrap();
        prop_assert_eq!(iteration.operation.map(|op| op.selector()), Some(selector));
    }

    /// Property: every completed run is one well-formed object.
    #[test]
    fn prop_completed_output_is_framed(data in input_strategy()) {
        let iteration = run_one_input(&data).unwrap();
        if iteration.outcome.is_completed() && !iteration.output.is_empty() {
            let body_end = iteration.output.iter().rposition(|&b| b == 0xFB);
            prop_assert!(body_end.is_some(), "no end-object token in {:02x?}", iteration.output);
        }
    }
}
