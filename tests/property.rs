//! Property-based tests using proptest.
//!
//! Arbitrary byte buffers stand in for the fuzzing engine: whatever the
//! engine sends, the harness must stay deterministic, close exactly once,
//! and never turn a correct generator's rejection into a finding.

mod common;

#[path = "property/harness_props.rs"]
mod harness_props;

#[path = "property/encoding_props.rs"]
mod encoding_props;
