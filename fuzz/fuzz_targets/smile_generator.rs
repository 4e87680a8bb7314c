// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzz target for the Smile generator's write API.
//!
//! The bytes pick build-time features, replay every feature on the live
//! generator, and choose one of twenty write calls with its arguments.
//! Rejections the generator is allowed to raise are fine. Anything else is
//! a crash.

#![no_main]

use libfuzzer_sys::fuzz_target;
use smilefuzz::harness::run_one_input;

fuzz_target!(|data: &[u8]| {
    // Benign rejections come back as Ok; panics inside the generator
    // unwind straight through to libFuzzer
    if let Err(finding) = run_one_input(data) {
        panic!("{}", finding);
    }
});
