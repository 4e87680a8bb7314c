//! Shared test utilities for crafting harness inputs.

#![allow(dead_code)]

use smilefuzz::harness::SELECTOR_MIN;
use smilefuzz::smile::{Feature, SmileFactory, SmileFactoryBuilder};
use smilefuzz::trace::{TraceLog, TracedBuilder};

/// Smile header with `CheckSharedNames` as the only flag.
pub const DEFAULT_HEADER: [u8; 4] = [0x3A, 0x29, 0x0A, 0x01];

/// Feature count the harness replays on the live generator.
pub const FEATURE_COUNT: usize = Feature::ALL.len();

/// Input prefix: enable `WriteHeader`, disable `WriteEndMarker`, replay
/// every feature as `false`.
pub fn prefix() -> Vec<u8> {
    let mut data = vec![0, 1];
    data.extend(std::iter::repeat(0).take(FEATURE_COUNT));
    data
}

/// Input that forces `selector` and follows it with `payload`.
pub fn input_for(selector: u32, payload: &[u8]) -> Vec<u8> {
    let mut data = prefix();
    data.push((selector - SELECTOR_MIN) as u8);
    data.extend_from_slice(payload);
    data
}

/// Same as `input_for`, with explicit replay flags in `Feature::ALL` order.
pub fn input_with_replay(replay: [bool; FEATURE_COUNT], selector: u32, payload: &[u8]) -> Vec<u8> {
    let mut data = vec![0, 1];
    data.extend(replay.iter().map(|&b| u8::from(b)));
    data.push((selector - SELECTOR_MIN) as u8);
    data.extend_from_slice(payload);
    data
}

/// Traced Smile builder plus its log.
pub fn traced() -> (TracedBuilder<SmileFactoryBuilder>, TraceLog) {
    let builder = TracedBuilder::new(SmileFactory::builder());
    let log = builder.log();
    (builder, log)
}

/// Wrap a value body in the default header and the harness's object.
pub fn framed(body: &[u8]) -> Vec<u8> {
    let mut out = DEFAULT_HEADER.to_vec();
    out.push(0xFA);
    out.extend_from_slice(body);
    out.push(0xFB);
    out
}
