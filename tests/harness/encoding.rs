//! Exact bytes the harness gets back from the Smile generator.

use crate::common::{framed, input_for, input_with_replay};
use smilefuzz::harness::run_one_input;

#[test]
fn test_null_inside_object() {
    let iteration = run_one_input(&[0, 1, 0, 0, 0, 0, 0, 0, 12]).unwrap();
    assert_eq!(iteration.output, framed(&[0x21]));
}

#[test]
fn test_boolean_true() {
    let iteration = run_one_input(&input_for(12, &[1])).unwrap();
    assert_eq!(iteration.output, framed(&[0x23]));
}

#[test]
fn test_small_ints_use_single_token() {
    let iteration = run_one_input(&input_for(14, &[0xFF, 0xFF, 0xFF, 0xFF])).unwrap();
    assert_eq!(iteration.output, framed(&[0xC1]));
}

#[test]
fn test_int_array_brackets() {
    let iteration = run_one_input(&input_for(3, &[1, 5, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF])).unwrap();
    assert_eq!(iteration.output, framed(&[0xF8, 0xCA, 0xC1, 0xF9]));
}

#[test]
fn test_tiny_ascii_string() {
    let iteration = run_one_input(&input_for(6, b"hi")).unwrap();
    assert_eq!(iteration.output, framed(&[0x41, b'h', b'i']));
}

#[test]
fn test_empty_string_token() {
    let iteration = run_one_input(&input_for(8, &[])).unwrap();
    assert_eq!(iteration.output, framed(&[0x20]));
}

#[test]
fn test_binary_raw_after_replay_disables_7bit() {
    let iteration = run_one_input(&input_for(11, &[1, 2, 3])).unwrap();
    assert_eq!(iteration.output, framed(&[0xFD, 0x83, 1, 2, 3]));
}

#[test]
fn test_empty_binary_has_zero_length() {
    let iteration = run_one_input(&input_for(11, &[])).unwrap();
    assert_eq!(iteration.output, framed(&[0xFD, 0x80]));
}

#[test]
fn test_binary_7bit_when_replay_keeps_it() {
    // WriteHeader, WriteEndMarker, EncodeBinaryAs7Bit, CheckSharedNames,
    // CheckSharedStringValues, LenientUtfEncoding
    let replay = [true, false, true, false, false, false];
    let iteration = run_one_input(&input_with_replay(replay, 11, &[0x7F])).unwrap();
    // Length 1, then one byte split as 7 bits + 1 trailing bit
    assert_eq!(iteration.output, framed(&[0xE8, 0x81, 0x3F, 0x01]));
}

#[test]
fn test_end_marker_from_replay() {
    let replay = [true, true, true, true, false, false];
    let iteration = run_one_input(&input_with_replay(replay, 13, &[])).unwrap();
    let mut expected = framed(&[0x21]);
    expected.push(0xFF);
    assert_eq!(iteration.output, expected);
}

#[test]
fn test_header_written_at_construction_only() {
    // Turning WriteHeader off on the live generator is too late
    let iteration = run_one_input(&input_for(13, &[])).unwrap();
    assert_eq!(&iteration.output[..3], b":)\n");
}

#[test]
fn test_double_uses_ten_payload_bytes() {
    let one = 1.0f64.to_bits().to_le_bytes();
    let iteration = run_one_input(&input_for(16, &one)).unwrap();
    assert_eq!(iteration.output.len(), 4 + 1 + 1 + 10 + 1);
    assert_eq!(iteration.output[5], 0x29);
}

#[test]
fn test_number_string_integral_becomes_small_int() {
    let iteration = run_one_input(&input_for(20, b"7")).unwrap();
    assert_eq!(iteration.output, framed(&[0xCE]));
}
