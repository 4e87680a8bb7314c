//! Selector dispatch: each selector reaches exactly one generator method.

use crate::common::{input_for, traced};
use smilefuzz::harness::{run_one_input, run_one_input_with, selector_name, Operation};
use smilefuzz::{BigDecimal, BigInteger};

/// Generator method each selector must call, in selector order.
const METHOD_FOR_SELECTOR: [&str; 20] = [
    "write_raw_byte",
    "write_raw_bytes",
    "write_i32_array",
    "write_i64_array",
    "write_f64_array",
    "write_string",
    "write_chars",
    "write_serialized",
    "write_raw_utf8_string",
    "write_utf8_string",
    "write_binary",
    "write_bool",
    "write_null",
    "write_i32",
    "write_i64",
    "write_f64",
    "write_f32",
    "write_big_decimal",
    "write_big_integer",
    "write_number_str",
];

#[test]
fn test_every_selector_calls_its_method_once() {
    for (i, method) in METHOD_FOR_SELECTOR.iter().enumerate() {
        let selector = i as u32 + 1;
        let (builder, log) = traced();
        let iteration = run_one_input_with(builder, &input_for(selector, b"\x02ok")).unwrap();

        assert_eq!(
            iteration.operation.as_ref().map(Operation::selector),
            Some(selector),
            "selector {}",
            selector
        );
        for other in METHOD_FOR_SELECTOR {
            let expected = usize::from(other == *method);
            assert_eq!(
                log.count(other),
                expected,
                "selector {} ({}) called {} {} times",
                selector,
                selector_name(selector),
                other,
                log.count(other)
            );
        }
        assert_eq!(log.count("close"), 1);
    }
}

#[test]
fn test_call_order_for_completed_run() {
    let (builder, log) = traced();
    run_one_input_with(builder, &input_for(13, &[])).unwrap();
    assert_eq!(
        log.call_names(),
        [
            "enable",
            "disable",
            "build",
            "create_generator",
            "configure",
            "configure",
            "configure",
            "configure",
            "configure",
            "configure",
            "write_start_object",
            "write_null",
            "write_end_object",
            "flush",
            "close",
        ]
    );
}

#[test]
fn test_selector_wraps_modulo_twenty() {
    // Selector byte 32 maps to 1 + 32 % 20 = 13
    let mut data = input_for(1, &[]);
    *data.last_mut().unwrap() = 32;
    let iteration = run_one_input(&data).unwrap();
    assert_eq!(iteration.operation, Some(Operation::Null));
}

#[test]
fn test_big_decimal_from_exhausted_input() {
    let iteration = run_one_input(&input_for(18, &[])).unwrap();
    assert!(iteration.outcome.is_completed());
    assert_eq!(
        iteration.operation,
        Some(Operation::BigDecimal(BigDecimal::from(0)))
    );
}

#[test]
fn test_big_integer_reads_little_endian_long() {
    let iteration = run_one_input(&input_for(19, &[0x2A, 0, 0, 0, 0, 0, 0, 0])).unwrap();
    assert_eq!(
        iteration.operation,
        Some(Operation::BigInteger(BigInteger::from(42)))
    );
}

#[test]
fn test_array_length_drawn_before_elements() {
    // Length byte 1 gives 1 + 1 % 5 = 2 elements
    let iteration = run_one_input(&input_for(3, &[1, 5, 0, 0, 0, 0xFF, 0xFF, 0xFF, 0xFF])).unwrap();
    assert_eq!(iteration.operation, Some(Operation::IntArray(vec![5, -1])));
}

#[test]
fn test_string_keeps_valid_utf8_prefix() {
    let iteration = run_one_input(&input_for(6, b"caf\xc3\xa9\xff!")).unwrap();
    assert_eq!(
        iteration.operation,
        Some(Operation::String("café".to_string()))
    );
}

#[test]
fn test_raw_bytes_take_everything_left() {
    let iteration = run_one_input(&input_for(2, &[0xFF, 0x00, 0xFE])).unwrap();
    assert_eq!(
        iteration.operation,
        Some(Operation::RawBytes(vec![0xFF, 0x00, 0xFE]))
    );
}

#[test]
fn test_empty_input_runs_with_defaults() {
    let (builder, log) = traced();
    let iteration = run_one_input_with(builder, &[]).unwrap();
    assert_eq!(iteration.operation, Some(Operation::RawByte(0)));
    assert_eq!(log.count("configure"), 6);
    assert_eq!(log.count("close"), 1);
}
