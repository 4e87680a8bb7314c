//! Smile primitive encoding invariants.
//!
//! - VInts end on the only byte with the high bit set
//! - 7-bit packed bytes never set the high bit
//! - Zigzag maps small magnitudes to small codes

use proptest::prelude::*;
use smilefuzz::smile::{
    encode_7bit, encode_f64_bits, encode_vint, packed_7bit_len, zigzag32, zigzag64, MAX_VINT_BYTES,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// Property: only the last VInt byte carries the 0x80 terminator.
    #[test]
    fn prop_vint_terminator_last(value: u64) {
        let mut buf = Vec::new();
        encode_vint(value, &mut buf);
        prop_assert!(!buf.is_empty() && buf.len() <= MAX_VINT_BYTES);
        let (last, body) = buf.split_last().unwrap();
        prop_assert!(last & 0x80 != 0);
        prop_assert!(body.iter().all(|b| b & 0x80 == 0), "{:02x?}", buf);
    }

    /// Property: VInt length grows with the value.
    #[test]
    fn prop_vint_length_monotonic(a: u64, b: u64) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        let mut lo_buf = Vec::new();
        let mut hi_buf = Vec::new();
        encode_vint(lo, &mut lo_buf);
        encode_vint(hi, &mut hi_buf);
        prop_assert!(lo_buf.len() <= hi_buf.len());
    }

    /// Property: 7-bit packing is 8 bytes per 7 and never sets the high bit.
    #[test]
    fn prop_7bit_is_high_bit_free(data in prop::collection::vec(any::<u8>(), 0..64)) {
        let mut buf = Vec::new();
        encode_7bit(&data, &mut buf);
        prop_assert_eq!(buf.len(), packed_7bit_len(data.len()));
        prop_assert!(buf.iter().all(|b| b & 0x80 == 0));
    }

    /// Property: doubles always take ten 7-bit bytes, NaN included.
    #[test]
    fn prop_f64_fixed_width(bits: u64) {
        let mut buf = Vec::new();
        encode_f64_bits(f64::from_bits(bits), &mut buf);
        prop_assert_eq!(buf.len(), 10);
        prop_assert!(buf.iter().all(|b| b & 0x80 == 0));
    }

    /// Property: zigzag codes order by magnitude.
    #[test]
    fn prop_zigzag_magnitude(n in -1_000_000i32..1_000_000) {
        prop_assert_eq!(zigzag32(n) as u64, zigzag64(i64::from(n)));
        prop_assert!(zigzag32(n) <= 2 * n.unsigned_abs());
    }
}
