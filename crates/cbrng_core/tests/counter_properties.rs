//! Property-based tests for counter arithmetic and byte layouts.

use cbrng_core::types::{Counter, Key, WordArray};
use proptest::prelude::*;

fn to_u128(words: [u32; 4]) -> u128 {
    words
        .iter()
        .rev()
        .fold(0u128, |acc, &w| (acc << 32) | w as u128)
}

fn to_u128_64(words: [u64; 2]) -> u128 {
    (words[1] as u128) << 64 | words[0] as u128
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Adding n to a 4x32 counter equals wrapping u128 addition.
    #[test]
    fn prop_increment_by_matches_u128(start in any::<[u32; 4]>(), n in any::<u128>()) {
        let mut ctr = Counter::new(start);
        ctr.increment_by(n);
        prop_assert_eq!(to_u128(ctr.value()), to_u128(start).wrapping_add(n));
    }

    /// Adding n to a 2x64 counter equals wrapping u128 addition.
    #[test]
    fn prop_increment_by_matches_u128_wide_words(start in any::<[u64; 2]>(), n in any::<u128>()) {
        let mut ctr = Counter::new(start);
        ctr.increment_by(n);
        prop_assert_eq!(to_u128_64(ctr.value()), to_u128_64(start).wrapping_add(n));
    }

    /// n single increments equal one bulk increment.
    #[test]
    fn prop_repeated_increment_matches_bulk(start in any::<[u32; 2]>(), n in 0u32..200) {
        let mut stepwise = Counter::new(start);
        for _ in 0..n {
            stepwise.increment();
        }
        let mut bulk = Counter::new(start);
        bulk.increment_by(n as u128);
        prop_assert_eq!(stepwise, bulk);
    }

    /// Block increments advance by the block word count.
    #[test]
    fn prop_increment_blocks(start in any::<[u32; 4]>(), n in any::<u64>()) {
        let mut ctr = Counter::new(start);
        ctr.increment_blocks(n);
        prop_assert_eq!(
            to_u128(ctr.value()),
            to_u128(start).wrapping_add(n as u128 * 4)
        );
    }

    /// Counter bytes survive a round trip and are little-endian.
    #[test]
    fn prop_counter_bytes_round_trip(words in any::<[u64; 4]>()) {
        let ctr = Counter::new(words);
        let bytes = ctr.to_bytes();
        prop_assert_eq!(bytes.len(), 32);
        prop_assert_eq!(&bytes[..8], &words[0].to_le_bytes()[..]);
        prop_assert_eq!(Counter::from_bytes(&bytes).unwrap(), ctr);
    }

    /// Key bytes survive a round trip.
    #[test]
    fn prop_key_bytes_round_trip(words in any::<[u32; 6]>()) {
        let key = Key::new(words);
        prop_assert_eq!(Key::<[u32; 6]>::from_bytes(&key.to_bytes()).unwrap(), key);
        prop_assert_eq!(key.to_bytes(), words.to_le_bytes());
    }
}

/// Verifies the carry chain at every word boundary of a 4x32 counter.
#[test]
fn test_carry_at_each_word_boundary() {
    for boundary in 1..=4 {
        let mut words = [0u32; 4];
        for w in words.iter_mut().take(boundary) {
            *w = u32::MAX;
        }
        let mut ctr = Counter::new(words);
        ctr.increment();
        let mut expected = [0u32; 4];
        if boundary < 4 {
            expected[boundary] = 1;
        }
        assert_eq!(ctr.value(), expected, "boundary {}", boundary);
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_counter_serde_json_round_trip() {
    let ctr = Counter::new([1u64, 2, 3, 4]);
    let json = serde_json::to_string(&ctr).unwrap();
    let back: Counter<[u64; 4]> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, ctr);
}
