//! Big Integer Wire Conversion Module
//!
//! Converts between `malachite::Integer` and the little-endian magnitude
//! byte layout used by the `n`/`o` ETF tags, by the same repeated
//! divide/multiply-by-256 digit loop as
//! `infrastructure_bignum_encoding::common::{encode_big_integer,bytes_to_integer}`,
//! rather than bit shifting.

use malachite::Integer;

/// Minimal little-endian magnitude bytes of a non-negative `Integer`.
///
/// Zero encodes as an empty byte vector (arity 0), matching the wire rule
/// that a big-integer zero has arity 0 and sign 0. Extracted by repeated
/// division by 256 rather than bit shifting, matching
/// `infrastructure_bignum_encoding::common::encode_big_integer`'s own
/// digit-extraction loop.
pub(crate) fn magnitude_to_le_bytes(value: &Integer) -> Vec<u8> {
    let zero = Integer::from(0);
    debug_assert!(*value >= zero, "magnitude_to_le_bytes requires a non-negative value");

    let base = Integer::from(256u32);
    let mut remaining = value.clone();
    let mut bytes = Vec::new();
    while remaining > zero {
        let remainder = &remaining % &base;
        let byte = u64::try_from(&remainder).unwrap_or(0) as u8;
        bytes.push(byte);
        remaining = &remaining / &base;
    }
    bytes
}

/// Reconstruct the non-negative magnitude encoded by `bytes` (little-endian).
pub(crate) fn magnitude_from_le_bytes(bytes: &[u8]) -> Integer {
    let mut value = Integer::from(0);
    let mut multiplier = Integer::from(1u32);
    let base = Integer::from(256u32);
    for &byte in bytes {
        value += Integer::from(byte) * &multiplier;
        multiplier *= base.clone();
    }
    value
}

/// Exact `i64` value of `value`, if it fits.
pub(crate) fn to_i64(value: &Integer) -> Option<i64> {
    i64::try_from(value).ok()
}

/// Absolute value, returned alongside whether the original was negative.
pub(crate) fn abs_and_sign(value: &Integer) -> (Integer, bool) {
    let zero = Integer::from(0);
    if *value < zero {
        (-value.clone(), true)
    } else {
        (value.clone(), false)
    }
}
