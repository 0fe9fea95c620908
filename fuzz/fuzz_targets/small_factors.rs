#![allow(clippy::all, clippy::no_mangle_with_rust_abi)]
#![no_main]

use libfuzzer_sys::fuzz_target;
use num_bigint_dig::BigUint;

const SMALL_PRIMES: [u32; 47] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211,
];

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let candidate = BigUint::from_bytes_be(data);
    if candidate < BigUint::from(2u32) {
        return;
    }

    let claimed = primegen::has_any_small_factors(&candidate).unwrap();
    let actual = SMALL_PRIMES
        .iter()
        .any(|&p| (&candidate % p) == BigUint::from(0u32));

    assert_eq!(
        claimed, actual,
        "sieve disagreed with direct division for {}",
        candidate
    );
});
