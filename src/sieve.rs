// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;
use num_traits::ToPrimitive;

use crate::util::check_candidate;
use crate::Result;

/// Largest prime covered by [`has_any_small_factors`].
pub const SMALL_FACTOR_LIMIT: u32 = 211;

/// Trial divisors up to [`SMALL_FACTOR_LIMIT`], bundled into groups whose
/// product fits in a 32-bit word. One big-integer reduction per group
/// replaces one reduction per prime.
const SMALL_FACTOR_GROUPS: [(u32, &[u32]); 10] = [
    (
        2 * 3 * 5 * 7 * 11 * 13 * 17 * 19 * 23,
        &[2, 3, 5, 7, 11, 13, 17, 19, 23],
    ),
    (29 * 31 * 37 * 41 * 43, &[29, 31, 37, 41, 43]),
    (47 * 53 * 59 * 61 * 67, &[47, 53, 59, 61, 67]),
    (71 * 73 * 79 * 83, &[71, 73, 79, 83]),
    (89 * 97 * 101 * 103, &[89, 97, 101, 103]),
    (107 * 109 * 113 * 127, &[107, 109, 113, 127]),
    (131 * 137 * 139 * 149, &[131, 137, 139, 149]),
    (151 * 157 * 163 * 167, &[151, 157, 163, 167]),
    (173 * 179 * 181 * 191, &[173, 179, 181, 191]),
    (193 * 197 * 199 * 211, &[193, 197, 199, 211]),
];

/// Checks whether any prime up to [`SMALL_FACTOR_LIMIT`] divides `candidate`.
///
/// This is a fast pre-filter: a `true` result proves compositeness (or that
/// the candidate *is* one of the small primes), while `false` only means no
/// small factor exists.
///
/// ## Error
///
/// Fails with [`Error::InvalidCandidate`](crate::Error::InvalidCandidate) if
/// `candidate < 2`.
pub fn has_any_small_factors(candidate: &BigUint) -> Result<bool> {
    check_candidate(candidate)?;
    Ok(small_factor_test(candidate))
}

/// Sieve body, shared with the Shawe-Taylor candidate walk where the
/// candidate is known to be in range.
pub(crate) fn small_factor_test(candidate: &BigUint) -> bool {
    for (product, primes) in SMALL_FACTOR_GROUPS {
        let r = (candidate % product)
            .to_u32()
            .expect("group product fits in a 32-bit word");
        if primes.iter().any(|&p| r % p == 0) {
            return true;
        }
    }
    false
}

/// Exact primality decision for a 32-bit candidate.
///
/// Uses wheel factorization with 2, 3, 5 to select trial divisors: values
/// below 32 are answered from a bitmask, values sharing a factor with 30 are
/// rejected from a residue mask, and the rest are trial-divided by the
/// residues coprime to 30 in each block of 30.
pub fn is_prime_u32(x: u32) -> bool {
    if x < 32 {
        return (1u32 << x) & 0x208A_28AC != 0;
    }

    // Residues mod 30 coprime to 30: {1, 7, 11, 13, 17, 19, 23, 29}.
    if (1u32 << (x % 30)) & 0x208A_2882 == 0 {
        return false;
    }

    const WHEEL: [u32; 8] = [1, 7, 11, 13, 17, 19, 23, 29];

    let mut base = 0u32;
    let mut pos = 1;
    loop {
        while pos < WHEEL.len() {
            if x % (base + WHEEL[pos]) == 0 {
                return false;
            }
            pos += 1;
        }

        base += 30;

        // Once base exceeds 16 bits, base * base >= 2^32 > x. The product
        // below never overflows: base <= 65520 here.
        if (base >> 16) != 0 || base * base >= x {
            return true;
        }

        pos = 0;
    }
}
