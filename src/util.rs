// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::{BigUint, RandBigInt};
use num_traits::One;
use rand::RngCore;
use std::cmp::Ordering;

use crate::sieve::small_factor_test;
use crate::{Error, Result};

/// Uniformly samples an integer from the inclusive interval `[min, max]`.
///
/// When `min == max` the single admissible value is returned without
/// consulting the RNG. Sampling is unbiased: the underlying generator uses
/// rejection sampling over the RNG's uniform bit output.
///
/// ## Error
///
/// Fails with [`Error::EmptyRange`] if `min > max`.
pub fn random_in_range<R: RngCore + ?Sized>(
    min: &BigUint,
    max: &BigUint,
    rng: &mut R,
) -> Result<BigUint> {
    match min.cmp(max) {
        Ordering::Greater => Err(Error::EmptyRange),
        Ordering::Equal => Ok(min.clone()),
        Ordering::Less => Ok(rng.gen_biguint_range(min, &(max + 1u32))),
    }
}

/// Generates a random odd probable prime of exactly `bit_length` bits.
///
/// Candidates are drawn with the top and bottom bits forced, screened by the
/// small-factor sieve, and accepted once they pass `iterations` rounds of the
/// plain Miller-Rabin test. The sieve is skipped for candidates below 9 bits,
/// where a candidate may itself be one of the sieved primes.
///
/// ## Error
///
/// Fails with [`Error::PrimeLengthTooShort`] if `bit_length < 2` and with
/// [`Error::InvalidIterations`] if `iterations == 0`.
pub fn random_probable_prime<R: RngCore + ?Sized>(
    rng: &mut R,
    bit_length: usize,
    iterations: usize,
) -> Result<BigUint> {
    if bit_length < 2 {
        return Err(Error::PrimeLengthTooShort {
            min: 2,
            actual: bit_length,
        });
    }
    if iterations < 1 {
        return Err(Error::InvalidIterations);
    }

    loop {
        let mut candidate = rng.gen_biguint(bit_length);

        // Force the exact bit length and oddness.
        candidate |= BigUint::one() << (bit_length - 1);
        candidate |= BigUint::one();

        if bit_length > 8 && small_factor_test(&candidate) {
            continue;
        }

        if crate::is_probable_prime(&candidate, rng, iterations)? {
            return Ok(candidate);
        }
    }
}

/// Miller-Rabin round count for a candidate of `bit_length` bits, derived
/// from FIPS 186-4 Table C.1 for a < 2^-128 error probability.
#[inline]
pub const fn mr_iterations_for(bit_length: usize) -> usize {
    match bit_length {
        0..=256 => 40,
        257..=512 => 15,
        513..=1024 => 10,
        1025..=2048 => 6,
        2049..=4096 => 4,
        _ => 3,
    }
}

/// Candidates must have a bit length of at least 2, i.e. be at least 2.
#[inline]
pub(crate) fn check_candidate(candidate: &BigUint) -> Result<()> {
    if candidate.bits() < 2 {
        return Err(Error::InvalidCandidate);
    }
    Ok(())
}
