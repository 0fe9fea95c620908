// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::One;
use rand::RngCore;

use crate::util::{check_candidate, random_in_range};
use crate::{Error, Result};

/// Verdict of the enhanced Miller-Rabin test (FIPS 186-4 C.3.2).
///
/// Exactly three outcomes are possible. A factor is only ever reported
/// together with a proof of compositeness, so the illegal "factor of a
/// probable prime" state cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MillerRabinOutcome {
    /// No witness found; the candidate is prime with high probability.
    ProbablyPrime,
    /// The candidate is composite and a non-trivial factor was extracted.
    CompositeWithFactor(BigUint),
    /// The candidate is composite and provably not a power of a single prime.
    CompositeNotPrimePower,
}

impl MillerRabinOutcome {
    #[inline]
    pub fn is_provably_composite(&self) -> bool {
        !matches!(self, MillerRabinOutcome::ProbablyPrime)
    }

    #[inline]
    pub fn is_not_prime_power(&self) -> bool {
        matches!(self, MillerRabinOutcome::CompositeNotPrimePower)
    }

    /// The extracted factor, when one was found.
    #[inline]
    pub fn factor(&self) -> Option<&BigUint> {
        match self {
            MillerRabinOutcome::CompositeWithFactor(f) => Some(f),
            _ => None,
        }
    }
}

/// Miller-Rabin probabilistic primality test (FIPS 186-4 C.3.1).
///
/// Runs `iterations` rounds against bases drawn uniformly from
/// `[2, candidate - 2]`. A `false` result is always correct; a `true` result
/// is wrong with probability at most 4^-iterations.
///
/// ## Error
///
/// Fails with [`Error::InvalidCandidate`] if `candidate < 2` and with
/// [`Error::InvalidIterations`] if `iterations == 0`.
pub fn is_probable_prime<R: RngCore + ?Sized>(
    candidate: &BigUint,
    rng: &mut R,
    iterations: usize,
) -> Result<bool> {
    check_candidate(candidate)?;
    if iterations < 1 {
        return Err(Error::InvalidIterations);
    }

    if candidate.bits() == 2 {
        return Ok(true);
    }
    if candidate.is_even() {
        return Ok(false);
    }

    let w = candidate;
    let w_sub_one = candidate - 1u32;
    let w_sub_two = candidate - 2u32;

    let (m, a) = decompose(&w_sub_one);
    let two = BigUint::from(2u32);

    for _ in 0..iterations {
        let b = random_in_range(&two, &w_sub_two, rng)?;

        if !probable_prime_to_base(w, &w_sub_one, &m, a, &b) {
            return Ok(false);
        }
    }

    Ok(true)
}

/// Enhanced Miller-Rabin probabilistic primality test (FIPS 186-4 C.3.2).
///
/// Behaves like [`is_probable_prime`], but when the candidate turns out to be
/// composite the test distinguishes whether a non-trivial factor fell out of
/// the witness computation or whether the candidate is provably not a prime
/// power.
///
/// ## Error
///
/// Fails with [`Error::InvalidCandidate`] if `candidate < 2` and with
/// [`Error::InvalidIterations`] if `iterations == 0`.
pub fn enhanced_probable_prime_test<R: RngCore + ?Sized>(
    candidate: &BigUint,
    rng: &mut R,
    iterations: usize,
) -> Result<MillerRabinOutcome> {
    check_candidate(candidate)?;
    if iterations < 1 {
        return Err(Error::InvalidIterations);
    }

    if candidate.bits() == 2 {
        return Ok(MillerRabinOutcome::ProbablyPrime);
    }
    if candidate.is_even() {
        return Ok(MillerRabinOutcome::CompositeWithFactor(BigUint::from(2u32)));
    }

    let w = candidate;
    let w_sub_one = candidate - 1u32;
    let w_sub_two = candidate - 2u32;

    let (m, a) = decompose(&w_sub_one);
    let two = BigUint::from(2u32);

    for _ in 0..iterations {
        let b = random_in_range(&two, &w_sub_two, rng)?;

        let g = b.gcd(w);
        if !g.is_one() {
            return Ok(MillerRabinOutcome::CompositeWithFactor(g));
        }

        let mut z = b.modpow(&m, w);
        if z.is_one() || z == w_sub_one {
            continue;
        }

        let mut prime_to_base = false;

        // x tracks the value of z before the most recent squaring.
        let mut x = z.clone();
        for _ in 1..a {
            z = (&z * &z) % w;

            if z == w_sub_one {
                prime_to_base = true;
                break;
            }
            if z.is_one() {
                break;
            }

            x = z.clone();
        }

        if !prime_to_base {
            if !z.is_one() {
                x = z.clone();
                z = (&z * &z) % w;

                if !z.is_one() {
                    x = z;
                }
            }

            let g = (&x - 1u32).gcd(w);
            if !g.is_one() {
                return Ok(MillerRabinOutcome::CompositeWithFactor(g));
            }

            return Ok(MillerRabinOutcome::CompositeNotPrimePower);
        }
    }

    Ok(MillerRabinOutcome::ProbablyPrime)
}

/// Single Miller-Rabin round against a fixed base.
///
/// ## Error
///
/// Fails with [`Error::InvalidCandidate`] if `candidate < 2` and with
/// [`Error::InvalidBase`] unless `2 <= base < candidate - 1`.
pub fn is_probable_prime_to_base(candidate: &BigUint, base: &BigUint) -> Result<bool> {
    check_candidate(candidate)?;
    if base.bits() < 2 || *base >= candidate - 1u32 {
        return Err(Error::InvalidBase);
    }

    let w_sub_one = candidate - 1u32;
    let (m, a) = decompose(&w_sub_one);

    Ok(probable_prime_to_base(
        candidate, &w_sub_one, &m, a, base,
    ))
}

/// Splits an even value as `m * 2^a` with `m` odd.
fn decompose(w_sub_one: &BigUint) -> (BigUint, usize) {
    let mut m = w_sub_one.clone();
    let mut a = 0;
    while m.is_even() {
        m = &m >> 1;
        a += 1;
    }
    (m, a)
}

/// Witness loop shared by all three tests: accepts iff `base` fails to prove
/// `w` composite.
fn probable_prime_to_base(
    w: &BigUint,
    w_sub_one: &BigUint,
    m: &BigUint,
    a: usize,
    b: &BigUint,
) -> bool {
    let mut z = b.modpow(m, w);

    if z.is_one() || z == *w_sub_one {
        return true;
    }

    for _ in 1..a {
        z = (&z * &z) % w;

        if z == *w_sub_one {
            return true;
        }
        // A non-trivial square root of unity proves compositeness.
        if z.is_one() {
            return false;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_traits::Zero;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::from_seed([42u8; 32])
    }

    fn naive_is_prime(x: u32) -> bool {
        if x < 2 {
            return false;
        }
        let mut d = 2u64;
        let x = u64::from(x);
        while d * d <= x {
            if x % d == 0 {
                return false;
            }
            d += 1;
        }
        true
    }

    #[test]
    fn two_and_three_are_prime() {
        let mut rng = rng();
        assert!(is_probable_prime(&BigUint::from(2u32), &mut rng, 10).unwrap());
        assert!(is_probable_prime(&BigUint::from(3u32), &mut rng, 10).unwrap());
    }

    #[test]
    fn even_candidates_are_composite() {
        let mut rng = rng();
        for n in [4u32, 10, 100, 65536] {
            assert!(!is_probable_prime(&BigUint::from(n), &mut rng, 10).unwrap());
        }
    }

    #[test]
    fn carmichael_number_is_rejected() {
        // 561 = 3 * 11 * 17 fools the Fermat test but not Miller-Rabin.
        let mut rng = rng();
        assert!(!is_probable_prime(&BigUint::from(561u32), &mut rng, 40).unwrap());
    }

    #[test]
    fn mersenne_prime_m31_is_accepted() {
        let mut rng = rng();
        assert!(is_probable_prime(&BigUint::from(2_147_483_647u32), &mut rng, 40).unwrap());
    }

    #[test]
    fn agrees_with_trial_division_on_small_odds() {
        let mut rng = rng();
        for n in (5u32..5_000).step_by(2) {
            assert_eq!(
                is_probable_prime(&BigUint::from(n), &mut rng, 20).unwrap(),
                naive_is_prime(n),
                "disagreement at {}",
                n
            );
        }
    }

    #[test]
    fn agrees_with_the_reference_implementation() {
        use num_bigint_dig::prime::probably_prime;

        let mut rng = rng();
        for n in [541u32, 7919, 104_729, 561, 1105, 1729, 4681, 65_536, 99_999_989] {
            let n_big = BigUint::from(n);
            assert_eq!(
                is_probable_prime(&n_big, &mut rng, 20).unwrap(),
                probably_prime(&n_big, 20),
                "disagreement with reference at {}",
                n
            );
        }
    }

    #[test]
    fn rejects_bad_arguments() {
        let mut rng = rng();
        assert_eq!(
            is_probable_prime(&BigUint::from(1u32), &mut rng, 10),
            Err(Error::InvalidCandidate)
        );
        assert_eq!(
            is_probable_prime(&BigUint::from(0u32), &mut rng, 10),
            Err(Error::InvalidCandidate)
        );
        assert_eq!(
            is_probable_prime(&BigUint::from(7u32), &mut rng, 0),
            Err(Error::InvalidIterations)
        );
    }

    #[test]
    fn fixed_base_accepts_all_bases_for_primes() {
        for p in (5u32..1_000).filter(|&p| naive_is_prime(p)) {
            for b in 2..=(p - 2) {
                assert!(
                    is_probable_prime_to_base(&BigUint::from(p), &BigUint::from(b)).unwrap(),
                    "prime {} rejected by base {}",
                    p,
                    b
                );
            }
        }
    }

    #[test]
    fn fixed_base_finds_a_witness_for_every_composite() {
        for n in (4u32..2_000).filter(|&n| !naive_is_prime(n)) {
            let max_base = (n - 2).min(100);
            let found = (2..=max_base).any(|b| {
                !is_probable_prime_to_base(&BigUint::from(n), &BigUint::from(b)).unwrap()
            });
            assert!(found, "no witness found for composite {}", n);
        }
    }

    #[test]
    fn fixed_base_range_is_enforced() {
        let n = BigUint::from(17u32);
        assert_eq!(
            is_probable_prime_to_base(&n, &BigUint::from(1u32)),
            Err(Error::InvalidBase)
        );
        assert_eq!(
            is_probable_prime_to_base(&n, &BigUint::from(16u32)),
            Err(Error::InvalidBase)
        );
        assert!(is_probable_prime_to_base(&n, &BigUint::from(15u32)).is_ok());
    }

    #[test]
    fn enhanced_matches_special_cases() {
        let mut rng = rng();
        assert_eq!(
            enhanced_probable_prime_test(&BigUint::from(2u32), &mut rng, 5).unwrap(),
            MillerRabinOutcome::ProbablyPrime
        );
        assert_eq!(
            enhanced_probable_prime_test(&BigUint::from(3u32), &mut rng, 5).unwrap(),
            MillerRabinOutcome::ProbablyPrime
        );
        assert_eq!(
            enhanced_probable_prime_test(&BigUint::from(100u32), &mut rng, 5).unwrap(),
            MillerRabinOutcome::CompositeWithFactor(BigUint::from(2u32))
        );
    }

    #[test]
    fn enhanced_extracts_a_factor_of_fifteen() {
        let mut rng = rng();
        let outcome = enhanced_probable_prime_test(&BigUint::from(15u32), &mut rng, 10).unwrap();
        let f = outcome.factor().expect("15 should yield a factor");
        assert!(
            *f == BigUint::from(3u32) || *f == BigUint::from(5u32),
            "unexpected factor {}",
            f
        );
    }

    #[test]
    fn enhanced_factors_divide_the_candidate() {
        let mut rng = rng();
        for n in (9u32..2_000).filter(|&n| n % 2 == 1 && !naive_is_prime(n)) {
            let n_big = BigUint::from(n);
            let outcome = enhanced_probable_prime_test(&n_big, &mut rng, 30).unwrap();
            assert!(outcome.is_provably_composite(), "{} not flagged", n);
            if let Some(f) = outcome.factor() {
                assert!(*f > BigUint::one() && *f < n_big, "factor {} out of range", f);
                assert!((&n_big % f).is_zero(), "{} does not divide {}", f, n);
            }
        }
    }

    #[test]
    fn enhanced_accepts_primes() {
        let mut rng = rng();
        for p in [5u32, 101, 8191, 65_537, 2_147_483_647] {
            assert_eq!(
                enhanced_probable_prime_test(&BigUint::from(p), &mut rng, 20).unwrap(),
                MillerRabinOutcome::ProbablyPrime
            );
        }
    }

    #[test]
    fn outcome_predicates_are_consistent() {
        let prime = MillerRabinOutcome::ProbablyPrime;
        assert!(!prime.is_provably_composite());
        assert!(!prime.is_not_prime_power());
        assert!(prime.factor().is_none());

        let with_factor = MillerRabinOutcome::CompositeWithFactor(BigUint::from(3u32));
        assert!(with_factor.is_provably_composite());
        assert!(!with_factor.is_not_prime_power());
        assert_eq!(with_factor.factor(), Some(&BigUint::from(3u32)));

        let not_power = MillerRabinOutcome::CompositeNotPrimePower;
        assert!(not_power.is_provably_composite());
        assert!(not_power.is_not_prime_power());
        assert!(not_power.factor().is_none());
    }
}
