// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

use digest::{Digest, FixedOutputReset};
use num_bigint_dig::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use zeroize::Zeroizing;

use crate::sieve::{is_prime_u32, small_factor_test};
use crate::{Error, Result};

/// A provable prime constructed by [`generate_provable_prime`], together with
/// the evolved seed and the cumulative candidate counter.
///
/// The output is fully determined by the `(hash, length, seed)` triple that
/// produced it: re-running the generator with equal inputs yields an equal
/// `ProvablePrime`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvablePrime {
    prime: BigUint,
    prime_seed: Vec<u8>,
    prime_gen_counter: usize,
}

impl ProvablePrime {
    /// The generated prime; its bit length equals the requested length.
    #[inline]
    pub fn prime(&self) -> &BigUint {
        &self.prime
    }

    /// The seed after all hash-generator increments. Always the same length
    /// as the input seed.
    #[inline]
    pub fn prime_seed(&self) -> &[u8] {
        &self.prime_seed
    }

    /// Number of candidates examined, cumulative across recursion levels.
    #[inline]
    pub fn prime_gen_counter(&self) -> usize {
        self.prime_gen_counter
    }
}

/// Shawe-Taylor provable prime construction (FIPS 186-4 C.6).
///
/// Deterministically derives a prime of exactly `length` bits from
/// `input_seed` by recursively constructing primes of roughly half the
/// length and lifting them with a Pocklington-style certificate. All
/// randomness comes from the supplied hash function; the caller's seed
/// buffer is cloned on entry and never modified.
///
/// ## Error
///
/// Fails with [`Error::PrimeLengthTooShort`] if `length < 2`, with
/// [`Error::EmptySeed`] if the seed is empty, and with
/// [`Error::GenerationExhausted`] if the iteration budget of any recursion
/// level is exceeded (pathological or adversarial seeds; retry with a fresh
/// seed).
pub fn generate_provable_prime<D: Digest + FixedOutputReset>(
    hash: &mut D,
    length: usize,
    input_seed: &[u8],
) -> Result<ProvablePrime> {
    if length < 2 {
        return Err(Error::PrimeLengthTooShort {
            min: 2,
            actual: length,
        });
    }
    if input_seed.is_empty() {
        return Err(Error::EmptySeed);
    }

    let mut prime_seed = input_seed.to_vec();
    let (prime, prime_gen_counter) = st_random_prime(hash, length, &mut prime_seed)?;

    Ok(ProvablePrime {
        prime,
        prime_seed,
        prime_gen_counter,
    })
}

/// Recursive body. `prime_seed` is the working seed, mutated in place by
/// every hash invocation at every recursion level.
fn st_random_prime<D: Digest + FixedOutputReset>(
    hash: &mut D,
    length: usize,
    prime_seed: &mut [u8],
) -> Result<(BigUint, usize)> {
    let d_len = <D as Digest>::output_size();

    if length < 33 {
        let c_len = d_len.max(4);

        // Hash outputs are right-aligned in the working buffers; any bytes
        // to the left of the digest stay zero.
        let mut c0 = Zeroizing::new(vec![0u8; c_len]);
        let mut c1 = Zeroizing::new(vec![0u8; c_len]);

        let mut prime_gen_counter = 0usize;

        loop {
            hash_into(hash, prime_seed, &mut c0[c_len - d_len..]);
            inc_seed(prime_seed, 1);

            hash_into(hash, prime_seed, &mut c1[c_len - d_len..]);
            inc_seed(prime_seed, 1);

            let mut c = extract_u32(&c0) ^ extract_u32(&c1);
            c &= u32::MAX >> (32 - length);
            c |= (1 << (length - 1)) | 1;

            prime_gen_counter += 1;

            if is_prime_u32(c) {
                return Ok((BigUint::from(c), prime_gen_counter));
            }

            if prime_gen_counter > 4 * length {
                return Err(Error::GenerationExhausted);
            }
        }
    }

    let (c0, mut prime_gen_counter) = st_random_prime(hash, (length + 3) / 2, prime_seed)?;

    let out_len = 8 * d_len;
    let iterations = (length - 1) / out_len;
    let old_counter = prime_gen_counter;

    let top_bit = BigUint::one() << (length - 1);
    let x = hash_gen(hash, prime_seed, iterations + 1);
    let x = (x % &top_bit) | &top_bit;

    let c0x2: BigUint = &c0 << 1;
    let mut t2 = ((&x - 1u32) / &c0x2 + 1u32) << 1;
    let mut dt = 0u32;

    let mut c = &t2 * &c0 + 1u32;

    loop {
        if c.bits() > length {
            t2 = ((&top_bit - 1u32) / &c0x2 + 1u32) << 1;
            c = &t2 * &c0 + 1u32;
        }

        prime_gen_counter += 1;

        if small_factor_test(&c) {
            // prime_seed still advances as if the full test had run.
            inc_seed(prime_seed, iterations + 1);
        } else {
            let a = hash_gen(hash, prime_seed, iterations + 1);
            let a = a % (&c - 3u32) + 2u32;

            t2 += dt;
            dt = 0;

            let z = a.modpow(&t2, &c);

            // z can only vanish when c shares every prime factor with a, in
            // which case c is certainly composite.
            if !z.is_zero() && c.gcd(&(&z - 1u32)).is_one() && z.modpow(&c0, &c).is_one() {
                return Ok((c, prime_gen_counter));
            }
        }

        if prime_gen_counter >= 4 * length + old_counter {
            return Err(Error::GenerationExhausted);
        }

        dt += 2;
        c += &c0x2;
    }
}

/// Deterministic byte-stream expansion: `count` successive hash outputs of
/// the evolving seed, concatenated tail-first (the first output occupies the
/// least significant slot), parsed as a non-negative big-endian integer.
/// Advances `seed` by `count`.
fn hash_gen<D: Digest + FixedOutputReset>(
    hash: &mut D,
    seed: &mut [u8],
    count: usize,
) -> BigUint {
    let d_len = <D as Digest>::output_size();

    let mut buf = Zeroizing::new(vec![0u8; count * d_len]);
    let mut pos = count * d_len;

    for _ in 0..count {
        pos -= d_len;
        hash_into(hash, seed, &mut buf[pos..pos + d_len]);
        inc_seed(seed, 1);
    }

    BigUint::from_bytes_be(&buf)
}

/// Absorbs `input` and writes the digest into `out`, resetting the hash.
fn hash_into<D: Digest + FixedOutputReset>(hash: &mut D, input: &[u8], out: &mut [u8]) {
    Digest::update(hash, input);
    let digest = Digest::finalize_reset(hash);
    out.copy_from_slice(&digest);
}

/// Adds `increment` into a big-endian seed, carrying leftward from the last
/// byte. Carry out of the top byte is discarded.
fn inc_seed(seed: &mut [u8], increment: usize) {
    let mut carry = increment;
    let mut pos = seed.len();

    while carry > 0 && pos > 0 {
        pos -= 1;
        carry += seed[pos] as usize;
        seed[pos] = carry as u8;
        carry >>= 8;
    }
}

/// Big-endian view of the trailing (low-order) four bytes of a buffer.
fn extract_u32(bs: &[u8]) -> u32 {
    let mut result = 0u32;
    let count = bs.len().min(4);

    for i in 0..count {
        result |= u32::from(bs[bs.len() - 1 - i]) << (8 * i);
    }

    result
}
