// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # FIPS 186-4 Prime Generation
//!
//! Primality testing and provable prime construction as specified by
//! FIPS 186-4, Appendices C.3 and C.6:
//!
//! - Miller-Rabin probabilistic primality testing, in the plain variant and
//!   the enhanced variant that reports a non-trivial factor of the candidate
//!   whenever one falls out of the witness computation.
//! - Shawe-Taylor provable prime construction, driven by a caller-supplied
//!   hash function and bit-for-bit reproducible for a given
//!   `(hash, length, seed)` triple.
//!
//! Reference: [FIPS 186-4](https://nvlpubs.nist.gov/nistpubs/FIPS/NIST.FIPS.186-4.pdf)
//!
//! ## Security
//!
//! All candidates are screened by a small-factor sieve before the expensive
//! tests run. Hash-derived scratch buffers are wiped on drop via the
//! `zeroize` crate. Callers supply their own RNG and hash instances; neither
//! is retained beyond a single call.

mod error;
mod miller_rabin;
mod shawe_taylor;
mod sieve;
mod util;

pub use error::*;
pub use miller_rabin::*;
pub use shawe_taylor::*;
pub use sieve::*;
pub use util::*;
