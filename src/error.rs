// Copyright 2025 Nelson Dominguez
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Errors that can occur during primality testing and prime generation.
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Candidate must be an integer with a bit length of at least 2")]
    InvalidCandidate,

    #[error("Base must satisfy 2 <= base < candidate - 1")]
    InvalidBase,

    #[error("Miller-Rabin iteration count must be at least 1")]
    InvalidIterations,

    #[error("Prime length must be at least {min} bits, got {actual}")]
    PrimeLengthTooShort { min: usize, actual: usize },

    #[error("Input seed cannot be empty")]
    EmptySeed,

    #[error("Sampling range is empty: min exceeds max")]
    EmptyRange,

    #[error("Too many iterations in Shawe-Taylor prime generation")]
    GenerationExhausted,
}

pub type Result<T> = std::result::Result<T, Error>;
