//! Error types for the BCH simulation harness.
//!
//! Trial-level problems (an uncorrectable codeword, a miscorrection, a codec
//! fault) are not errors at this level: they are recorded in a
//! [`TrialResult`](crate::sim::trial::TrialResult). The variants below cover
//! invalid configuration, malformed buffers and export failures.

use thiserror::Error;

/// Top-level error type for codec and harness operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The (t, m) pair cannot be turned into a working code
    #[error("invalid codec configuration: {0}")]
    Configuration(String),

    /// A buffer handed to the codec has the wrong length
    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Input is longer than the code can carry
    #[error("input too large: {length} exceeds maximum {max_length}")]
    InputTooLarge { length: usize, max_length: usize },

    /// Generic invalid argument
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The requested corruption does not fit in the packet
    #[error("cannot inject {count} bit errors into a {bits}-bit packet")]
    Injection { count: usize, bits: usize },

    /// A campaign plan could not be read or parsed
    #[error("campaign plan error: {0}")]
    Plan(String),

    /// File I/O error (export)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
