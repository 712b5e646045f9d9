//! Error types for matrix profile computation.
//!
//! Every public entry point validates its inputs before doing any work and
//! returns either a complete result or exactly one of these errors.

use thiserror::Error;

/// The main error type for stamp-rs operations.
#[derive(Debug, Error)]
pub enum Error {
    /// An input series has no data points.
    #[error("empty input: {series} series has no data points")]
    EmptyInput {
        /// Which series was empty (`"reference"`, `"query"`, ...).
        series: &'static str,
    },

    /// The subsequence length does not fit the inputs.
    #[error("invalid window length {m}: {reason}")]
    InvalidWindowLength {
        /// The window length that was requested.
        m: usize,
        /// Why it was rejected.
        reason: &'static str,
    },

    /// An input series contains NaN or an infinite value.
    #[error("non-finite value in {series} series at index {index}")]
    NonFiniteInput {
        /// Which series held the value.
        series: &'static str,
        /// Position of the first offending value.
        index: usize,
    },

    /// A reference window has zero variance, so its z-normalized distance
    /// to any query is undefined.
    #[error("undefined distance: reference window starting at {window} has zero variance")]
    UndefinedDistance {
        /// Start index of the first constant reference window.
        window: usize,
    },

    /// The FFT backend rejected a buffer.
    #[error("fft failure: {0}")]
    Fft(#[from] realfft::FftError),
}

/// Convenience type alias for Results using the stamp-rs Error type.
pub type Result<T> = std::result::Result<T, Error>;
