//! Errors raised at the boundary of the analysis engine.

use thiserror::Error;

/// Errors returned when pattern detection is configured incorrectly.
///
/// Every variant is raised before any mining work begins, so a failed call
/// never produces partial output.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// `min_frequency` must be at least 1.
    #[error("Invalid detection options: min_frequency must be greater than 0")]
    ZeroMinFrequency,

    /// `min_sequence_length` must be at least 1.
    #[error("Invalid detection options: min_sequence_length must be at least 1")]
    ZeroMinSequenceLength,

    /// The window length bounds are inverted.
    #[error(
        "Invalid detection options: min_sequence_length ({min}) exceeds max_sequence_length ({max})"
    )]
    InvertedLengthBounds {
        /// Requested minimum window length.
        min: usize,
        /// Requested maximum window length.
        max: usize,
    },
}
