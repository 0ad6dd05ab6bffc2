//! Errors raised while locating or reading session transcripts.

use std::path::PathBuf;
use thiserror::Error;

/// Failure to locate or read a session transcript.
///
/// Malformed lines inside a transcript are not errors; they are skipped
/// during parsing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    /// A file or directory could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No transcript with the requested id exists.
    #[error("Session not found: {0}")]
    NotFound(String),
}

impl SessionError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
