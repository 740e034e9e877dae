//! Error types for the search and its checkpoint file.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the search itself.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// More perfect numbers than the record store can hold.
    #[error("perfect number {value} does not fit: all {capacity} record slots are used")]
    CapacityExceeded {
        /// Number of slots available.
        capacity: usize,
        /// The value that could not be stored.
        value: u32,
    },
}

/// Errors raised while reading or writing a checkpoint file.
#[derive(Debug, Error)]
pub enum CheckpointError {
    /// The file exists but could not be opened or read.
    #[error("cannot read checkpoint file {}: {source}", .path.display())]
    Unavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is truncated or carries values no writer produces.
    #[error("checkpoint file {} is malformed: {detail}", .path.display())]
    Malformed { path: PathBuf, detail: String },

    /// The checkpoint could not be written; the previous file is untouched.
    #[error("failed to write checkpoint file {}: {source}", .path.display())]
    WriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Another search holds the checkpoint's lock.
    #[error("checkpoint file {} is in use by another search", .path.display())]
    Locked { path: PathBuf },
}

/// Decode failure before a file path is attached.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct FormatError(pub String);

impl FormatError {
    pub fn at(self, path: impl Into<PathBuf>) -> CheckpointError {
        CheckpointError::Malformed {
            path: path.into(),
            detail: self.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_message_names_value() {
        let err = SearchError::CapacityExceeded {
            capacity: 32,
            value: 496,
        };
        assert_eq!(
            err.to_string(),
            "perfect number 496 does not fit: all 32 record slots are used"
        );
    }

    #[test]
    fn test_format_error_attaches_path() {
        let err = FormatError("truncated while reading record count".to_string())
            .at("/tmp/PerfectNumbers.dat");
        assert_eq!(
            err.to_string(),
            "checkpoint file /tmp/PerfectNumbers.dat is malformed: truncated while reading record count"
        );
    }
}
