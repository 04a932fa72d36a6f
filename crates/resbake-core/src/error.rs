//! Error types for the resbake-core library.
//!
//! Every failure a run can hit is a variant of [`Error`]. Precondition
//! failures are raised before any output file is opened; everything else
//! aborts a run that may already have written partial output.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for resbake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for all resbake operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The configured resource root does not exist
    #[error(
        "resource directory '{path}' does not exist; run from the parent of the resources directory"
    )]
    ResourceRootMissing {
        /// The configured root
        path: PathBuf,
    },

    /// The configured resource root exists but is not a directory
    #[error("resource root '{path}' is not a directory")]
    NotADirectory {
        /// The configured root
        path: PathBuf,
    },

    /// Failed to list a directory inside the resource tree
    #[error("failed to read directory '{path}': {source}")]
    DirectoryRead {
        /// Directory that could not be listed
        path: PathBuf,
        /// Underlying traversal error
        #[source]
        source: walkdir::Error,
    },

    /// Failed to read a resource file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        /// Path to the file that failed to read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create or write a generated file
    #[error("failed to write file '{path}': {source}")]
    FileWrite {
        /// Path to the file that failed to write
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Failed to create the output directory
    #[error("failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Path to the directory that failed to create
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A blacklist pattern is not a valid regular expression
    #[error("invalid blacklist pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Underlying regex error
        #[source]
        source: regex::Error,
    },

    /// Two entries of one scope sanitize to the same identifier
    #[error(
        "identifier collision in scope '{scope}': '{first}' and '{second}' both map to '{identifier}'"
    )]
    IdentifierCollision {
        /// Slash-separated path of the scope, empty for the top level
        scope: String,
        /// The shared identifier
        identifier: String,
        /// Name of the entry that claimed the identifier first
        first: String,
        /// Name of the entry that collided with it
        second: String,
    },

    /// Chunk size must be at least one byte
    #[error("invalid chunk size {0}: must be greater than zero")]
    InvalidChunkSize(usize),

    /// The pre-processing step failed
    #[error("pre-processing failed: {message}")]
    PreProcess {
        /// What went wrong
        message: String,
        /// Underlying I/O error, if the step could not be started
        #[source]
        source: Option<std::io::Error>,
    },
}

impl Error {
    /// Creates a new file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new file write error
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory creation error
    pub fn directory_create(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryCreate {
            path: path.into(),
            source,
        }
    }

    /// Creates a new directory read error
    pub fn directory_read(path: impl Into<PathBuf>, source: walkdir::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    /// Creates a new pre-processing error
    pub fn pre_process(msg: impl Into<String>) -> Self {
        Self::PreProcess {
            message: msg.into(),
            source: None,
        }
    }

    /// Creates a pre-processing error caused by an I/O failure
    pub fn pre_process_io(msg: impl Into<String>, source: std::io::Error) -> Self {
        Self::PreProcess {
            message: msg.into(),
            source: Some(source),
        }
    }

    /// Returns true if this error was raised before any output was touched
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::ResourceRootMissing { .. }
                | Self::NotADirectory { .. }
                | Self::InvalidChunkSize(_)
                | Self::InvalidPattern { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::ResourceRootMissing {
            path: PathBuf::from("./resources"),
        };
        assert!(err.to_string().contains("does not exist"));
        assert!(err.to_string().contains("./resources"));
    }

    #[test]
    fn test_collision_display() {
        let err = Error::IdentifierCollision {
            scope: "icons/16x16".to_string(),
            identifier: "a_b".to_string(),
            first: "a b".to_string(),
            second: "a-b".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("icons/16x16"));
        assert!(msg.contains("'a b'"));
        assert!(msg.contains("'a-b'"));
    }

    #[test]
    fn test_is_precondition() {
        assert!(Error::InvalidChunkSize(0).is_precondition());
        assert!(!Error::pre_process("boom").is_precondition());
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(!Error::file_read("/tmp/x", io).is_precondition());
    }

    #[test]
    fn test_pre_process_keeps_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such program");
        let err = Error::pre_process_io("failed to start 'rsvg'", io);
        assert_eq!(err.to_string(), "pre-processing failed: failed to start 'rsvg'");
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "no such program");

        assert!(Error::pre_process("exited with 1").source().is_none());
    }
}
