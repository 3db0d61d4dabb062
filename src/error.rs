//! Error types for the PDF metadata editor

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the PDF metadata editor
#[derive(Error, Debug)]
pub enum Error {
    /// File not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The bytes at the path are not a PDF the library can parse or write
    #[error("Invalid PDF document {}: {source}", .path.display())]
    DocumentFormat {
        path: PathBuf,
        #[source]
        source: lopdf::Error,
    },

    /// Any other I/O or library fault
    #[error("I/O error on {}: {source}", .path.display())]
    UnexpectedIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Malformed PDF date string
    #[error("Invalid PDF date: {0}")]
    InvalidDate(String),

    /// Unknown metadata field name
    #[error("Unknown metadata field: {0}")]
    UnknownKey(String),
}

/// Coarse classification of an [`Error`], for front ends that pick a message
/// or recovery action per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    FileNotFound,
    DocumentFormat,
    UnexpectedIo,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FileNotFound(_) => ErrorKind::FileNotFound,
            Error::DocumentFormat { .. } => ErrorKind::DocumentFormat,
            Error::UnexpectedIo { .. } => ErrorKind::UnexpectedIo,
            Error::InvalidDate(_) | Error::UnknownKey(_) => ErrorKind::Other,
        }
    }

    /// Map an I/O error on `path`, keeping "not found" distinct
    pub(crate) fn io(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            Error::FileNotFound(path.to_path_buf())
        } else {
            Error::UnexpectedIo {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// Map a lopdf error on `path`
    ///
    /// lopdf reports I/O failures through its own error type; those are
    /// unwrapped so permission and missing-file faults are not mistaken for
    /// malformed documents.
    pub(crate) fn pdf(path: &Path, source: lopdf::Error) -> Self {
        match source {
            lopdf::Error::IO(e) => Error::io(path, e),
            other => Error::DocumentFormat {
                path: path.to_path_buf(),
                source: other,
            },
        }
    }
}
