//! Error and outcome types for docstore
//!
//! Only write-path failures travel through [`Result`]. Reloads and deletes
//! report what happened through their own outcome enums instead, so a
//! corrupt backing file or a bad delete query never surfaces as an `Err`.

use std::fmt;
use std::io;

/// Result type alias for docstore operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for store operations
#[derive(Debug)]
pub enum Error {
    /// I/O error while writing the backing file
    Io(io::Error),

    /// JSON serialization error
    Json(serde_json::Error),

    /// Query, record or update text is not valid JSON
    MalformedInput(String),

    /// Query has the wrong shape
    InvalidQuery(String),

    /// Update spec has the wrong shape
    InvalidUpdate(String),

    /// Record or record sequence has the wrong shape
    InvalidRecord(String),

    /// Backing file holds no data
    EmptyFile(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Json(e) => write!(f, "JSON error: {}", e),
            Error::MalformedInput(msg) => write!(f, "Malformed input: {}", msg),
            Error::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
            Error::InvalidUpdate(msg) => write!(f, "Invalid update: {}", msg),
            Error::InvalidRecord(msg) => write!(f, "Invalid record: {}", msg),
            Error::EmptyFile(path) => write!(f, "Backing file {} is empty", path),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err)
    }
}

/// Result of reloading the collection from the backing file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File parsed; the collection now holds this many records
    Loaded(usize),

    /// File missing, empty or unreadable; previous collection kept
    Retained(String),
}

impl LoadOutcome {
    /// Whether the in-memory collection was replaced
    pub fn is_loaded(&self) -> bool {
        matches!(self, LoadOutcome::Loaded(_))
    }
}

/// Result of an update operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// This many records had the target field overwritten
    Modified(usize),

    /// No record was modified and the update pair was inserted instead
    Upserted,

    /// Nothing changed
    Unchanged,
}

/// Result of a delete operation. Failures are captured here, never returned
/// as `Err`.
#[derive(Debug)]
pub enum DeleteOutcome {
    /// This many records were removed and the file rewritten
    Removed(usize),

    /// Query was absent or matched nothing
    NoMatch,

    /// The delete was abandoned; the error has already been logged
    Failed(Error),
}

impl DeleteOutcome {
    /// Number of records removed, zero for anything but `Removed`
    pub fn removed(&self) -> usize {
        match self {
            DeleteOutcome::Removed(n) => *n,
            _ => 0,
        }
    }
}
