//! Error kinds raised while loading and reading trip aggregates.

use std::path::PathBuf;
use thiserror::Error;

/// A positional read outside `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("index {index} out of range for sequence of length {len}")]
pub struct OutOfRange {
    pub index: usize,
    pub len: usize,
}

/// A CSV row that could not be turned into a trip record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("missing field {position} ({name}): row has {found} fields")]
    MissingField {
        position: usize,
        name: &'static str,
        found: usize,
    },

    #[error("field {name} is not numeric: {value:?}")]
    NotNumeric { name: &'static str, value: String },
}

/// Failure of a quarter load. The store keeps whatever was ingested before it.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot open source file {}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot read source file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("row {row} of {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        row: u64,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    /// Path of the file that caused the failure.
    pub fn path(&self) -> &std::path::Path {
        match self {
            LoadError::Open { path, .. }
            | LoadError::Read { path, .. }
            | LoadError::Parse { path, .. } => path.as_path(),
        }
    }
}
