use serde_json::{json, Value};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during file operations
#[derive(Error, Debug)]
pub enum FileError {
    /// Target file does not exist
    #[error("File '{name}' not found")]
    NotFound { name: String },

    /// File contents are not valid JSON
    #[error("Invalid JSON format: {0}")]
    InvalidJson(#[source] serde_json::Error),

    /// CSV could not be decoded or encoded
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Any other platform failure (permissions, disk, encoding)
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Value could not be encoded as JSON
    #[error("Failed to serialize JSON: {0}")]
    Serialize(#[source] serde_json::Error),

    /// CSV record carries a key that is not one of the fieldnames
    #[error("Record contains field '{field}' not in fieldnames")]
    UnknownField { field: String },

    /// write_csv called without any rows
    #[error("No rows to write")]
    EmptyDataset,

    /// Filename resolves outside the base directory
    #[error("Path '{name}' escapes the base directory")]
    OutsideBase { name: String },
}

/// Coarse classification of a [`FileError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Decode,
    Io,
    Rejected,
}

/// Result type for file operations
pub type FileResult<T> = Result<T, FileError>;

impl FileError {
    /// Create a not-found error
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an I/O error for a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Classify an I/O error raised while opening `name` for reading.
    ///
    /// A missing file becomes [`FileError::NotFound`]; everything else is kept
    /// as [`FileError::Io`].
    pub fn from_read(name: &str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::not_found(name)
        } else {
            Self::io(path, source)
        }
    }

    /// Create an outside-base error
    pub fn outside_base(name: impl Into<String>) -> Self {
        Self::OutsideBase { name: name.into() }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::InvalidJson(_) | Self::Csv(_) => ErrorKind::Decode,
            Self::Io { .. } | Self::Serialize(_) => ErrorKind::Io,
            Self::UnknownField { .. } | Self::EmptyDataset | Self::OutsideBase { .. } => {
                ErrorKind::Rejected
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Short reason used inside the JSON/CSV sentinels
    fn reason(&self) -> String {
        match self {
            Self::InvalidJson(_) => "Invalid JSON format".to_string(),
            Self::Io { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }

    /// Legacy text rendering: `Error: File '<name>' not found` or
    /// `Error reading file: <message>`.
    pub fn text_sentinel(&self) -> String {
        match self {
            Self::NotFound { name } => format!("Error: File '{}' not found", name),
            other => format!("Error reading file: {}", other.reason()),
        }
    }

    /// Legacy JSON rendering: `{"error": "<reason>"}`
    pub fn json_sentinel(&self) -> Value {
        json!({ "error": self.reason() })
    }

    /// Legacy CSV rendering: a single row holding the error reason
    pub fn csv_sentinel(&self) -> Value {
        json!([{ "error": self.reason() }])
    }
}
