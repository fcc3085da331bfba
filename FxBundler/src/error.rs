//! Error types for `FxBundler`

use std::path::PathBuf;

use thiserror::Error;

/// The error type for `FxBundler` operations.
///
/// Only run-setup failures surface as this type from [`crate::bundle`].
/// Failures tied to a single asset are reported as [`crate::resolver::Warning`]s instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The package root or asset directory could not be created.
    #[error("failed to prepare package directory {path}: {source}")]
    PackageSetup {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },

    // ==================== Validation Errors ====================
    /// A bundle request was rejected before any IO took place.
    #[error("invalid {field}: {message}")]
    Validation {
        /// The offending request field (e.g. "name", "output directory").
        field: &'static str,
        /// Why the value was rejected.
        message: String,
    },

    // ==================== Archive Errors ====================
    /// The requested entry does not exist in the archive corpus.
    #[error("entry not found in corpus: {0}")]
    EntryNotFound(String),

    /// Reading an entry's bytes from the corpus failed.
    #[error("failed to extract {path}: {message}")]
    Extraction {
        /// Virtual path of the entry.
        path: String,
        /// The extraction error message.
        message: String,
    },

    // ==================== Resource Errors ====================
    /// A resource could not be parsed into its structured form.
    #[error("failed to parse {kind} resource: {message}")]
    Parse {
        /// The resource kind that was being parsed (e.g. "drawable").
        kind: &'static str,
        /// The parse error message.
        message: String,
    },

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    // ==================== Configuration Errors ====================
    /// A resolver table file could not be parsed.
    #[error("invalid resolver tables: {0}")]
    TablesParse(#[from] toml::de::Error),

    /// Resolver tables could not be serialized.
    #[error("failed to serialize resolver tables: {0}")]
    TablesSerialize(#[from] toml::ser::Error),

    // ==================== File System Errors ====================
    /// Invalid file path.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// Directory traversal error.
    #[error("directory walk error: {0}")]
    WalkDirError(String),
}

impl From<walkdir::Error> for Error {
    fn from(err: walkdir::Error) -> Self {
        Error::WalkDirError(err.to_string())
    }
}

impl Error {
    /// Shorthand for a [`Error::Validation`] error.
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Error::Validation {
            field,
            message: message.into(),
        }
    }

    /// Shorthand for a [`Error::Parse`] error.
    pub(crate) fn parse(kind: &'static str, message: impl ToString) -> Self {
        Error::Parse {
            kind,
            message: message.to_string(),
        }
    }
}

/// A specialized Result type for `FxBundler` operations.
pub type Result<T> = std::result::Result<T, Error>;
