//! Error types for the MedAssist tooling.
//!
//! Library crates use [`MedAssistError`] via `thiserror`.
//! App crates (models/kb) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all MedAssist operations.
#[derive(Debug, thiserror::Error)]
pub enum MedAssistError {
    /// Requested catalog id is not in the artifact catalog.
    #[error("unknown model '{id}' (available: {})", available.join(", "))]
    UnknownArtifact { id: String, available: Vec<String> },

    /// Transport or I/O failure while downloading an artifact.
    #[error("download of {} failed: {cause}", target.display())]
    DownloadFailed { target: PathBuf, cause: String },

    /// A file named by a verify/list operation does not exist.
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// No text-extraction backend could read the document.
    #[error("could not read document {}: {cause}", path.display())]
    DocumentReadFailed { path: PathBuf, cause: String },

    /// Writing the knowledge base file failed.
    #[error("failed to write knowledge base to {}: {cause}", path.display())]
    SerializationFailed { path: PathBuf, cause: String },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error outside a download (client construction, etc.).
    #[error("network error: {0}")]
    Network(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, MedAssistError>;

impl MedAssistError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a download failure for `target`.
    pub fn download(target: impl Into<PathBuf>, cause: impl ToString) -> Self {
        Self::DownloadFailed {
            target: target.into(),
            cause: cause.to_string(),
        }
    }

    /// Create a document read failure for `path`.
    pub fn document(path: impl Into<PathBuf>, cause: impl ToString) -> Self {
        Self::DocumentReadFailed {
            path: path.into(),
            cause: cause.to_string(),
        }
    }

    /// Create a serialization failure for `path`.
    pub fn serialization(path: impl Into<PathBuf>, cause: impl ToString) -> Self {
        Self::SerializationFailed {
            path: path.into(),
            cause: cause.to_string(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
