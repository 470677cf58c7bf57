//! Plain-text extraction from source documents.
//!
//! This crate provides:
//! - [`TextExtractor`]: the capability every extraction backend implements
//! - [`backends`]: PDF backends built on `pdf-extract` and `lopdf`
//! - [`ExtractorChain`]: tries backends in a fixed order, falling back on failure

pub mod backends;

use std::path::Path;

use tracing::{debug, warn};

use medassist_shared::{MedAssistError, Result};

pub use backends::{LayoutTextBackend, PageTextBackend};

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// A strategy for turning a document on disk into plain text.
pub trait TextExtractor: Send + Sync {
    /// Extract the document's text. Errors are `DocumentReadFailed`.
    fn extract(&self, path: &Path) -> Result<String>;

    /// Human-readable backend name for tracing.
    fn name(&self) -> &str;
}

// ---------------------------------------------------------------------------
// Chain
// ---------------------------------------------------------------------------

/// Holds extraction backends in priority order.
pub struct ExtractorChain {
    backends: Vec<Box<dyn TextExtractor>>,
}

impl ExtractorChain {
    /// Create a chain with the built-in PDF backends (layout text first, page text second).
    pub fn new() -> Self {
        Self::with_backends(vec![Box::new(LayoutTextBackend), Box::new(PageTextBackend)])
    }

    /// Create a chain from explicit backends, tried in the given order.
    pub fn with_backends(backends: Vec<Box<dyn TextExtractor>>) -> Self {
        Self { backends }
    }

    /// Backend names in the order they are tried.
    pub fn backend_names(&self) -> Vec<&str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    /// Extract text with the first backend that succeeds.
    ///
    /// A backend that returns only whitespace counts as failed. If every
    /// backend fails, the error names the last cause.
    pub fn extract(&self, path: &Path) -> Result<String> {
        let mut last_cause = String::from("no extraction backend configured");

        for backend in &self.backends {
            match backend.extract(path) {
                Ok(text) if !text.trim().is_empty() => {
                    debug!(
                        path = %path.display(),
                        backend = backend.name(),
                        bytes = text.len(),
                        "text extracted"
                    );
                    return Ok(text);
                }
                Ok(_) => {
                    warn!(path = %path.display(), backend = backend.name(), "backend found no text");
                    last_cause = format!("{}: no text found", backend.name());
                }
                Err(e) => {
                    warn!(path = %path.display(), backend = backend.name(), error = %e, "backend failed");
                    last_cause = match e {
                        MedAssistError::DocumentReadFailed { cause, .. } => {
                            format!("{}: {cause}", backend.name())
                        }
                        other => format!("{}: {other}", backend.name()),
                    };
                }
            }
        }

        Err(MedAssistError::document(path, last_cause))
    }
}

impl Default for ExtractorChain {
    fn default() -> Self {
        Self::new()
    }
}
