//! Whole-document layout text via `pdf-extract`.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::path::Path;

use medassist_shared::{MedAssistError, Result};

use crate::TextExtractor;

/// Primary backend: reconstructs reading-order text for the whole file.
pub struct LayoutTextBackend;

impl TextExtractor for LayoutTextBackend {
    fn extract(&self, path: &Path) -> Result<String> {
        // pdf-extract panics on some malformed inputs instead of returning an error.
        let outcome = catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));

        match outcome {
            Ok(Ok(text)) => Ok(text),
            Ok(Err(e)) => Err(MedAssistError::document(path, e)),
            Err(_) => Err(MedAssistError::document(path, "parser panicked")),
        }
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}
