//! Page-by-page text via `lopdf`.

use std::path::Path;

use lopdf::Document;
use tracing::debug;

use medassist_shared::{MedAssistError, Result};

use crate::TextExtractor;

/// Fallback backend: reads each page's content stream independently, so one
/// unreadable page does not lose the rest of the document.
pub struct PageTextBackend;

impl TextExtractor for PageTextBackend {
    fn extract(&self, path: &Path) -> Result<String> {
        let doc = Document::load(path).map_err(|e| MedAssistError::document(path, e))?;

        let mut text = String::new();
        for page_number in doc.get_pages().keys() {
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) => {
                    text.push_str(&page_text);
                    text.push('\n');
                }
                Err(e) => debug!(path = %path.display(), page_number, error = %e, "page skipped"),
            }
        }

        Ok(text)
    }

    fn name(&self) -> &str {
        "lopdf"
    }
}
