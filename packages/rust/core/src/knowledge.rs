//! Knowledge base file writer and reader.
//!
//! The output file is written atomically: serialize into a hidden temp file
//! next to the target, then rename it into place.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument};

use medassist_shared::{Category, KnowledgeBase, MedAssistError, Result};

/// Serialize `kb` as pretty-printed JSON to `<output_dir>/<file_name>`.
///
/// Any failure is reported as [`MedAssistError::SerializationFailed`] and
/// leaves neither the temp file nor a partial target behind.
#[instrument(skip(kb), fields(entries = kb.metadata.total_entries, dir = %output_dir.display()))]
pub fn write_knowledge_base(kb: &KnowledgeBase, output_dir: &Path, file_name: &str) -> Result<PathBuf> {
    let target = output_dir.join(file_name);

    std::fs::create_dir_all(output_dir).map_err(|e| MedAssistError::serialization(&target, e))?;

    let json = serde_json::to_string_pretty(kb).map_err(|e| MedAssistError::serialization(&target, e))?;

    let temp = output_dir.join(format!(".{file_name}.tmp"));
    let written = std::fs::write(&temp, json).and_then(|()| std::fs::rename(&temp, &target));
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp);
        return Err(MedAssistError::serialization(&target, e));
    }

    info!(path = %target.display(), "wrote knowledge base");
    Ok(target)
}

/// Read a knowledge base file written by [`write_knowledge_base`].
pub fn load_knowledge_base(path: &Path) -> Result<KnowledgeBase> {
    if !path.exists() {
        return Err(MedAssistError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = std::fs::read_to_string(path).map_err(|e| MedAssistError::io(path, e))?;
    let kb: KnowledgeBase =
        serde_json::from_str(&content).map_err(|e| MedAssistError::serialization(path, e))?;

    debug!(path = %path.display(), entries = kb.knowledge_base.len(), "loaded knowledge base");
    Ok(kb)
}

/// Entry count per category, in category order.
pub fn category_counts(kb: &KnowledgeBase) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for entry in &kb.knowledge_base {
        *counts.entry(entry.category).or_insert(0) += 1;
    }
    counts
}
