//! Document → guideline extraction pipeline.
//!
//! raw text → sections → clean → categorize → chunk → tag → entries.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, instrument, warn};

use medassist_documents::ExtractorChain;
use medassist_shared::{ExtractorConfig, GuidelineEntry, MedAssistError, Result};
use medassist_text::{DEFAULT_TARGET_WORD_COUNT, categorize, chunk_text, clean_text, keywords, priority};

use crate::samples::sample_entries;

/// Line prefixes that open a new section (matched case-insensitively).
pub const SECTION_HEADERS: &[&str] = &["TREATMENT", "DIAGNOSIS", "SYMPTOMS", "MANAGEMENT", "PROCEDURE"];

/// Sections whose cleaned text is shorter than this are dropped.
const MIN_SECTION_CHARS: usize = 100;

/// Extension of source documents picked up from the input directory.
const DOCUMENT_EXTENSION: &str = "pdf";

/// Options for turning document text into guideline entries.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Approximate passage size in words.
    pub target_word_count: usize,
    /// Provenance tag written into every entry.
    pub source_tag: String,
    /// Prefix ids with a slug of the document file stem.
    pub document_scoped_ids: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            target_word_count: DEFAULT_TARGET_WORD_COUNT,
            source_tag: "medical_pdf".to_string(),
            document_scoped_ids: false,
        }
    }
}

impl From<&ExtractorConfig> for ExtractOptions {
    fn from(config: &ExtractorConfig) -> Self {
        Self {
            target_word_count: config.target_word_count,
            source_tag: config.source_tag.clone(),
            document_scoped_ids: config.document_scoped_ids,
        }
    }
}

/// Result of processing a source directory.
#[derive(Debug, Default)]
pub struct ExtractionReport {
    /// All entries, in document order.
    pub entries: Vec<GuidelineEntry>,
    /// Number of documents that produced text.
    pub documents_processed: usize,
    /// Documents skipped because no backend could read them.
    pub documents_failed: Vec<(PathBuf, String)>,
    /// Whether the built-in sample set replaced document output.
    pub used_samples: bool,
}

/// Progress callback for directory processing.
pub trait ProgressReporter: Send + Sync {
    /// Called before a document is read.
    fn document_started(&self, name: &str, current: usize, total: usize);
    /// Called when a document has been turned into entries.
    fn document_finished(&self, name: &str, entries: usize);
    /// Called when a document is skipped.
    fn document_failed(&self, name: &str, error: &MedAssistError);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn document_started(&self, _name: &str, _current: usize, _total: usize) {}
    fn document_finished(&self, _name: &str, _entries: usize) {}
    fn document_failed(&self, _name: &str, _error: &MedAssistError) {}
}

// ---------------------------------------------------------------------------
// Single document
// ---------------------------------------------------------------------------

/// Split raw document text before every line that starts with a section header.
///
/// The first line never opens a split, so text starting with a header is one
/// section rather than an empty one followed by the header section.
pub fn split_sections(text: &str) -> Vec<String> {
    let mut sections: Vec<String> = Vec::new();
    let mut current = String::new();

    for (n, line) in text.lines().enumerate() {
        if n > 0 && is_section_header(line) {
            sections.push(std::mem::take(&mut current));
        } else if n > 0 {
            current.push('\n');
        }
        current.push_str(line);
    }
    sections.push(current);

    sections
}

fn is_section_header(line: &str) -> bool {
    SECTION_HEADERS.iter().any(|header| {
        line.get(..header.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(header))
    })
}

/// Turn one document's raw text into guideline entries with `<category>_<i>_<j>` ids.
pub fn extract_guidelines(raw_text: &str, opts: &ExtractOptions) -> Vec<GuidelineEntry> {
    build_entries(raw_text, opts, None)
}

fn build_entries(raw_text: &str, opts: &ExtractOptions, id_prefix: Option<&str>) -> Vec<GuidelineEntry> {
    let mut entries = Vec::new();

    for (i, section) in split_sections(raw_text).iter().enumerate() {
        let cleaned = clean_text(section);
        if cleaned.chars().count() < MIN_SECTION_CHARS {
            continue;
        }

        // One category per section, from the whole section text.
        let category = categorize(&cleaned);

        for (j, passage) in chunk_text(&cleaned, opts.target_word_count).into_iter().enumerate() {
            let id = match id_prefix {
                Some(prefix) => format!("{prefix}_{category}_{i}_{j}"),
                None => format!("{category}_{i}_{j}"),
            };

            entries.push(GuidelineEntry {
                id,
                category,
                priority: priority(&passage),
                keywords: keywords(&passage),
                source: opts.source_tag.clone(),
                text: passage,
            });
        }
    }

    entries
}

/// Lowercase slug of a document's file stem, used as an id prefix.
pub fn document_slug(path: &Path) -> String {
    static NON_ALNUM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let slug = NON_ALNUM_RE.replace_all(&stem, "_");
    let slug = slug.trim_matches('_');

    if slug.is_empty() {
        "doc".to_string()
    } else {
        slug.to_string()
    }
}

// ---------------------------------------------------------------------------
// Directory
// ---------------------------------------------------------------------------

/// Extract guidelines from every PDF in `dir`, in directory-listing order.
///
/// A missing directory or one without PDFs yields the built-in sample set.
/// Documents no backend can read are logged and skipped.
#[instrument(skip_all, fields(dir = %dir.display()))]
pub fn process_directory(
    dir: &Path,
    chain: &ExtractorChain,
    opts: &ExtractOptions,
    progress: &dyn ProgressReporter,
) -> Result<ExtractionReport> {
    let documents = list_documents(dir)?;

    if documents.is_empty() {
        let entries = sample_entries();
        info!(count = entries.len(), "no PDF documents found, using sample knowledge");
        return Ok(ExtractionReport {
            entries,
            used_samples: true,
            ..ExtractionReport::default()
        });
    }

    info!(count = documents.len(), "processing PDF documents");

    let mut report = ExtractionReport::default();
    let total = documents.len();

    for (n, path) in documents.iter().enumerate() {
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        progress.document_started(&name, n + 1, total);

        let raw = match chain.extract(path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(document = %name, error = %e, "skipping unreadable document");
                progress.document_failed(&name, &e);
                report.documents_failed.push((path.clone(), e.to_string()));
                continue;
            }
        };

        let prefix = opts.document_scoped_ids.then(|| document_slug(path));
        let entries = build_entries(&raw, opts, prefix.as_deref());

        info!(document = %name, entries = entries.len(), "extracted guidelines");
        progress.document_finished(&name, entries.len());

        report.documents_processed += 1;
        report.entries.extend(entries);
    }

    let duplicates = count_duplicate_ids(&report.entries);
    if duplicates > 0 {
        warn!(
            duplicates,
            "entry ids collide across documents; enable extractor.document_scoped_ids to disambiguate"
        );
    }

    Ok(report)
}

/// PDF files in `dir`, in listing order. A missing directory has none.
fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!(dir = %dir.display(), "source directory does not exist");
            return Ok(Vec::new());
        }
        Err(e) => return Err(MedAssistError::io(dir, e)),
    };

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| MedAssistError::io(dir, e))?.path();
        let is_pdf = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENT_EXTENSION));
        if is_pdf && path.is_file() {
            documents.push(path);
        }
    }

    Ok(documents)
}

/// Number of entries whose id was already used earlier in the run.
pub fn count_duplicate_ids(entries: &[GuidelineEntry]) -> usize {
    let mut seen = HashSet::new();
    entries.iter().filter(|e| !seen.insert(e.id.as_str())).count()
}

#[cfg(test)]
mod tests {
    use medassist_documents::TextExtractor;
    use medassist_shared::{Category, Priority};

    use super::*;

    /// Reads documents as UTF-8 text; files containing `UNREADABLE` fail.
    struct PlainText;

    impl TextExtractor for PlainText {
        fn extract(&self, path: &Path) -> Result<String> {
            let text = std::fs::read_to_string(path).map_err(|e| MedAssistError::document(path, e))?;
            if text.contains("UNREADABLE") {
                return Err(MedAssistError::document(path, "corrupt xref table"));
            }
            Ok(text)
        }

        fn name(&self) -> &str {
            "plain-text"
        }
    }

    fn plain_chain() -> ExtractorChain {
        ExtractorChain::with_backends(vec![Box::new(PlainText)])
    }

    /// A single sentence about tourniquets, no section headers.
    const TOURNIQUET: &str = "Apply a tourniquet two inches above the injury site when bleeding \
                              from a limb cannot be controlled by direct pressure on the limb.";

    const FIELD_MANUAL: &str = include_str!("../../../../fixtures/text/field_manual.txt");

    #[test]
    fn tourniquet_sentence_yields_one_bleeding_entry() {
        assert!(TOURNIQUET.chars().count() > MIN_SECTION_CHARS);

        let entries = extract_guidelines(TOURNIQUET, &ExtractOptions::default());
        assert_eq!(entries.len(), 1);

        let entry = &entries[0];
        assert_eq!(entry.id, "bleeding_control_0_0");
        assert_eq!(entry.category, Category::BleedingControl);
        assert_eq!(entry.source, "medical_pdf");
        assert_eq!(entry.priority, Priority::Medium);
        assert!(entry.keywords.contains(&"bleeding".to_string()));
        assert_eq!(entry.text, TOURNIQUET);
    }

    #[test]
    fn split_sections_on_header_lines() {
        let text = "Intro line\nTREATMENT of burns\ncool water\ndiagnosis: check\nProcedure B";
        let sections = split_sections(text);
        assert_eq!(
            sections,
            vec![
                "Intro line".to_string(),
                "TREATMENT of burns\ncool water".to_string(),
                "diagnosis: check".to_string(),
                "Procedure B".to_string(),
            ]
        );
    }

    #[test]
    fn split_ignores_headers_mid_line_and_on_first_line() {
        let text = "TREATMENT first\nthe treatment continues\n  MANAGEMENT indented";
        assert_eq!(split_sections(text), vec![text.to_string()]);
    }

    #[test]
    fn all_passages_of_a_section_share_its_category() {
        // Only the first sentence mentions surgery; the second only talks about bleeding.
        let text = "Surgery is the definitive step for this patient group and it must be planned \
                    with the patient, the family and the whole team. Bleeding from the scalp is \
                    heavy and must be controlled with firm pressure on the wound edges before any transfer.";
        let opts = ExtractOptions {
            target_word_count: 30,
            ..ExtractOptions::default()
        };

        let entries = extract_guidelines(text, &opts);
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| e.category == Category::WarSurgery));
        assert!(entries[1].text.starts_with("Bleeding from the scalp"));
        assert_eq!(entries[0].id, "war_surgery_0_0");
        assert_eq!(entries[1].id, "war_surgery_0_1");
    }

    #[test]
    fn fixture_sections_are_categorized_independently() {
        let entries = extract_guidelines(FIELD_MANUAL, &ExtractOptions::default());

        let ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(
            ids,
            vec!["bleeding_control_1_0", "burns_2_0", "fractures_4_0"]
        );
        // Sections 0 and 3 are too short to keep.
        assert_eq!(entries[0].priority, Priority::Critical);
        assert_eq!(entries[2].priority, Priority::Low);
        assert!(entries.iter().all(|e| e.keywords.len() <= 10));
        assert!(entries.iter().all(|e| !e.text.contains('\n')));
    }

    #[test]
    fn short_sections_are_dropped() {
        let text = format!("TREATMENT\nshort\nMANAGEMENT\n{TOURNIQUET}");
        let entries = extract_guidelines(&text, &ExtractOptions::default());
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "bleeding_control_1_0");
    }

    #[test]
    fn source_tag_comes_from_options() {
        let opts = ExtractOptions {
            source_tag: "icrc_war_surgery".into(),
            ..ExtractOptions::default()
        };
        let entries = extract_guidelines(TOURNIQUET, &opts);
        assert_eq!(entries[0].source, "icrc_war_surgery");
    }

    #[test]
    fn document_slug_normalizes_stem() {
        assert_eq!(document_slug(Path::new("pdfs/War Surgery Vol.1.pdf")), "war_surgery_vol_1");
        assert_eq!(document_slug(Path::new("--.pdf")), "doc");
    }

    #[test]
    fn missing_directory_yields_samples() {
        let tmp = tempfile::tempdir().unwrap();
        let report = process_directory(
            &tmp.path().join("absent"),
            &plain_chain(),
            &ExtractOptions::default(),
            &SilentProgress,
        )
        .unwrap();

        assert!(report.used_samples);
        assert_eq!(report.entries, sample_entries());
    }

    #[test]
    fn directory_without_pdfs_yields_samples() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("readme.txt"), TOURNIQUET).unwrap();

        let report =
            process_directory(tmp.path(), &plain_chain(), &ExtractOptions::default(), &SilentProgress)
                .unwrap();
        assert!(report.used_samples);
        assert_eq!(report.entries, sample_entries());
    }

    #[test]
    fn unreadable_document_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("good.pdf"), TOURNIQUET).unwrap();
        std::fs::write(tmp.path().join("broken.pdf"), "UNREADABLE").unwrap();

        let report =
            process_directory(tmp.path(), &plain_chain(), &ExtractOptions::default(), &SilentProgress)
                .unwrap();

        assert!(!report.used_samples);
        assert_eq!(report.documents_processed, 1);
        assert_eq!(report.documents_failed.len(), 1);
        assert!(report.documents_failed[0].0.ends_with("broken.pdf"));
        assert!(report.documents_failed[0].1.contains("corrupt xref table"));
        assert_eq!(report.entries.len(), 1);
    }

    #[test]
    fn ids_collide_across_documents_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("manual_a.pdf"), TOURNIQUET).unwrap();
        std::fs::write(tmp.path().join("manual_b.pdf"), TOURNIQUET).unwrap();

        let report =
            process_directory(tmp.path(), &plain_chain(), &ExtractOptions::default(), &SilentProgress)
                .unwrap();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(count_duplicate_ids(&report.entries), 1);
    }

    #[test]
    fn document_scoped_ids_are_unique() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join("manual_a.pdf"), TOURNIQUET).unwrap();
        std::fs::write(tmp.path().join("manual_b.pdf"), TOURNIQUET).unwrap();

        let opts = ExtractOptions {
            document_scoped_ids: true,
            ..ExtractOptions::default()
        };
        let report = process_directory(tmp.path(), &plain_chain(), &opts, &SilentProgress).unwrap();

        assert_eq!(count_duplicate_ids(&report.entries), 0);
        let mut ids: Vec<&str> = report.entries.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        assert_eq!(
            ids,
            vec!["manual_a_bleeding_control_0_0", "manual_b_bleeding_control_0_0"]
        );
    }

    #[test]
    fn options_from_config() {
        let config = ExtractorConfig {
            target_word_count: 120,
            document_scoped_ids: true,
            ..ExtractorConfig::default()
        };
        let opts = ExtractOptions::from(&config);
        assert_eq!(opts.target_word_count, 120);
        assert_eq!(opts.source_tag, "medical_pdf");
        assert!(opts.document_scoped_ids);
    }
}
