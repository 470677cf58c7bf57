//! Knowledge-base extraction for MedAssist.
//!
//! Ties document text extraction, cleaning, chunking, and tagging together
//! into the directory-to-JSON workflow (`process_directory` then
//! `write_knowledge_base`).

pub mod knowledge;
pub mod pipeline;
pub mod samples;

pub use knowledge::{category_counts, load_knowledge_base, write_knowledge_base};
pub use pipeline::{
    ExtractOptions, ExtractionReport, ProgressReporter, SECTION_HEADERS, SilentProgress,
    count_duplicate_ids, document_slug, extract_guidelines, process_directory, split_sections,
};
pub use samples::sample_entries;
