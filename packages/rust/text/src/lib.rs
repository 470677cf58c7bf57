//! Text normalization, chunking, and tagging for medical passages.
//!
//! Every function here is a pure, deterministic transform over strings:
//! - [`clean_text`]: strip page numbers and stray symbols, collapse whitespace
//! - [`chunk_text`]: group sentences into bounded, medically relevant passages
//! - [`categorize`], [`priority`], [`keywords`]: first-match-wins tagging

mod chunker;
mod classify;
mod normalize;

pub use chunker::{DEFAULT_TARGET_WORD_COUNT, MIN_PASSAGE_CHARS, RELEVANCE_TERMS, chunk_text};
pub use classify::{
    CATEGORY_GROUPS, KEYWORD_CANDIDATES, MAX_KEYWORDS, PRIORITY_LEVELS, categorize, keywords,
    priority,
};
pub use normalize::clean_text;
