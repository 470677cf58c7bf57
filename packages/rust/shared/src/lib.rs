//! Shared types, error model, and configuration for the MedAssist tooling.
//!
//! This crate is the foundation depended on by all other MedAssist crates.
//! It provides:
//! - [`MedAssistError`]: the unified error type
//! - Domain types ([`ArtifactDescriptor`], [`GuidelineEntry`], [`KnowledgeBase`])
//! - Configuration ([`AppConfig`], [`FetcherConfig`], [`ExtractorConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, ExtractorConfig, FetcherConfig, MAX_TARGET_WORD_COUNT, load_config, load_config_from,
};
pub use error::{MedAssistError, Result};
pub use types::{
    ArtifactDescriptor, Category, GuidelineEntry, KNOWLEDGE_BASE_VERSION, KnowledgeBase,
    KnowledgeBaseMetadata, Priority,
};
