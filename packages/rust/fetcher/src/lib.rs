//! GGUF model catalog and downloader.
//!
//! This crate provides:
//! - [`catalog`]: the static table of known model files
//! - [`ModelFetcher`]: idempotent streaming downloads, verification, and listing
//! - [`DownloadProgress`]: progress callback implemented by the CLI

pub mod catalog;
mod downloader;

pub use catalog::CATALOG;
pub use downloader::{
    BatchReport, CatalogStatus, DownloadProgress, DownloadedModel, FetchOutcome, GGUF_MAGIC,
    MODEL_EXTENSION, ModelFetcher, SilentProgress, VerifyReport,
};
