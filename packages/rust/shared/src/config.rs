//! Application configuration for the MedAssist tooling.
//!
//! Config lives in `medassist.toml` in the working directory, or at the path
//! given with `--config`. Every value has a relative-path default, so the
//! tools run without any config file at all.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MedAssistError, Result};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = "medassist.toml";

/// Largest accepted `extractor.target_word_count`.
pub const MAX_TARGET_WORD_COUNT: usize = 100_000;

// ---------------------------------------------------------------------------
// Config structs (matching medassist.toml schema)
// ---------------------------------------------------------------------------

/// Top-level application config, deserialized from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Model fetcher settings.
    #[serde(default)]
    pub fetcher: FetcherConfig,

    /// Knowledge extractor settings.
    #[serde(default)]
    pub extractor: ExtractorConfig,
}

/// `[fetcher]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Directory model files are downloaded into.
    #[serde(default = "default_models_dir")]
    pub models_dir: PathBuf,

    /// Write buffer size in bytes used while streaming a download.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,

    /// Per-request timeout. Unset means block until the transport gives up.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            buffer_size: default_buffer_size(),
            timeout_secs: None,
        }
    }
}

fn default_models_dir() -> PathBuf {
    PathBuf::from("models")
}
fn default_buffer_size() -> usize {
    8192
}

/// `[extractor]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Directory scanned for PDF documents when no CLI argument is given.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// Directory the knowledge base file is written into.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Knowledge base file name.
    #[serde(default = "default_output_file")]
    pub output_file: String,

    /// Approximate passage size in words (5 characters per word).
    #[serde(default = "default_target_word_count")]
    pub target_word_count: usize,

    /// Provenance tag written into every extracted entry.
    #[serde(default = "default_source_tag")]
    pub source_tag: String,

    /// Prefix entry ids with the document file stem.
    #[serde(default)]
    pub document_scoped_ids: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            output_file: default_output_file(),
            target_word_count: default_target_word_count(),
            source_tag: default_source_tag(),
            document_scoped_ids: false,
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("medical_pdfs")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("../assets")
}
fn default_output_file() -> String {
    "medical_knowledge_rag.json".into()
}
fn default_target_word_count() -> usize {
    200
}
fn default_source_tag() -> String {
    "medical_pdf".into()
}

impl AppConfig {
    /// Reject values the tools cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.buffer_size == 0 {
            return Err(MedAssistError::config("fetcher.buffer_size must be positive"));
        }
        if self.extractor.target_word_count == 0 {
            return Err(MedAssistError::config(
                "extractor.target_word_count must be positive",
            ));
        }
        if self.extractor.target_word_count > MAX_TARGET_WORD_COUNT {
            return Err(MedAssistError::config(format!(
                "extractor.target_word_count must be at most {MAX_TARGET_WORD_COUNT}"
            )));
        }
        if self.extractor.output_file.trim().is_empty() {
            return Err(MedAssistError::config("extractor.output_file is empty"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the application config.
///
/// An explicit path must exist. Without one, `./medassist.toml` is used when
/// present and defaults otherwise.
pub fn load_config(explicit: Option<&Path>) -> Result<AppConfig> {
    let config = match explicit {
        Some(path) => load_config_from(path)?,
        None => {
            let path = Path::new(CONFIG_FILE_NAME);
            if path.exists() {
                load_config_from(path)?
            } else {
                tracing::debug!(?path, "config file not found, using defaults");
                AppConfig::default()
            }
        }
    };

    config.validate()?;
    Ok(config)
}

/// Load the application config from a specific file path.
pub fn load_config_from(path: &Path) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| MedAssistError::io(path, e))?;

    toml::from_str(&content).map_err(|e| {
        MedAssistError::config(format!("failed to parse {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("models_dir"));
        assert!(toml_str.contains("medical_knowledge_rag.json"));
    }

    #[test]
    fn config_roundtrip() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize");
        let parsed: AppConfig = toml::from_str(&toml_str).expect("deserialize");
        assert_eq!(parsed.fetcher.buffer_size, 8192);
        assert_eq!(parsed.extractor.target_word_count, 200);
        assert_eq!(parsed.extractor.source_tag, "medical_pdf");
    }

    #[test]
    fn partial_config_keeps_defaults() {
        let toml_str = r#"
[extractor]
output_dir = "out"
document_scoped_ids = true
"#;
        let config: AppConfig = toml::from_str(toml_str).expect("parse");
        assert_eq!(config.extractor.output_dir, PathBuf::from("out"));
        assert!(config.extractor.document_scoped_ids);
        assert_eq!(config.extractor.source_dir, PathBuf::from("medical_pdfs"));
        assert_eq!(config.fetcher.models_dir, PathBuf::from("models"));
        assert_eq!(config.fetcher.timeout_secs, None);
    }

    #[test]
    fn load_from_explicit_path() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[fetcher]\nmodels_dir = \"weights\"\ntimeout_secs = 30\n")
            .expect("write config");

        let config = load_config(Some(&path)).expect("load");
        assert_eq!(config.fetcher.models_dir, PathBuf::from("weights"));
        assert_eq!(config.fetcher.timeout_secs, Some(30));
    }

    #[test]
    fn missing_explicit_path_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = load_config(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(MedAssistError::Io { .. })));
    }

    #[test]
    fn zero_buffer_rejected() {
        let mut config = AppConfig::default();
        config.fetcher.buffer_size = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("buffer_size"));
    }

    #[test]
    fn oversized_word_target_rejected() {
        let config: AppConfig =
            toml::from_str("[extractor]\ntarget_word_count = 9223372036854775807\n").expect("parse");
        let err = config.validate().unwrap_err();
        assert!(matches!(err, MedAssistError::Config { .. }));
        assert!(err.to_string().contains("target_word_count"));
    }

    #[test]
    fn word_target_upper_bound_accepted() {
        let mut config = AppConfig::default();
        config.extractor.target_word_count = MAX_TARGET_WORD_COUNT;
        assert!(config.validate().is_ok());
    }
}
