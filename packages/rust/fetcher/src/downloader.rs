//! Streaming, idempotent model downloader.
//!
//! Downloads land in `<name>.part` and are renamed onto the final name only
//! after the whole body is written, so the final name is never half-written.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use medassist_shared::{ArtifactDescriptor, FetcherConfig, MedAssistError, Result};

use crate::catalog::{self, CATALOG};

/// Magic bytes at the start of every GGUF file.
pub const GGUF_MAGIC: &[u8; 4] = b"GGUF";

/// Extension of model files in the models directory.
pub const MODEL_EXTENSION: &str = "gguf";

/// Suffix of in-progress downloads.
const PARTIAL_SUFFIX: &str = ".part";

/// User-Agent string for model downloads.
const USER_AGENT: &str = concat!("medassist/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Progress
// ---------------------------------------------------------------------------

/// Progress callback for a single download.
pub trait DownloadProgress: Send + Sync {
    /// Called once the response headers arrive. `total` is the declared length, if any.
    fn started(&self, file_name: &str, total: Option<u64>);
    /// Called after each chunk with the cumulative byte count.
    fn advanced(&self, downloaded: u64);
    /// Called when the file is complete and in place.
    fn finished(&self);
    /// Called when the download is abandoned.
    fn failed(&self);
}

/// No-op progress reporter for headless/test usage.
pub struct SilentProgress;

impl DownloadProgress for SilentProgress {
    fn started(&self, _file_name: &str, _total: Option<u64>) {}
    fn advanced(&self, _downloaded: u64) {}
    fn finished(&self) {}
    fn failed(&self) {}
}

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// The file already existed; nothing was downloaded.
    AlreadyPresent { path: PathBuf },
    /// The file was downloaded.
    Downloaded { path: PathBuf, bytes: u64 },
}

impl FetchOutcome {
    pub fn path(&self) -> &Path {
        match self {
            Self::AlreadyPresent { path } | Self::Downloaded { path, .. } => path,
        }
    }
}

/// Summary of a best-effort multi-model fetch.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Models fetched or already present, by id.
    pub succeeded: Vec<(String, FetchOutcome)>,
    /// Models that failed, by id, with the error message.
    pub failed: Vec<(String, String)>,
}

/// A catalog entry plus whether its file is present locally.
#[derive(Debug, Clone)]
pub struct CatalogStatus {
    pub artifact: ArtifactDescriptor,
    pub downloaded: bool,
}

/// Result of verifying a model file.
#[derive(Debug, Clone)]
pub struct VerifyReport {
    pub path: PathBuf,
    pub size_bytes: u64,
    /// Whether the file starts with [`GGUF_MAGIC`].
    pub magic_ok: bool,
}

/// A model file found in the models directory.
#[derive(Debug, Clone)]
pub struct DownloadedModel {
    pub file_name: String,
    pub size_bytes: u64,
    /// Catalog entry whose derived file name matches, if any.
    pub artifact: Option<ArtifactDescriptor>,
}

// ---------------------------------------------------------------------------
// ModelFetcher
// ---------------------------------------------------------------------------

/// Downloads catalog models into a local directory, one at a time.
pub struct ModelFetcher {
    models_dir: PathBuf,
    client: Client,
    buffer_size: usize,
    catalog: &'static [ArtifactDescriptor],
}

impl ModelFetcher {
    /// Create a fetcher for the built-in catalog.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(10));

        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let client = builder
            .build()
            .map_err(|e| MedAssistError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            models_dir: config.models_dir.clone(),
            client,
            buffer_size: config.buffer_size,
            catalog: CATALOG,
        })
    }

    /// Replace the catalog (for integration tests with mock servers).
    pub fn with_catalog(mut self, catalog: &'static [ArtifactDescriptor]) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn models_dir(&self) -> &Path {
        &self.models_dir
    }

    pub fn catalog(&self) -> &'static [ArtifactDescriptor] {
        self.catalog
    }

    /// Every catalog entry with its local download status. No side effects.
    pub fn list_catalog(&self) -> Vec<CatalogStatus> {
        self.catalog
            .iter()
            .map(|artifact| CatalogStatus {
                artifact: *artifact,
                downloaded: self.models_dir.join(artifact.local_name()).exists(),
            })
            .collect()
    }

    /// Resolve `id` against the catalog.
    pub fn resolve(&self, id: &str) -> Result<&'static ArtifactDescriptor> {
        catalog::find(self.catalog, id).ok_or_else(|| MedAssistError::UnknownArtifact {
            id: id.to_string(),
            available: self.catalog.iter().map(|a| a.id.to_string()).collect(),
        })
    }

    /// Fetch one catalog model. Succeeds without network access if the file exists.
    #[instrument(skip(self, progress))]
    pub async fn fetch(&self, id: &str, progress: &dyn DownloadProgress) -> Result<FetchOutcome> {
        let artifact = self.resolve(id)?;
        self.download_file(artifact.url, artifact.local_name(), progress)
            .await
    }

    /// Fetch every recommended model, continuing past failures.
    pub async fn fetch_all_recommended(&self, progress: &dyn DownloadProgress) -> BatchReport {
        let mut report = BatchReport::default();

        for artifact in self.catalog.iter().filter(|a| a.recommended) {
            match self.fetch(artifact.id, progress).await {
                Ok(outcome) => report.succeeded.push((artifact.id.to_string(), outcome)),
                Err(e) => {
                    warn!(id = artifact.id, error = %e, "download failed, continuing with others");
                    report.failed.push((artifact.id.to_string(), e.to_string()));
                }
            }
        }

        info!(
            succeeded = report.succeeded.len(),
            failed = report.failed.len(),
            "recommended downloads completed"
        );
        report
    }

    /// Download `url` into `<models_dir>/<file_name>` unless that file exists.
    #[instrument(skip(self, progress), fields(models_dir = %self.models_dir.display()))]
    pub async fn download_file(
        &self,
        url: &str,
        file_name: &str,
        progress: &dyn DownloadProgress,
    ) -> Result<FetchOutcome> {
        let target = self.models_dir.join(file_name);

        if target.exists() {
            info!(path = %target.display(), "already downloaded");
            return Ok(FetchOutcome::AlreadyPresent { path: target });
        }

        tokio::fs::create_dir_all(&self.models_dir)
            .await
            .map_err(|e| MedAssistError::io(&self.models_dir, e))?;

        let partial = self.models_dir.join(format!("{file_name}{PARTIAL_SUFFIX}"));

        info!(url, path = %target.display(), "downloading");

        let result = match self.stream_to(url, file_name, &partial, progress).await {
            Ok(bytes) => tokio::fs::rename(&partial, &target)
                .await
                .map(|()| bytes)
                .map_err(|e| MedAssistError::io(&target, e)),
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes) => {
                progress.finished();
                info!(path = %target.display(), bytes, "download complete");
                Ok(FetchOutcome::Downloaded { path: target, bytes })
            }
            Err(e) => {
                progress.failed();
                if let Err(rm) = tokio::fs::remove_file(&partial).await {
                    if rm.kind() != std::io::ErrorKind::NotFound {
                        warn!(path = %partial.display(), error = %rm, "could not remove partial file");
                    }
                }
                Err(MedAssistError::download(&target, e))
            }
        }
    }

    /// Stream the response body into `partial`, returning the byte count.
    async fn stream_to(
        &self,
        url: &str,
        file_name: &str,
        partial: &Path,
        progress: &dyn DownloadProgress,
    ) -> Result<u64> {
        let parsed = Url::parse(url)
            .map_err(|e| MedAssistError::Network(format!("invalid URL '{url}': {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(MedAssistError::Network(format!(
                "unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }

        let mut response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| MedAssistError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MedAssistError::Network(format!("{url}: HTTP {status}")));
        }

        let total = response.content_length();
        progress.started(file_name, total);

        let file = tokio::fs::File::create(partial)
            .await
            .map_err(|e| MedAssistError::io(partial, e))?;
        let mut writer = BufWriter::with_capacity(self.buffer_size, file);
        let mut downloaded: u64 = 0;

        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| MedAssistError::Network(format!("{url}: body read failed: {e}")))?
        {
            writer
                .write_all(&chunk)
                .await
                .map_err(|e| MedAssistError::io(partial, e))?;
            downloaded += chunk.len() as u64;
            progress.advanced(downloaded);
        }

        writer
            .flush()
            .await
            .map_err(|e| MedAssistError::io(partial, e))?;

        if let Some(total) = total {
            if downloaded < total {
                return Err(MedAssistError::Network(format!(
                    "{url}: body truncated ({downloaded} of {total} bytes)"
                )));
            }
        }

        debug!(bytes = downloaded, "body streamed");
        Ok(downloaded)
    }

    /// Report size and GGUF magic of `<models_dir>/<file_name>`.
    pub fn verify(&self, file_name: &str) -> Result<VerifyReport> {
        use std::io::Read;

        let path = self.models_dir.join(file_name);
        if !path.is_file() {
            return Err(MedAssistError::FileNotFound { path });
        }

        let size_bytes = std::fs::metadata(&path)
            .map_err(|e| MedAssistError::io(&path, e))?
            .len();

        let mut header = Vec::with_capacity(GGUF_MAGIC.len());
        std::fs::File::open(&path)
            .and_then(|f| f.take(GGUF_MAGIC.len() as u64).read_to_end(&mut header))
            .map_err(|e| MedAssistError::io(&path, e))?;

        let magic_ok = header.as_slice() == GGUF_MAGIC;
        if !magic_ok {
            warn!(path = %path.display(), "file format not recognized as GGUF");
        }

        Ok(VerifyReport {
            path,
            size_bytes,
            magic_ok,
        })
    }

    /// Model files in the models directory, sorted by name.
    pub fn list_downloaded(&self) -> Result<Vec<DownloadedModel>> {
        let entries = match std::fs::read_dir(&self.models_dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(MedAssistError::io(&self.models_dir, e)),
        };

        let mut models = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| MedAssistError::io(&self.models_dir, e))?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some(MODEL_EXTENSION)
            {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            let size_bytes = entry
                .metadata()
                .map_err(|e| MedAssistError::io(&path, e))?
                .len();

            models.push(DownloadedModel {
                artifact: catalog::find_by_file_name(self.catalog, &file_name).copied(),
                file_name,
                size_bytes,
            });
        }

        models.sort_by(|a, b| a.file_name.cmp(&b.file_name));
        Ok(models)
    }
}
