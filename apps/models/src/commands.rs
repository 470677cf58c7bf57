//! CLI definition, routing, and tracing setup.

use std::path::PathBuf;

use clap::{ArgGroup, CommandFactory, Parser};
use color_eyre::eyre::{Result, eyre};
use medassist_fetcher::{FetchOutcome, ModelFetcher};
use medassist_shared::{AppConfig, MedAssistError, load_config};
use tracing::{debug, warn};

use crate::progress::CliDownloadProgress;

const MIB: f64 = 1024.0 * 1024.0;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Download quantized GGUF models for the offline medical assistant.
#[derive(Parser)]
#[command(
    name = "medassist-models",
    version,
    about = "Download and verify quantized GGUF models for offline use.",
    long_about = "Download and verify quantized GGUF models for offline use.\n\n\
        Exits non-zero when --download, --verify, or config loading fails. \
        --download-all exits zero even if some models fail; failures are listed in its summary.",
    group(
        ArgGroup::new("action")
            .args(["list", "download_all", "download", "downloaded", "verify"])
            .multiple(false)
    ),
)]
pub(crate) struct Cli {
    /// List available models and their download status.
    #[arg(long)]
    pub list: bool,

    /// Download every recommended model, continuing past failures.
    #[arg(long)]
    pub download_all: bool,

    /// Download one model by catalog id.
    #[arg(long, value_name = "ID")]
    pub download: Option<String>,

    /// List model files already in the models directory.
    #[arg(long)]
    pub downloaded: bool,

    /// Check that a downloaded file is in GGUF format.
    #[arg(long, value_name = "FILE")]
    pub verify: Option<String>,

    /// Path to a medassist.toml config file.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "medassist=info",
        1 => "medassist=debug",
        _ => "medassist=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt().with_env_filter(env_filter).with_target(false).init();
        }
        LogFormat::Json => {
            fmt().json().with_env_filter(env_filter).init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the selected action.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let fetcher = ModelFetcher::new(&config.fetcher)?;
    debug!(models_dir = %fetcher.models_dir().display(), "fetcher ready");

    if cli.list {
        cmd_list(&fetcher);
        Ok(())
    } else if cli.download_all {
        cmd_download_all(&fetcher).await
    } else if let Some(id) = cli.download.as_deref() {
        cmd_download(&fetcher, id).await
    } else if cli.downloaded {
        cmd_downloaded(&fetcher)
    } else if let Some(file) = cli.verify.as_deref() {
        cmd_verify(&fetcher, file)
    } else {
        cmd_usage(&fetcher, &config)
    }
}

fn cmd_usage(fetcher: &ModelFetcher, config: &AppConfig) -> Result<()> {
    Cli::command().print_help()?;
    println!();
    println!("Models directory: {}", config.fetcher.models_dir.display());
    println!();
    cmd_list(fetcher);
    Ok(())
}

fn cmd_list(fetcher: &ModelFetcher) {
    println!("Available models:");
    println!("{}", "=".repeat(60));

    for status in fetcher.list_catalog() {
        let model = status.artifact;
        println!();
        if model.recommended {
            println!("[recommended]");
        }
        println!("ID: {}", model.id);
        println!("Name: {}", model.name);
        println!("Size: {}", model.size);
        println!("RAM Requirement: {}", model.ram_requirement);
        println!("Description: {}", model.description);
        if status.downloaded {
            println!("Status: downloaded");
        } else {
            println!("Status: not downloaded");
        }
    }
}

async fn cmd_download(fetcher: &ModelFetcher, id: &str) -> Result<()> {
    let model = match fetcher.resolve(id) {
        Ok(model) => model,
        Err(e @ MedAssistError::UnknownArtifact { .. }) => {
            println!("Model '{id}' not found");
            println!();
            cmd_list(fetcher);
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Downloading {}...", model.name);
    println!("Size: {}", model.size);
    println!("RAM Requirement: {}", model.ram_requirement);
    println!("Description: {}", model.description);
    println!("URL: {}", model.url);
    println!();

    let progress = CliDownloadProgress::new();
    let outcome = fetcher.fetch(id, &progress).await?;

    match &outcome {
        FetchOutcome::AlreadyPresent { path } => {
            println!("{} already exists at {}", model.local_name(), path.display());
        }
        FetchOutcome::Downloaded { bytes, .. } => {
            println!("Downloaded {} ({:.1}MB)", model.local_name(), *bytes as f64 / MIB);
        }
    }

    println!();
    println!("Model ready for the offline assistant.");
    println!("Location: {}", outcome.path().display());
    println!();
    println!("Next steps:");
    println!("1. Point the mobile app at: {}", model.local_name());
    println!("2. Test on an emulator or low-spec device");
    println!("3. Verify memory usage stays under device limits");

    Ok(())
}

async fn cmd_download_all(fetcher: &ModelFetcher) -> Result<()> {
    println!("Downloading recommended models...");

    let progress = CliDownloadProgress::new();
    let report = fetcher.fetch_all_recommended(&progress).await;

    println!();
    for (id, outcome) in &report.succeeded {
        match outcome {
            FetchOutcome::AlreadyPresent { path } => {
                println!("  {id}: already present ({})", path.display());
            }
            FetchOutcome::Downloaded { path, bytes } => {
                println!("  {id}: downloaded {:.1}MB ({})", *bytes as f64 / MIB, path.display());
            }
        }
    }
    for (id, error) in &report.failed {
        println!("  {id}: failed ({error})");
    }

    println!();
    if report.failed.is_empty() {
        println!("Recommended models download completed.");
    } else {
        println!(
            "Recommended models download completed with {} failure(s).",
            report.failed.len()
        );
    }
    Ok(())
}

fn cmd_downloaded(fetcher: &ModelFetcher) -> Result<()> {
    let models = fetcher.list_downloaded()?;

    if models.is_empty() {
        println!("No models downloaded yet.");
        println!("Run with --download <ID> to get started.");
        return Ok(());
    }

    println!("Downloaded models:");
    println!("{}", "=".repeat(40));
    for model in models {
        println!("{}", model.file_name);
        println!("   Size: {:.1}MB", model.size_bytes as f64 / MIB);
        if let Some(artifact) = model.artifact {
            println!("   Type: {}", artifact.name);
            println!("   RAM: {}", artifact.ram_requirement);
        }
        println!();
    }
    Ok(())
}

fn cmd_verify(fetcher: &ModelFetcher, file: &str) -> Result<()> {
    let report = fetcher.verify(file).map_err(|e| match e {
        MedAssistError::FileNotFound { path } => eyre!("model file not found: {}", path.display()),
        other => other.into(),
    })?;

    println!("Model file found: {file}");
    println!("Size: {:.1}MB", report.size_bytes as f64 / MIB);
    if report.magic_ok {
        println!("Valid GGUF format detected");
    } else {
        warn!(file, "file does not start with the GGUF magic bytes");
        println!("File format not recognized as GGUF");
    }
    Ok(())
}
