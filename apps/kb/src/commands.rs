//! CLI definition, routing, and tracing setup.

use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use medassist_core::{
    ExtractOptions, ProgressReporter, category_counts, process_directory, write_knowledge_base,
};
use medassist_documents::ExtractorChain;
use medassist_shared::{KnowledgeBase, MedAssistError, load_config};
use tracing::{debug, info};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Build the offline medical knowledge base from a directory of PDFs.
#[derive(Parser)]
#[command(
    name = "medassist-kb",
    version,
    about = "Extract medical guidelines from PDFs into a JSON knowledge base.",
    long_about = "Extract medical guidelines from PDFs into a JSON knowledge base.\n\n\
        Unreadable documents are skipped and the run still exits zero. \
        Exits non-zero when config loading or writing the knowledge base fails.",
)]
pub(crate) struct Cli {
    /// Directory of PDF documents (defaults to extractor.source_dir).
    #[arg(value_name = "SOURCE_DIR")]
    pub source_dir: Option<PathBuf>,

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
// Command
// ---------------------------------------------------------------------------

/// Extract, write, and summarize the knowledge base.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let extractor = &config.extractor;
    let source_dir = cli.source_dir.unwrap_or_else(|| extractor.source_dir.clone());

    println!("MedAssist - PDF knowledge extraction");
    println!("{}", "=".repeat(50));

    let chain = ExtractorChain::new();
    debug!(backends = ?chain.backend_names(), "text extraction chain");

    let opts = ExtractOptions::from(extractor);
    let reporter = CliProgress::new();
    let report = process_directory(&source_dir, &chain, &opts, &reporter)?;
    reporter.finish();

    if report.used_samples {
        println!(
            "No PDF files found in {}. Using {} built-in sample guidelines.",
            source_dir.display(),
            report.entries.len()
        );
    } else if !report.documents_failed.is_empty() {
        println!(
            "Skipped {} unreadable document(s).",
            report.documents_failed.len()
        );
    }

    let kb = KnowledgeBase::new(report.entries);
    let path = write_knowledge_base(&kb, &extractor.output_dir, &extractor.output_file)?;
    info!(path = %path.display(), entries = kb.metadata.total_entries, "knowledge base ready");

    println!();
    println!("Knowledge base saved to: {}", path.display());
    println!("Total entries: {}", kb.metadata.total_entries);
    println!();
    println!("Category breakdown:");
    for (category, count) in category_counts(&kb) {
        println!("  {category}: {count} entries");
    }

    println!();
    println!("{}", "=".repeat(50));
    println!("Extraction completed.");
    println!("Next steps:");
    println!("1. Copy {} into the mobile app assets", extractor.output_file);
    println!("2. Run the app to initialize its local database");
    println!("3. Test retrieval with medical queries");

    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Per-document progress bar; document results print above it.
struct CliProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl CliProgress {
    fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn bar(&self, total: usize) -> Option<ProgressBar> {
        let mut guard = self.bar.lock().ok()?;
        let bar = guard.get_or_insert_with(|| {
            let bar = ProgressBar::new(total as u64);
            bar.set_style(
                ProgressStyle::with_template("{spinner:.cyan} [{pos}/{len}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            bar
        });
        Some(bar.clone())
    }

    fn current(&self) -> Option<ProgressBar> {
        self.bar.lock().ok().and_then(|guard| guard.clone())
    }

    fn finish(&self) {
        if let Some(bar) = self.current() {
            bar.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn document_started(&self, name: &str, current: usize, total: usize) {
        if let Some(bar) = self.bar(total) {
            bar.set_position(current.saturating_sub(1) as u64);
            bar.set_message(format!("Extracting from: {name}"));
        }
    }

    fn document_finished(&self, name: &str, entries: usize) {
        if let Some(bar) = self.current() {
            bar.inc(1);
            bar.println(format!("{name}: extracted {entries} guidelines"));
        }
    }

    fn document_failed(&self, name: &str, error: &MedAssistError) {
        if let Some(bar) = self.current() {
            bar.inc(1);
            bar.println(format!("{name}: no text extracted ({error})"));
        }
    }
}
