//! MedAssist knowledge extractor: turns medical PDFs into a retrieval-ready
//! JSON knowledge base for the mobile app.

mod commands;

use clap::Parser;
use color_eyre::eyre::Result;

use commands::Cli;

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    commands::init_tracing(&cli);
    commands::run(cli)
}
