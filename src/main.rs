//! jtv - terminal viewer for huge JSON documents.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

/// Terminal viewer for huge JSON documents.
///
/// Renders only the visible window of the document and loads lines
/// incrementally, so multi-gigabyte files stay responsive.
#[derive(Parser, Debug)]
#[command(name = "jtv")]
#[command(version)]
#[command(about = "Virtualized TUI viewer for huge JSON documents")]
pub struct Args {
    /// Path to the JSON file to view
    pub file: PathBuf,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log file path (watch with `tail -f`)
    #[arg(long, default_value = "jtv.log")]
    pub log_file: PathBuf,

    /// Lines per pager page
    #[arg(long)]
    pub page_capacity: Option<usize>,

    /// Maximum container nesting depth
    #[arg(long)]
    pub depth_limit: Option<usize>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Defaults, then config file, then CLI flags.
    let mut config = match &args.config {
        Some(path) => jtv::config::ViewerConfig::load_from(path)?,
        None => jtv::config::ViewerConfig::load()?,
    };
    if let Some(capacity) = args.page_capacity {
        config.page_capacity = capacity;
    }
    if let Some(limit) = args.depth_limit {
        config.depth_limit = limit;
    }

    jtv::logging::init(&args.log_file)?;
    info!(config = ?config, file = %args.file.display(), "Starting viewer");

    let raw = std::fs::read_to_string(&args.file)?;
    let document = jtv::parser::parse_document(&raw)?;
    drop(raw);

    jtv::view::run(&document, &config)?;
    Ok(())
}
