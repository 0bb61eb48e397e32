//! folio - Main Entry Point
//!
//! Loads configuration and portfolio data, then starts the interactive
//! terminal.

use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use folio::cli::{CliConfig, TerminalPrompter, TerminalSession};
use folio::clock::SystemClock;
use folio::portfolio::{DataStore, DocumentSource};
use folio::{FolioError, Result};

/// An interactive terminal portfolio
#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(about = "Browse a developer portfolio from a terminal", long_about = None)]
#[command(version)]
struct Args {
    /// Path to a JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Portfolio document to load instead of the configured data file
    #[arg(long, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Import an edited portfolio.json before starting
    #[arg(long, value_name = "PATH")]
    import: Option<PathBuf>,

    /// Write portfolio.json into DIR and exit
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// Show output immediately instead of revealing it character by character
    #[arg(long)]
    no_animation: bool,

    /// Path to the log file (default: from configuration)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.log_file) {
        eprintln!("WARNING: logging disabled: {}", e);
    }

    if let Err(e) = run(args, config).await {
        log::error!("Fatal error: {}", e);
        eprintln!("\nERROR: folio encountered an error: {}", e);
        eprintln!("Please check your terminal compatibility and try again.");
        process::exit(1);
    }
}

fn load_config(args: &Args) -> Result<CliConfig> {
    let mut config = match &args.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    config.apply_env_overrides();

    if let Some(data_file) = &args.data_file {
        config.data_file = data_file.clone();
    }
    if let Some(log_file) = &args.log_file {
        config.log_file = log_file.clone();
    }
    if args.no_animation {
        config.animate_output = false;
    }
    config.validate()?;
    Ok(config)
}

/// Route logs to a file; the terminal UI owns stdout and stderr
fn init_logging(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .map_err(|e| FolioError::Config(e.to_string()))
}

async fn run(args: Args, config: CliConfig) -> Result<()> {
    let mut store = DataStore::from_config(&config);
    match store.load() {
        DocumentSource::DataFile => log::info!("Using portfolio data file"),
        DocumentSource::Cache => log::info!("Using cached portfolio"),
        DocumentSource::Defaults => log::info!("Using default portfolio"),
    }

    if let Some(path) = &args.import {
        store.import_from(path)?;
        println!("Imported portfolio from {}", path.display());
    }

    if let Some(dir) = &args.export {
        let path = store.export_to(dir)?;
        println!("Portfolio written to {}", path.display());
        return Ok(());
    }

    let session = TerminalSession::new(config, store, SystemClock::shared());
    let mut prompter = TerminalPrompter::new(session)?;
    prompter.run().await?;

    log::info!("Terminal closed");
    println!("Thanks for visiting! Goodbye!");
    Ok(())
}
