//! Badgekit CLI — Command-line interface for badge normalization and
//! verification.
//!
//! Subcommands: init, detect, normalize, validate, verify, template.

mod commands;
mod config;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use config::BadgekitConfig;

/// Badgekit — Open Badges toolkit.
#[derive(Parser, Debug)]
#[command(name = "badgekit", version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, global = true, default_value = "badgekit.toml")]
    config: PathBuf,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file.
    Init(commands::init::InitArgs),
    /// Detect which badge format a document uses.
    Detect(commands::detect::DetectArgs),
    /// Print the canonical display view of a badge.
    Normalize(commands::normalize::NormalizeArgs),
    /// Validate a badge class.
    Validate(commands::validate::ValidateArgs),
    /// Run the trust pipeline on a badge.
    Verify(commands::verify::VerifyArgs),
    /// Print a badge class or assertion template.
    Template(commands::template::TemplateArgs),
}

fn init_tracing(config: &BadgekitConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    // Logs go to stderr so command output on stdout stays machine-readable.
    if config.logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = BadgekitConfig::load(&cli.config)?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_tracing(&config);

    match &cli.command {
        Commands::Init(args) => commands::init::run(args, &cli.config),
        Commands::Detect(args) => commands::detect::run(args),
        Commands::Normalize(args) => commands::normalize::run(args),
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Verify(args) => commands::verify::run(args, &config).await,
        Commands::Template(args) => commands::template::run(args),
    }
}
