//! dlopen CLI: open native libraries and resolve exported symbols.
//!
//! This is the command-line front end for `lib-dlopen`.

mod config;
mod output;
mod resolver;

use anyhow::Result;
use clap::{Parser, Subcommand};
use lib_dlopen::LibraryFormat;
use std::path::PathBuf;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "dlopen")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve symbols in one library
    Resolve {
        /// Library path or loader name (process image when omitted)
        #[arg(short, long)]
        library: Option<String>,

        /// Append the platform library suffix when missing
        #[arg(long)]
        append_suffix: bool,

        /// Exported symbol names
        #[arg(required = true)]
        symbols: Vec<String>,
    },

    /// Resolve every symbol listed in a manifest
    Check {
        /// Path to the manifest (TOML, or JSON with a .json extension)
        #[arg(short, long)]
        config: PathBuf,
    },

    /// Print the dynamic library suffix for a platform
    Suffix {
        /// Platform identifier (defaults to the current platform)
        #[arg(short, long)]
        platform: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Resolve { library, append_suffix, symbols } => {
            let entry = config::LibraryEntry {
                path: library.filter(|p| !p.is_empty()),
                append_suffix,
                symbols,
            };
            let manifest = config::Manifest {
                name: None,
                libraries: vec![entry],
            };
            config::validate_manifest(&manifest)?;
            run_manifest(manifest, cli.format)?;
        }
        Commands::Check { config } => {
            tracing::info!("Loading manifest from {:?}", config);
            let manifest = config::load_manifest(&config)?;
            run_manifest(manifest, cli.format)?;
        }
        Commands::Suffix { platform } => {
            print_suffix(platform.as_deref())?;
        }
    }

    Ok(())
}

fn run_manifest(manifest: config::Manifest, format: OutputFormat) -> Result<()> {
    let report = resolver::Resolver::new(manifest).run();

    output::write_report(&report, format, std::io::stdout().lock())?;

    if !report.is_success() {
        anyhow::bail!("{} lookup(s) failed", report.failure_count());
    }

    Ok(())
}

fn print_suffix(platform: Option<&str>) -> Result<()> {
    let format = match platform {
        Some(os) => LibraryFormat::for_platform(os),
        None => LibraryFormat::native(),
    };

    match format.extension() {
        Some(ext) => println!("{}", ext),
        None => anyhow::bail!(
            "Unknown platform: {}",
            platform.unwrap_or(std::env::consts::OS)
        ),
    }

    Ok(())
}
