//! CLI tool for auditing Read the Docs publish health

use anyhow::Context;
use clap::Parser;
use colored::*;
use docs_health_audit::{run_audit, HealthConfig};
use std::path::{Path, PathBuf};
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "dochealth")]
#[command(
    about = "Report the publish health of Read the Docs projects to the console and a CSV file",
    long_about = "Report the publish health of Read the Docs projects to the console and a CSV file.\n\n\
                  The API token is read from READTHEDOCS_TOKEN, or from the password of the \
                  `machine readthedocs.org` entry in ~/.netrc."
)]
#[command(version)]
struct Cli {
    /// CSV file to write
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Path to custom configuration file (TOML)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Netrc file to read the API token from
    #[arg(long)]
    netrc: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short = 'v', long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    // Load configuration
    let mut config = match load_config(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{} Failed to load config: {:#}", "Error:".red().bold(), e);
            process::exit(1);
        }
    };

    if let Some(output) = cli.output {
        config.output_path = output;
    }
    if let Some(netrc) = cli.netrc {
        config.netrc_path = Some(netrc);
    }

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = run_audit(&config, &mut stdout).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> anyhow::Result<HealthConfig> {
    match path {
        Some(path) => HealthConfig::from_toml_file(path)
            .with_context(|| format!("reading {}", path.display())),
        None => Ok(HealthConfig::default()),
    }
}
