//! pgdeck CLI - HTTP gateway over Postgres introspection
//!
//! This is the entry point for the `pgdeck` binary, which provides:
//! - The JSON HTTP gateway (`serve` subcommand)
//! - A one-shot catalog report on stdout (`inspect` subcommand)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "pgdeck",
    author,
    version,
    about = "JSON gateway for Postgres table metadata and data",
    long_about = "Browse a Postgres database over HTTP: server version, table names, column \
                  schemas, constraints, table rows, and single-row inserts."
)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    /// Load environment variables from this file before ./.env and ~/.pgdeck/.env
    #[arg(long, global = true, value_name = "PATH")]
    env_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP gateway
    Serve(commands::ServeArgs),
    /// Print version, tables, schemas and constraints as JSON
    Inspect(commands::InspectArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // Env files load before the real parse so their values reach clap's
    // env fallbacks. The first pass only locates --env-file; its errors
    // are reported by the second.
    let explicit = Cli::try_parse().ok().and_then(|cli| cli.env_file);
    let env_files = config::load_dotenv(explicit.as_deref())?;

    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    if env_files.is_empty() {
        debug!("No .env files found (current dir or ~/.pgdeck)");
    } else {
        for path in &env_files {
            info!("Loaded configuration from {}", path.display());
        }
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Inspect(args) => commands::run_inspect(args).await?,
    }

    Ok(())
}
