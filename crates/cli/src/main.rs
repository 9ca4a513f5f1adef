//! Voluntarios CLI - Database migrations and donation fixtures.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! vol-cli migrate
//!
//! # Load donations, items, and receipts from a fixture file
//! vol-cli seed fixtures/donations.yaml
//!
//! # Replace existing donation records with the fixture contents
//! vol-cli seed fixtures/donations.yaml --clear
//! ```
//!
//! Both commands read the same database configuration as the API
//! (`VOLUNTARIOS_DATABASE_URL`, `DATABASE_URL`, or `DB_*` parts).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vol-cli")]
#[command(author, version, about = "Voluntarios CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed donation records from a YAML fixture
    Seed {
        /// Path to the fixture file
        file: PathBuf,

        /// Truncate donation tables before inserting
        #[arg(long)]
        clear: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { file, clear } => commands::seed::donations(&file, clear).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_with_clear() {
        let cli = Cli::try_parse_from(["vol-cli", "seed", "donations.yaml", "--clear"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Seed { clear: true, .. })
        ));
    }
}
