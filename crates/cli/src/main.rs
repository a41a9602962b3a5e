//! Sweet Bliss CLI - Database migrations.
//!
//! # Usage
//!
//! ```bash
//! # Apply all pending migrations
//! sb-cli migrate
//!
//! # Show which migrations have been applied
//! sb-cli status
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `status` - List embedded migrations and whether each is applied

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sb-cli")]
#[command(author, version, about = "Sweet Bliss CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Show migration status
    Status,
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
        Commands::Status => commands::migrate::status().await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_migrate() {
        let cli = Cli::try_parse_from(["sb-cli", "migrate"]);
        assert!(matches!(cli.map(|c| c.command), Ok(Commands::Migrate)));
    }
}
