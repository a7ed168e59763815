//! ecom CLI - database migrations.
//!
//! # Usage
//!
//! ```bash
//! # Apply every pending migration
//! ecom-cli migrate up
//!
//! # Revert every applied migration
//! ecom-cli migrate down
//!
//! # Show which migrations are applied
//! ecom-cli migrate status
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "ecom-cli")]
#[command(author, version, about = "ecom CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage database migrations
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum MigrateAction {
    /// Apply all pending migrations
    Up,
    /// Revert all applied migrations
    Down,
    /// List migrations and whether each is applied
    Status,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::migrate::MigrationError> {
    match cli.command {
        Commands::Migrate { action } => match action {
            MigrateAction::Up => commands::migrate::up().await,
            MigrateAction::Down => commands::migrate::down().await,
            MigrateAction::Status => commands::migrate::status().await,
        },
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_migrate_actions() {
        for (arg, expected) in [
            ("up", MigrateAction::Up),
            ("down", MigrateAction::Down),
            ("status", MigrateAction::Status),
        ] {
            let cli = Cli::try_parse_from(["ecom-cli", "migrate", arg]);
            assert!(
                matches!(cli, Ok(Cli { command: Commands::Migrate { action } }) if action == expected),
                "failed to parse {arg}"
            );
        }
        assert!(Cli::try_parse_from(["ecom-cli", "migrate", "sideways"]).is_err());
    }
}
