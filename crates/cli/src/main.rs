//! Sheti Man CLI - Database migrations and catalog seeding.
//!
//! # Usage
//!
//! ```bash
//! # Apply pending migrations
//! sheti-cli migrate
//!
//! # Insert the built-in product catalog into an empty database
//! sheti-cli seed
//!
//! # Insert any built-in products that are missing, even if others exist
//! sheti-cli seed --force
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "sheti-cli")]
#[command(author, version, about = "Sheti Man CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed the marketplace with the built-in products
    Seed {
        /// Seed even when the products table already has rows
        #[arg(long)]
        force: bool,
    },
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

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await,
        Commands::Seed { force } => commands::seed::catalog(force).await,
    }
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
    fn test_seed_force_flag() {
        let cli = Cli::try_parse_from(["sheti-cli", "seed", "--force"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Seed { force: true })
        ));
    }
}
