//! MockNCrack - question supply API and operator CLI
//!
//! `mockncrack serve` runs the HTTP API; the other subcommands manage the
//! question bank and token balances directly in the database.

mod api;
mod commands;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use mockncrack_core::redact::Redactor;
use mockncrack_core::{config, Database, ServiceConfig};

#[derive(Parser)]
#[command(name = "mockncrack")]
#[command(author, version, about = "Mock interview question service", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format: table (default) or json
    #[arg(long, global = true, value_enum, ignore_case = true, default_value = "table")]
    format: output::OutputFormat,

    /// Suppress progress messages
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Override database path (or set MOCKNCRACK_DB_PATH env var)
    #[arg(long, env = "MOCKNCRACK_DB_PATH", global = true)]
    db: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address (or set MOCKNCRACK_BIND env var)
        #[arg(long, env = "MOCKNCRACK_BIND")]
        bind: Option<String>,
    },

    /// Load the built-in sample question bank
    Seed,

    /// Inspect and maintain the question bank
    Questions {
        #[command(subcommand)]
        action: commands::questions::QuestionsAction,
    },

    /// Manage user token balances
    Tokens {
        #[command(subcommand)]
        action: commands::tokens::TokensAction,
    },

    /// Issue identity tokens
    Token {
        #[command(subcommand)]
        action: commands::token::TokenAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut service_config = ServiceConfig::from_env()?;
    if let Some(db_path) = &cli.db {
        service_config.db_path = config::expand_path(db_path);
    }

    logging::init(service_config.mode, Redactor::new(service_config.secrets()));

    let db = Database::open(&service_config.db_path).await?;

    let ctx = commands::Context {
        db,
        config: service_config,
        format: cli.format,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Serve { bind } => commands::serve::execute(&ctx, bind).await,
        Commands::Seed => commands::seed::execute(&ctx).await,
        Commands::Questions { action } => commands::questions::execute(&ctx, action).await,
        Commands::Tokens { action } => commands::tokens::execute(&ctx, action).await,
        Commands::Token { action } => commands::token::execute(&ctx, action).await,
    }
}
