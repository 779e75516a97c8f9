//! Vitrine CLI - Theme inspection and validation tools.
//!
//! # Usage
//!
//! ```bash
//! # List every store, theme, and slot under the themes root
//! vitrine-cli themes list
//!
//! # Validate fragments and report how each store's slots resolve
//! vitrine-cli themes check
//!
//! # Use a non-default themes root
//! vitrine-cli themes list --root /srv/vitrine/themes
//! ```
//!
//! # Commands
//!
//! - `themes list` - Enumerate the theme fragment tree
//! - `themes check` - Parse every fragment and dry-run slot resolution

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "vitrine-cli")]
#[command(author, version, about = "Vitrine CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and validate theme fragments
    Themes {
        #[command(subcommand)]
        action: ThemesAction,
    },
}

#[derive(Subcommand)]
enum ThemesAction {
    /// List stores, themes, and slots under the themes root
    List {
        /// Themes root directory
        #[arg(long, default_value = "themes")]
        root: String,
    },
    /// Validate fragments and report slot resolution per store
    Check {
        /// Themes root directory
        #[arg(long, default_value = "themes")]
        root: String,
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
        Commands::Themes { action } => match action {
            ThemesAction::List { root } => commands::themes::list(&root).await?,
            ThemesAction::Check { root } => commands::themes::check(&root).await?,
        },
    }
    Ok(())
}
