//! LiftSync CLI
//!
//! Command-line tools for the sync bookkeeping a device keeps on disk.
//!
//! # Commands
//!
//! - `inspect` - Display the installation id, last sync time and bookmarks
//! - `reset` - Forget every bookmark and the last sync time
//! - `order` - Print the order entity types are synchronized in

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// LiftSync command-line tools.
#[derive(Parser)]
#[command(name = "liftsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the bookkeeping directory
    #[arg(global = true, short, long)]
    path: Option<PathBuf>,

    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display installation id, last sync time and bookmarks
    Inspect {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Forget every bookmark and the last sync time
    Reset {
        /// Confirm the reset
        #[arg(short, long)]
        yes: bool,
    },

    /// Print the synchronization order
    Order {
        /// Which entity types to list
        #[arg(short, long, value_enum, default_value_t = ScopeArg::All)]
        scope: ScopeArg,
    },

    /// Show version information
    Version,
}

/// Scope filter for `order`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScopeArg {
    /// Shared catalog entity types
    System,
    /// Per-user entity types
    User,
    /// Both, catalog first
    All,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Inspect { format } => {
            let path = cli.path.ok_or("Bookkeeping path required for inspect")?;
            commands::inspect::run(&path, &format).await?;
        }
        Commands::Reset { yes } => {
            let path = cli.path.ok_or("Bookkeeping path required for reset")?;
            commands::reset::run(&path, yes).await?;
        }
        Commands::Order { scope } => {
            commands::order::run(scope)?;
        }
        Commands::Version => {
            println!("LiftSync CLI v{}", env!("CARGO_PKG_VERSION"));
            println!("LiftSync Core v{}", liftsync_core::VERSION);
        }
    }

    Ok(())
}
