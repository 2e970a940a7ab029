//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::IdleMode;

/// Editing timer.
///
/// Tracks active editing time per document, excluding idle gaps, and keeps
/// the running total with the document.
#[derive(Debug, Parser)]
#[command(name = "et", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Apply a recorded host event log (JSONL) and store saved totals.
    Replay {
        /// Path to the event log.
        file: PathBuf,

        /// How to decide idle gaps (defaults to the configured `idle_answer`).
        #[arg(long, value_enum)]
        idle: Option<IdleMode>,
    },

    /// Print a document's stored editing time as m:ss.
    Elapsed {
        /// Full path of the document.
        document: String,
    },

    /// Show stored editing time for all documents.
    Status,
}
