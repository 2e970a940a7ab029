use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use et_core::IdleAnswer;
use tracing_subscriber::EnvFilter;

use et_cli::commands::{elapsed, replay, status};
use et_cli::prompt::{IdleDecider, TerminalPrompt};
use et_cli::{Cli, Commands, Config, IdleMode};

/// Load config and open database, ensuring the parent directory exists.
fn open_database(config_path: Option<&Path>) -> Result<(et_db::Database, Config)> {
    let config = Config::load_from(config_path).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    if let Some(parent) = config.database_path.parent() {
        std::fs::create_dir_all(parent).context("failed to create database directory")?;
    }

    let db = et_db::Database::open(&config.database_path).context("failed to open database")?;
    Ok((db, config))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Logs go to stderr so command output stays clean.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let mut stdout = io::stdout().lock();

    match &cli.command {
        Some(Commands::Replay { file, idle }) => {
            let (mut db, config) = open_database(cli.config.as_deref())?;
            let decider = match idle.unwrap_or(config.idle_answer) {
                IdleMode::Include => IdleDecider::Fixed(IdleAnswer::Include),
                IdleMode::Exclude => IdleDecider::Fixed(IdleAnswer::Exclude),
                IdleMode::Ask => {
                    IdleDecider::Ask(TerminalPrompt::new(io::stdin().lock(), io::stderr()))
                }
            };
            replay::run(&mut stdout, &mut db, file, config.tracking_policy(), decider)?;
        }
        Some(Commands::Elapsed { document }) => {
            let (db, _config) = open_database(cli.config.as_deref())?;
            elapsed::run(&mut stdout, &db, document)?;
        }
        Some(Commands::Status) => {
            let (db, config) = open_database(cli.config.as_deref())?;
            status::run(&mut stdout, &db, &config.database_path)?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    stdout.flush()?;
    Ok(())
}
