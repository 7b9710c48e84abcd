//! Room Map - grid room map editor
//!
//! Annotate a grid of rooms and the halls between them. The map is kept in a
//! local SQLite slot and can be exported to or imported from JSON files.

use std::process::ExitCode;

use clap::Parser;
use roommap_core::LoadOutcome;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;
mod config;
mod error;
mod state;

use cli::{Cli, Command};
use config::AppConfig;
use state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(output) => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> error::Result<String> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let app_state = AppState::new(config, cli.db.as_deref())?;

    let (mut session, outcome) = app_state.session()?;
    if let LoadOutcome::Malformed(reason) = &outcome {
        eprintln!(
            "Warning: stored map in {} could not be read ({}); starting from an empty map",
            app_state.db_path().display(),
            reason
        );
    }

    commands::execute(&mut session, cli.command.unwrap_or(Command::Show)).await
}
