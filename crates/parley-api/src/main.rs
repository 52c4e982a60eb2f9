//! Parley CLI entry point.
//!
//! Binary name: `parley`
//!
//! Parses CLI arguments, sets up tracing, loads configuration, then dispatches
//! to the demonstration or replay command.

mod cli;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    parley_observe::tracing_setup::init_tracing(cli.log_directive(), cli.otel)
        .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let state = AppState::init().await;

    let result = match cli.command {
        Commands::Demo { user } => cli::demo::demo(&state, &user, cli.json),
        Commands::Replay { file } => cli::replay::replay(&state, &file, cli.json).await,
    };

    parley_observe::tracing_setup::shutdown_tracing();
    result
}
