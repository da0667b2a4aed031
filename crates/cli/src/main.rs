//! Beetle Gate CLI - Precondition gating for the contribution pages
//!
//! Usage:
//!   beetle-gate                           - Run the insights demo
//!   beetle-gate init [dir]                - Write guards.yaml and example scenarios
//!   beetle-gate check --route <path>      - Show the preconditions guarding a route (--json)
//!   beetle-gate simulate <scenario>       - Replay a scenario through a gate (--json)
//!   beetle-gate insights [--signed-out]   - Interactive insights page walk-through

use clap::{Parser, Subcommand};
use cli::commands::{CheckCommand, InitCommand, InsightsCommand, SimulateCommand};

#[derive(Parser)]
#[command(name = "beetle-gate")]
#[command(about = "Beetle Gate - View-readiness gating for contribution pages")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new Beetle Gate project
    Init(InitCommand),
    /// Show the guard for a route
    Check(CheckCommand),
    /// Replay a scenario file
    Simulate(SimulateCommand),
    /// Interactive insights page demo
    Insights(InsightsCommand),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init(cmd)) => cmd.run(),
        Some(Commands::Check(cmd)) => cmd.run(),
        Some(Commands::Simulate(cmd)) => cmd.run(),
        Some(Commands::Insights(cmd)) => cmd.run(),
        None => InsightsCommand::default().run(),
    }
}
