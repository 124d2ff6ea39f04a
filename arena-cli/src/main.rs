//! Agent Arena CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the tournament server
//! - simulate: Run a local tournament with scripted agents

mod serve;
mod simulate;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arena")]
#[command(about = "Agent Arena tournament runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the tournament server
    Serve(serve::ServeArgs),
    /// Run a local tournament with scripted agents
    Simulate(simulate::SimulateArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => serve::run(args),
        Commands::Simulate(args) => simulate::run(args),
    }
}
