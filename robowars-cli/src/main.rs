//! ROBOWARS CLI - Command-line interface
//!
//! Commands:
//! - duel: Play a single duel between two robots
//! - tournament: Play a multi-round tournament, optionally paced
//! - series: Run many independent tournaments and aggregate wins
//! - presets: List the named field configurations

mod duel_cmd;
mod pacing;
mod series_cmd;
mod tournament_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use robowars_core::Preset;

#[derive(Parser)]
#[command(name = "robowars")]
#[command(about = "ROBOWARS Battleship robot arena")]
struct Cli {
    /// Random seed for reproducible robots
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a single duel
    Duel(duel_cmd::DuelArgs),
    /// Play a multi-round tournament
    Tournament(tournament_cmd::TournamentArgs),
    /// Run a series of independent tournaments
    Series(series_cmd::SeriesArgs),
    /// List field presets
    Presets,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Duel(args) => duel_cmd::run(args, cli.seed),
        Commands::Tournament(args) => tournament_cmd::run(args, cli.seed).await,
        Commands::Series(args) => series_cmd::run(args, cli.seed),
        Commands::Presets => {
            print_presets();
            Ok(())
        }
    }
}

fn print_presets() {
    println!("\n=== Field Presets ===");
    for preset in Preset::ALL {
        println!("{:<8} {}", preset.name(), preset.configuration());
    }
}
