//! Command-line interface for ttt_client.

use clap::{Parser, Subcommand};
use ttt_core::{Mark, Side};

/// Tic-tac-toe against a remote AI
#[derive(Parser, Debug)]
#[command(name = "ttt_client")]
#[command(about = "Play tic-tac-toe against an AI move service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file
    #[arg(short, long, default_value = "ttt_client.toml", global = true)]
    pub config: std::path::PathBuf,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal
    Play {
        /// Your mark (X or O)
        #[arg(long)]
        symbol: Option<Mark>,

        /// Who moves first (player or ai)
        #[arg(long)]
        starts: Option<Side>,

        /// Base URL of the AI move service
        #[arg(long)]
        service_url: Option<String>,

        /// Log file (the terminal belongs to the game)
        #[arg(long, default_value = "ttt_client.log")]
        log_file: std::path::PathBuf,
    },

    /// Send one board to the move service and print its answer
    Probe {
        /// Board as a JSON array of 9 cells, e.g. '[" ","X"," "," "," "," "," "," "," "]'
        #[arg(long)]
        board: Option<String>,

        /// Mark the AI plays
        #[arg(long, default_value = "O")]
        ai_symbol: Mark,

        /// Base URL of the AI move service
        #[arg(long)]
        service_url: Option<String>,
    },
}
