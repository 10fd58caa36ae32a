//! ttt_client - tic-tac-toe against a remote AI move service.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use ttt_client::cli::{Cli, Command};
use ttt_client::{GameConfig, HttpMoveService, MoveRequest, MoveService, find_changed_cell};
use ttt_core::{Board, Mark, Side, row_col};

/// Environment variable overriding the configured service URL.
const SERVICE_URL_ENV: &str = "TTT_SERVICE_URL";

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play {
            symbol,
            starts,
            service_url,
            log_file,
        } => {
            ttt_client::tui::init_file_logging(&log_file)?;
            let config = resolve_config(&cli.config, symbol, starts, service_url)?;
            ttt_client::tui::run_tui(config).await
        }
        Command::Probe {
            board,
            ai_symbol,
            service_url,
        } => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
                )
                .with_writer(std::io::stderr)
                .init();
            let config = resolve_config(&cli.config, None, None, service_url)?;
            run_probe(config, board, ai_symbol).await
        }
    }
}

/// Config file, then environment, then command-line flags.
#[instrument(skip(path), fields(path = %path.display()))]
fn resolve_config(
    path: &std::path::Path,
    symbol: Option<Mark>,
    starts: Option<Side>,
    service_url: Option<String>,
) -> Result<GameConfig> {
    let mut config = GameConfig::load_or_default(path)?;

    if let Ok(url) = std::env::var(SERVICE_URL_ENV) {
        config = config.with_service_url(url);
    }
    if let Some(url) = service_url {
        config = config.with_service_url(url);
    }
    if let Some(mark) = symbol {
        config = config.with_player_mark(mark);
    }
    if let Some(side) = starts {
        config = config.with_starting_side(side);
    }

    info!(
        player_mark = %config.player_mark(),
        starting_side = %config.starting_side(),
        service_url = %config.service_url(),
        "Configuration resolved"
    );
    Ok(config)
}

/// Sends one board to the service and prints the answer.
async fn run_probe(config: GameConfig, board: Option<String>, ai_symbol: Mark) -> Result<()> {
    let board: Board = match board {
        Some(json) => {
            serde_json::from_str(&json).context("Board must be a JSON array of 9 cells")?
        }
        None => Board::new(),
    };

    let service = HttpMoveService::new(config.service_url());
    println!("POST {}", service.move_url());
    println!("{}", board.display());

    let response = service.request_move(MoveRequest::new(board, ai_symbol)).await?;

    println!();
    println!("{}", response.board.display());
    match find_changed_cell(&board, &response.board) {
        Some(index) => {
            let (row, col) = row_col(index);
            println!("{} at ({},{})", ai_symbol, row, col);
        }
        None => println!("No cell changed"),
    }
    if let Some(message) = response.message {
        println!("{}", message);
    }
    Ok(())
}
