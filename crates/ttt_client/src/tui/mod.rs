//! Terminal front end.

mod view;

pub use view::surface_point;

use crate::config::GameConfig;
use crate::controller::TurnController;
use crate::driver::GameDriver;
use crate::service::{HttpMoveService, MoveService};
use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseButton,
        MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::Backend, backend::CrosstermBackend, layout::Rect};
use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use ttt_core::{Mark, Side};
use tracing::{debug, error, info, instrument};

/// Frame interval; also the input poll timeout.
const FRAME: Duration = Duration::from_millis(16);

/// What the loop should do after a key press.
enum Flow {
    Continue,
    Quit,
}

/// Screen state that is not part of the game session.
#[derive(Debug, Default)]
struct Screen {
    /// End-of-game message, once announced.
    notice: Option<String>,
    /// Where the board was last drawn.
    board_area: Rect,
}

/// Sets up file logging for a terminal session.
///
/// The terminal is owned by the UI, so tracing goes to `log_file`.
pub fn init_file_logging(log_file: &Path) -> Result<()> {
    let file = std::fs::File::create(log_file)?;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,ttt_client=debug")),
        )
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

/// Runs an interactive game until the user quits.
pub async fn run_tui(config: GameConfig) -> Result<()> {
    info!(service_url = %config.service_url(), "Starting tic-tac-toe TUI");

    let service = Arc::new(HttpMoveService::new(config.service_url()));
    let driver = GameDriver::new(TurnController::from_config(&config, Instant::now()), service);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_game(&mut terminal, driver).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!(error = ?err, "Game loop error");
        eprintln!("Error: {:?}", err);
    }

    info!("TUI closed");
    Ok(())
}

#[instrument(skip_all)]
async fn run_game<B, S>(terminal: &mut Terminal<B>, mut driver: GameDriver<S>) -> Result<()>
where
    B: Backend,
    B::Error: Send + Sync + 'static,
    S: MoveService + 'static,
{
    let mut screen = Screen::default();
    let extent = driver.controller().renderer().geometry().extent();

    loop {
        let now = Instant::now();
        for outcome in driver.pump(now) {
            info!(%outcome, "Announcing outcome");
            screen.notice = Some(outcome.message());
        }

        terminal.draw(|f| {
            screen.board_area = view::draw(f, driver.controller(), screen.notice.as_deref(), now);
        })?;

        if !event::poll(FRAME)? {
            tokio::task::yield_now().await;
            continue;
        }

        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if let Flow::Quit = handle_key(key.code, &mut driver, &mut screen) {
                    info!("User quit");
                    return Ok(());
                }
            }
            Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                let area = screen.board_area;
                if let Some(point) = view::surface_point(area, mouse.column, mouse.row, extent) {
                    debug!(x = point.x, y = point.y, "Board clicked");
                    driver.controller_mut().click_at(point, Instant::now());
                }
            }
            _ => {}
        }
    }
}

fn handle_key<S: MoveService + 'static>(
    code: KeyCode,
    driver: &mut GameDriver<S>,
    screen: &mut Screen,
) -> Flow {
    let controller = driver.controller_mut();
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return Flow::Quit,
        KeyCode::Char('r') => {
            screen.notice = None;
            controller.reset(Instant::now());
        }
        KeyCode::Char(c @ '1'..='9') => {
            if let Some(digit) = c.to_digit(10) {
                controller.click(digit as usize - 1, Instant::now());
            }
        }
        KeyCode::Char('x') => {
            let side = controller.next_starting_side();
            controller.configure(Mark::X, side);
        }
        KeyCode::Char('o') => {
            let side = controller.next_starting_side();
            controller.configure(Mark::O, side);
        }
        KeyCode::Char('p') => {
            let mark = controller.next_player_mark();
            controller.configure(mark, Side::Player);
        }
        KeyCode::Char('a') => {
            let mark = controller.next_player_mark();
            controller.configure(mark, Side::Ai);
        }
        _ => {}
    }
    Flow::Continue
}
