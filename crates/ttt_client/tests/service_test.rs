//! End-to-end tests against an in-process mock move service.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use ttt_client::{
    GameDriver, HttpMoveService, MoveRequest, MoveResponse, MoveService, PacingConfig,
    TurnController, TurnPhase,
};
use ttt_core::{Board, CELL_COUNT, Cell, Mark, Outcome, Side};

/// How the mock answers.
#[derive(Clone, Copy)]
enum Behaviour {
    /// Mark the first empty cell.
    FirstEmpty,
    /// Overwrite the first occupied cell.
    Overwrite,
    /// Fail every request.
    Fail,
}

struct Mock {
    behaviour: Behaviour,
    requests: Mutex<Vec<serde_json::Value>>,
}

async fn handle_move(
    State(mock): State<Arc<Mock>>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    mock.requests.lock().unwrap().push(body.clone());

    if let Behaviour::Fail = mock.behaviour {
        return (StatusCode::INTERNAL_SERVER_ERROR, "engine offline").into_response();
    }

    let request: MoveRequest = serde_json::from_value(body).unwrap();
    let mut board: Board = request.board;
    match mock.behaviour {
        Behaviour::Overwrite => {
            let taken = (0..CELL_COUNT).find(|&i| !board.is_empty(i)).unwrap();
            let mut cells = *board.cells();
            cells[taken] = Cell::Occupied(request.ai_symbol);
            board = Board::from_cells(cells);
        }
        _ => {
            if let Some(index) = (0..CELL_COUNT).find(|&i| board.is_empty(i)) {
                board.place_mark(index, request.ai_symbol).unwrap();
            }
        }
    }
    Json(MoveResponse::new(board, None)).into_response()
}

async fn spawn_mock(behaviour: Behaviour) -> (String, Arc<Mock>) {
    let mock = Arc::new(Mock {
        behaviour,
        requests: Mutex::new(Vec::new()),
    });
    let app = Router::new()
        .route("/move", post(handle_move))
        .with_state(Arc::clone(&mock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), mock)
}

fn fast_driver(url: &str, player: Mark, starts: Side) -> GameDriver<HttpMoveService> {
    let pacing = PacingConfig::new(1, 1, 1, 1, 1);
    let controller = TurnController::new(player, starts, pacing, Instant::now());
    GameDriver::new(controller, Arc::new(HttpMoveService::new(url)))
}

/// Pumps until `done` holds, collecting announcements. Panics after 5 s.
async fn pump_until(
    driver: &mut GameDriver<HttpMoveService>,
    done: impl Fn(&TurnController) -> bool,
) -> Vec<Outcome> {
    let deadline = Instant::now() + Duration::from_secs(5);
    let mut announced = Vec::new();
    loop {
        announced.extend(driver.pump(Instant::now()));
        if done(driver.controller()) {
            return announced;
        }
        assert!(Instant::now() < deadline, "stuck in {}", driver.controller().phase().name());
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
}

#[tokio::test]
async fn test_center_opening_gets_corner_reply() {
    let (url, mock) = spawn_mock(Behaviour::FirstEmpty).await;
    let mut driver = fast_driver(&url, Mark::X, Side::Player);

    assert!(driver.controller_mut().click(4, Instant::now()));
    pump_until(&mut driver, |c| {
        c.history().len() == 2 && *c.phase() == TurnPhase::AwaitingPlayerInput
    })
    .await;

    let requests = mock.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0],
        serde_json::json!({
            "board": [" ", " ", " ", " ", "X", " ", " ", " ", " "],
            "aiSymbol": "O"
        })
    );

    let controller = driver.controller();
    assert_eq!(controller.history().lines(), vec!["#1: X at (2,2)", "#2: O at (1,1)"]);
    assert_eq!(controller.board().get(0).and_then(|c| c.mark()), Some(Mark::O));
    assert_eq!(controller.turn(), Side::Player);
}

#[tokio::test]
async fn test_full_game_announces_player_win() {
    let (url, _mock) = spawn_mock(Behaviour::FirstEmpty).await;
    let mut driver = fast_driver(&url, Mark::X, Side::Player);

    let mut announced = Vec::new();
    // AI answers 0, then 2; X completes the middle column.
    for index in [4, 1, 7] {
        assert!(driver.controller_mut().click(index, Instant::now()), "click {}", index);
        announced.extend(
            pump_until(&mut driver, |c| {
                let awaiting = *c.phase() == TurnPhase::AwaitingPlayerInput;
                c.is_game_over() || (awaiting && c.history().len() % 2 == 0)
            })
            .await,
        );
    }
    let announced_phase = |c: &TurnController| {
        matches!(c.phase(), TurnPhase::GameOver { announced: true, .. })
    };
    announced.extend(pump_until(&mut driver, announced_phase).await);

    let expected = Outcome::Win {
        mark: Mark::X,
        side: Side::Player,
        pattern: [1, 4, 7],
    };
    assert_eq!(announced, vec![expected]);
    assert_eq!(driver.controller().outcome(), Some(expected));
    assert_eq!(driver.controller().history().len(), 5);
    assert!(!driver.controller().timer().is_running());
}

#[tokio::test]
async fn test_ai_opening_move() {
    let (url, mock) = spawn_mock(Behaviour::FirstEmpty).await;
    let mut driver = fast_driver(&url, Mark::O, Side::Ai);

    pump_until(&mut driver, |c| *c.phase() == TurnPhase::AwaitingPlayerInput).await;

    let requests = mock.requests.lock().unwrap();
    assert_eq!(requests[0]["aiSymbol"], "X");
    assert_eq!(
        driver.controller().history().latest().map(|r| r.notation()),
        Some("X at (1,1)".to_string())
    );
}

#[tokio::test]
async fn test_service_error_carries_status() {
    let (url, _mock) = spawn_mock(Behaviour::Fail).await;
    let service = HttpMoveService::new(format!("{}/", url));

    let err = service
        .request_move(MoveRequest::new(Board::new(), Mark::O))
        .await
        .unwrap_err();
    assert!(err.message.contains("500"), "{}", err);
    assert!(err.message.contains("engine offline"), "{}", err);
}

#[tokio::test]
async fn test_failed_request_stalls_game() {
    let (url, mock) = spawn_mock(Behaviour::Fail).await;
    let mut driver = fast_driver(&url, Mark::X, Side::Player);

    driver.controller_mut().click(0, Instant::now());
    pump_until(&mut driver, |c| c.is_stalled()).await;

    // Stalled means no retry and no input.
    tokio::time::sleep(Duration::from_millis(20)).await;
    driver.pump(Instant::now());
    assert_eq!(mock.requests.lock().unwrap().len(), 1);
    assert!(!driver.controller_mut().click(8, Instant::now()));
    assert_eq!(driver.controller().history().len(), 1);

    driver.controller_mut().reset(Instant::now());
    assert!(!driver.controller().is_stalled());
    assert!(driver.controller().history().is_empty());
}

#[tokio::test]
async fn test_unreachable_service_stalls_game() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let mut driver = fast_driver(&url, Mark::X, Side::Player);
    driver.controller_mut().click(4, Instant::now());
    pump_until(&mut driver, |c| c.is_stalled()).await;
    assert_eq!(driver.controller().board().count(Mark::X), 1);
}

#[tokio::test]
async fn test_reply_overwriting_player_mark_stalls_game() {
    let (url, mock) = spawn_mock(Behaviour::Overwrite).await;
    let mut driver = fast_driver(&url, Mark::X, Side::Player);

    driver.controller_mut().click(4, Instant::now());
    pump_until(&mut driver, |c| c.is_stalled()).await;

    assert_eq!(mock.requests.lock().unwrap().len(), 1);
    let controller = driver.controller();
    assert_eq!(controller.history().lines(), vec!["#1: X at (2,2)"]);
    assert_eq!(controller.board().get(4), Some(Cell::Occupied(Mark::X)));
    assert_eq!(controller.board().count(Mark::O), 0);
}
