//! Turn controller: the game-session state machine.
//!
//! The controller owns the whole session (board, history, animator,
//! timer) and advances only when told to: `click` for human input,
//! `ai_replied` for service responses, and `tick` for the passage of
//! time. Every pause is a deadline stored in the current [`TurnPhase`];
//! `tick` checks the deadlines and returns the side effects the caller
//! must carry out.

use crate::animation::Animator;
use crate::config::{GameConfig, PacingConfig};
use crate::render::{Point, Renderer, Surface};
use crate::service::{MoveRequest, MoveResponse, MoveServiceError, find_changed_cell};
use crate::timer::GameTimer;
use std::time::Instant;
use ttt_core::{Board, Cell, Mark, MoveHistory, Outcome, Side, evaluate};
use tracing::{debug, info, instrument, warn};

/// Identifies one AI request. Replies carrying any other ticket are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
#[display("ticket#{}", _0)]
pub struct AiTicket(u64);

/// Progress of the AI's turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiRequest {
    /// Waiting for the pre-request pause to elapse.
    Scheduled {
        /// When the request goes out.
        at: Instant,
    },
    /// Request sent, reply pending. The "AI thinking" indicator is on.
    InFlight {
        /// Ticket the reply must carry.
        ticket: AiTicket,
    },
    /// The request failed. Nothing advances until a reset.
    Stalled,
}

/// Where the session is in the turn cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnPhase {
    /// Waiting for the human to pick a cell.
    AwaitingPlayerInput,
    /// The human's mark is being drawn.
    AnimatingPlayerMove {
        /// Earliest evaluation time.
        settle_at: Instant,
    },
    /// The AI's move is being fetched.
    RequestingAiMove(AiRequest),
    /// The AI's mark is being drawn.
    AnimatingAiMove {
        /// Earliest evaluation time.
        settle_at: Instant,
    },
    /// Terminal until reset.
    GameOver {
        /// How the game ended.
        outcome: Outcome,
        /// When the end-of-game announcement is due.
        announce_at: Instant,
        /// Whether the announcement has been emitted.
        announced: bool,
    },
}

impl TurnPhase {
    /// Short name for logs and status lines.
    pub fn name(&self) -> &'static str {
        match self {
            TurnPhase::AwaitingPlayerInput => "AwaitingPlayerInput",
            TurnPhase::AnimatingPlayerMove { .. } => "AnimatingPlayerMove",
            TurnPhase::RequestingAiMove(_) => "RequestingAiMove",
            TurnPhase::AnimatingAiMove { .. } => "AnimatingAiMove",
            TurnPhase::GameOver { .. } => "GameOver",
        }
    }
}

/// Work the caller must perform on the controller's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEffect {
    /// Send `request` to the move service; hand the reply back with `ticket`.
    RequestAiMove {
        /// Ticket for the reply.
        ticket: AiTicket,
        /// Request body.
        request: MoveRequest,
    },
    /// Show the end-of-game message.
    Announce(Outcome),
}

/// Owns one game session and drives it through [`TurnPhase`]s.
#[derive(Debug, Clone)]
pub struct TurnController {
    pacing: PacingConfig,
    player_mark: Mark,
    starting_side: Side,
    next_player_mark: Mark,
    next_starting_side: Side,
    board: Board,
    history: MoveHistory,
    animator: Animator,
    timer: GameTimer,
    renderer: Renderer,
    phase: TurnPhase,
    turn: Side,
    next_ticket: u64,
    service_message: Option<String>,
}

impl TurnController {
    /// Creates a controller and starts the first game at `now`.
    #[instrument(skip(pacing, now))]
    pub fn new(
        player_mark: Mark,
        starting_side: Side,
        pacing: PacingConfig,
        now: Instant,
    ) -> Self {
        let mut controller = Self {
            pacing,
            player_mark,
            starting_side,
            next_player_mark: player_mark,
            next_starting_side: starting_side,
            board: Board::new(),
            history: MoveHistory::new(),
            animator: Animator::new(pacing.animation()),
            timer: GameTimer::new(),
            renderer: Renderer::default(),
            phase: TurnPhase::AwaitingPlayerInput,
            turn: starting_side,
            next_ticket: 0,
            service_message: None,
        };
        controller.reset(now);
        controller
    }

    /// Creates a controller from a loaded configuration.
    pub fn from_config(config: &GameConfig, now: Instant) -> Self {
        Self::new(*config.player_mark(), *config.starting_side(), *config.pacing(), now)
    }

    /// Changes the chosen mark and starting side. Applies from the next reset.
    #[instrument(skip(self))]
    pub fn configure(&mut self, player_mark: Mark, starting_side: Side) {
        self.next_player_mark = player_mark;
        self.next_starting_side = starting_side;
    }

    /// Starts a fresh game at `now`.
    ///
    /// Any AI request still in flight is orphaned: its ticket will no
    /// longer match.
    #[instrument(
        skip(self, now),
        fields(player_mark = %self.next_player_mark, starting_side = %self.next_starting_side)
    )]
    pub fn reset(&mut self, now: Instant) {
        self.player_mark = self.next_player_mark;
        self.starting_side = self.next_starting_side;
        self.board.reset();
        self.history.clear();
        self.animator.cancel();
        self.timer.start(now);
        self.service_message = None;
        self.turn = self.starting_side;
        self.phase = match self.starting_side {
            Side::Player => TurnPhase::AwaitingPlayerInput,
            Side::Ai => TurnPhase::RequestingAiMove(AiRequest::Scheduled {
                at: now + self.pacing.ai_opening_delay(),
            }),
        };
        info!(phase = self.phase.name(), "Game reset");
    }

    /// Human clicked cell `index`.
    ///
    /// Accepted only while awaiting input, with no animation in flight,
    /// on an empty in-range cell. Anything else is ignored.
    #[instrument(skip(self, now))]
    pub fn click(&mut self, index: usize, now: Instant) -> bool {
        if self.phase != TurnPhase::AwaitingPlayerInput || self.animator.is_animating() {
            debug!(phase = self.phase.name(), "Click ignored");
            return false;
        }
        if !self.board.is_empty(index) {
            debug!("Click on unavailable cell ignored");
            return false;
        }

        self.history.record(self.player_mark, Side::Player, index);
        self.animator.start(index, self.player_mark, now);
        self.phase = TurnPhase::AnimatingPlayerMove {
            settle_at: now + self.pacing.evaluation_delay(),
        };
        true
    }

    /// Human clicked a point on the drawing surface.
    pub fn click_at(&mut self, point: Point, now: Instant) -> bool {
        match self.renderer.geometry().cell_at(point) {
            Some(index) => self.click(index, now),
            None => false,
        }
    }

    /// Advances timed transitions up to `now`.
    pub fn tick(&mut self, now: Instant) -> Vec<ControllerEffect> {
        self.animator.poll(now, &mut self.board);

        let mut effects = Vec::new();
        while self.advance(now, &mut effects) {}
        effects
    }

    /// Takes at most one timed transition. Returns whether one was taken.
    fn advance(&mut self, now: Instant, effects: &mut Vec<ControllerEffect>) -> bool {
        match self.phase {
            TurnPhase::AnimatingPlayerMove { settle_at } | TurnPhase::AnimatingAiMove { settle_at }
                if !self.animator.is_animating() && now >= settle_at =>
            {
                self.settle(now);
                true
            }
            TurnPhase::RequestingAiMove(AiRequest::Scheduled { at }) if now >= at => {
                let ticket = AiTicket(self.next_ticket);
                self.next_ticket += 1;
                self.phase = TurnPhase::RequestingAiMove(AiRequest::InFlight { ticket });
                info!(%ticket, "Requesting AI move");
                effects.push(ControllerEffect::RequestAiMove {
                    ticket,
                    request: MoveRequest::new(self.board, self.ai_mark()),
                });
                true
            }
            TurnPhase::GameOver {
                outcome,
                announce_at,
                announced: false,
            } if now >= announce_at => {
                self.phase = TurnPhase::GameOver {
                    outcome,
                    announce_at,
                    announced: true,
                };
                effects.push(ControllerEffect::Announce(outcome));
                true
            }
            _ => false,
        }
    }

    /// Evaluates the board after a committed move and hands the turn over.
    fn settle(&mut self, now: Instant) {
        if self.finish_if_terminal(now) {
            return;
        }
        match self.phase {
            TurnPhase::AnimatingPlayerMove { .. } => {
                self.turn = Side::Ai;
                self.phase = TurnPhase::RequestingAiMove(AiRequest::Scheduled {
                    at: now + self.pacing.ai_delay(),
                });
            }
            _ => {
                self.turn = Side::Player;
                self.phase = TurnPhase::AwaitingPlayerInput;
            }
        }
        debug!(phase = self.phase.name(), "Turn handed over");
    }

    /// Moves to `GameOver` if the board is terminal.
    ///
    /// Evaluation order is player win, opponent win, draw.
    fn finish_if_terminal(&mut self, now: Instant) -> bool {
        let Some(outcome) = evaluate(&self.board, self.player_mark) else {
            return false;
        };
        self.timer.stop(now);
        self.phase = TurnPhase::GameOver {
            outcome,
            announce_at: now + self.pacing.announce_delay(),
            announced: false,
        };
        info!(%outcome, elapsed_secs = self.timer.elapsed_secs(now), "Game over");
        true
    }

    /// Delivers the move service's answer to request `ticket`.
    ///
    /// Replies are ignored unless that exact request is in flight.
    #[instrument(skip(self, result, now))]
    pub fn ai_replied(
        &mut self,
        ticket: AiTicket,
        result: Result<MoveResponse, MoveServiceError>,
        now: Instant,
    ) {
        if self.phase != TurnPhase::RequestingAiMove(AiRequest::InFlight { ticket }) {
            debug!(phase = self.phase.name(), "Stale AI reply ignored");
            return;
        }

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "AI move request failed, game stalled");
                self.phase = TurnPhase::RequestingAiMove(AiRequest::Stalled);
                return;
            }
        };

        if let Some(message) = &response.message {
            info!(%message, "Move service message");
            self.service_message = Some(message.clone());
        }

        let ai_mark = self.ai_mark();
        match find_changed_cell(&self.board, &response.board) {
            Some(index)
                if !self.board.is_empty(index)
                    || response.board.get(index) != Some(Cell::Occupied(ai_mark)) =>
            {
                warn!(index, "AI reply is not a legal move, game stalled");
                self.phase = TurnPhase::RequestingAiMove(AiRequest::Stalled);
            }
            Some(index) => {
                self.history.record(ai_mark, Side::Ai, index);
                if !self.animator.start(index, ai_mark, now) {
                    warn!(index, "Animator busy, AI move not drawn");
                }
                self.phase = TurnPhase::AnimatingAiMove {
                    settle_at: now + self.pacing.evaluation_delay(),
                };
            }
            // Identical boards; the request only goes out on a non-terminal one.
            None => {
                info!("AI reply changed nothing, passing the turn");
                self.turn = Side::Player;
                self.phase = TurnPhase::AwaitingPlayerInput;
            }
        }
    }

    /// Draws the current frame onto `surface`.
    pub fn render(&self, surface: &mut dyn Surface, now: Instant) {
        let animating = self.animator.current().map(|a| a.partial_at(now));
        let highlight = self.outcome().and_then(|o| o.pattern());
        self.renderer
            .draw_frame(surface, &self.board, self.turn, animating, highlight);
    }

    /// The committed board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves placed so far, including one still animating.
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    /// The current phase.
    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    /// Side whose turn it is (or was, once the game is over).
    pub fn turn(&self) -> Side {
        self.turn
    }

    /// Mark the human plays.
    pub fn player_mark(&self) -> Mark {
        self.player_mark
    }

    /// Mark the AI plays.
    pub fn ai_mark(&self) -> Mark {
        self.player_mark.opponent()
    }

    /// Side that moved first in the current game.
    pub fn starting_side(&self) -> Side {
        self.starting_side
    }

    /// Mark the human will play after the next reset.
    pub fn next_player_mark(&self) -> Mark {
        self.next_player_mark
    }

    /// Side that will move first after the next reset.
    pub fn next_starting_side(&self) -> Side {
        self.next_starting_side
    }

    /// True while an AI request is outstanding.
    pub fn is_ai_thinking(&self) -> bool {
        matches!(
            self.phase,
            TurnPhase::RequestingAiMove(AiRequest::InFlight { .. })
        )
    }

    /// True once the AI request failed.
    pub fn is_stalled(&self) -> bool {
        self.phase == TurnPhase::RequestingAiMove(AiRequest::Stalled)
    }

    /// True while a mark is being drawn.
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }

    /// True in `GameOver`.
    pub fn is_game_over(&self) -> bool {
        matches!(self.phase, TurnPhase::GameOver { .. })
    }

    /// How the game ended, if it has.
    pub fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            TurnPhase::GameOver { outcome, .. } => Some(outcome),
            _ => None,
        }
    }

    /// Last message the service attached to a reply.
    pub fn service_message(&self) -> Option<&str> {
        self.service_message.as_deref()
    }

    /// The game timer.
    pub fn timer(&self) -> &GameTimer {
        &self.timer
    }

    /// The renderer, for mapping surface points.
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }
}
