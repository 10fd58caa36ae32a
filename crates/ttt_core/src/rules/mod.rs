//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Rules are kept apart from board
//! storage so the controller decides when, and in what order, they run.

mod draw;
mod win;

pub use draw::is_draw;
pub use win::{WIN_PATTERNS, has_winner};

use crate::board::{Board, Mark, Side};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// One side completed a pattern.
    Win {
        /// The winning mark.
        mark: Mark,
        /// Which side owns the winning mark.
        side: Side,
        /// The completed pattern.
        pattern: [usize; 3],
    },
    /// Board full, nobody won.
    Draw,
}

impl Outcome {
    /// Returns the winning side, if any.
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Win { side, .. } => Some(*side),
            Outcome::Draw => None,
        }
    }

    /// Returns the completed pattern, if any.
    pub fn pattern(&self) -> Option<[usize; 3]> {
        match self {
            Outcome::Win { pattern, .. } => Some(*pattern),
            Outcome::Draw => None,
        }
    }

    /// End-of-game message shown to the player.
    pub fn message(&self) -> String {
        match self {
            Outcome::Win { mark, .. } => format!("Player {} wins!", mark),
            Outcome::Draw => "It's a draw!".to_string(),
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

/// Evaluates the board from the player's point of view.
///
/// Order is fixed: player win, then opponent win, then draw. A move that
/// both fills the board and completes a pattern is reported as a win.
#[instrument(skip(board))]
pub fn evaluate(board: &Board, player: Mark) -> Option<Outcome> {
    let checks = [(player, Side::Player), (player.opponent(), Side::Ai)];
    for (mark, side) in checks {
        if let Some(pattern) = has_winner(board, mark) {
            debug!(%mark, %side, ?pattern, "Winner found");
            return Some(Outcome::Win {
                mark,
                side,
                pattern,
            });
        }
    }

    if board.is_full() {
        debug!("Board full with no winner");
        return Some(Outcome::Draw);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_of(symbols: [&str; 9]) -> Board {
        let mut board = Board::new();
        for (index, symbol) in symbols.iter().enumerate() {
            match *symbol {
                "X" => board.place_mark(index, Mark::X).unwrap(),
                "O" => board.place_mark(index, Mark::O).unwrap(),
                _ => {}
            }
        }
        board
    }

    #[test]
    fn test_in_progress_board_has_no_outcome() {
        let board = board_of(["X", " ", " ", " ", "O", " ", " ", " ", " "]);
        assert_eq!(evaluate(&board, Mark::X), None);
    }

    #[test]
    fn test_player_win_reported_with_side() {
        let board = board_of(["X", "X", "X", " ", "O", " ", " ", "O", " "]);
        let outcome = evaluate(&board, Mark::X).unwrap();
        assert_eq!(outcome.winner(), Some(Side::Player));
        assert_eq!(outcome.pattern(), Some([0, 1, 2]));
        assert_eq!(outcome.message(), "Player X wins!");
    }

    #[test]
    fn test_opponent_win_when_player_is_o() {
        let board = board_of(["X", "X", "X", " ", "O", " ", " ", "O", " "]);
        let outcome = evaluate(&board, Mark::O).unwrap();
        assert_eq!(outcome.winner(), Some(Side::Ai));
    }

    #[test]
    fn test_full_board_win_beats_draw() {
        // X completes the left column with the last free cell.
        let board = board_of(["X", "O", "X", "X", "O", "O", "X", "X", "O"]);
        assert!(board.is_full());
        let outcome = evaluate(&board, Mark::O).unwrap();
        assert_eq!(
            outcome,
            Outcome::Win {
                mark: Mark::X,
                side: Side::Ai,
                pattern: [0, 3, 6],
            }
        );
    }

    #[test]
    fn test_draw_message() {
        let board = board_of(["X", "O", "X", "X", "O", "O", "O", "X", "X"]);
        let outcome = evaluate(&board, Mark::X).unwrap();
        assert_eq!(outcome, Outcome::Draw);
        assert_eq!(outcome.to_string(), "It's a draw!");
    }
}
