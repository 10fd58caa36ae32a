//! Draw detection logic for tic-tac-toe.

use super::win::has_winner;
use crate::board::{Board, Mark};
use tracing::instrument;

/// Checks for a draw: every cell is filled and neither mark has won.
#[instrument(skip(board))]
pub fn is_draw(board: &Board) -> bool {
    board.is_full() && has_winner(board, Mark::X).is_none() && has_winner(board, Mark::O).is_none()
}
