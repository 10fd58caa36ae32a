//! Win detection logic for tic-tac-toe.

use crate::board::{Board, Cell, Mark};
use tracing::instrument;

/// The eight winning index triples: rows, then columns, then diagonals.
pub const WIN_PATTERNS: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// Checks whether `mark` holds a full pattern.
///
/// Returns the first completed pattern in [`WIN_PATTERNS`] order, or `None`.
#[instrument(skip(board))]
pub fn has_winner(board: &Board, mark: Mark) -> Option<[usize; 3]> {
    WIN_PATTERNS.iter().copied().find(|pattern| {
        pattern
            .iter()
            .all(|&i| board.get(i) == Some(Cell::Occupied(mark)))
    })
}
