//! Pure tic-tac-toe game logic.
//!
//! Board storage, win/draw evaluation and the move history. Nothing here
//! performs I/O; the client crate drives these types from its turn
//! controller.
//!
//! # Example
//!
//! ```
//! use ttt_core::{Board, Mark, has_winner};
//!
//! let mut board = Board::new();
//! for index in [0, 1, 2] {
//!     board.place_mark(index, Mark::X).unwrap();
//! }
//! assert_eq!(has_winner(&board, Mark::X), Some([0, 1, 2]));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod board;
mod error;
mod history;
mod rules;

pub use board::{Board, CELL_COUNT, Cell, Mark, Side, row_col};
pub use error::MoveError;
pub use history::{MoveHistory, MoveRecord};
pub use rules::{Outcome, WIN_PATTERNS, evaluate, has_winner, is_draw};
