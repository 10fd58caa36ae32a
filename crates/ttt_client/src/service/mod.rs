//! The remote AI move service.
//!
//! The AI is an external collaborator reached over HTTP. This module holds
//! the wire types, the [`MoveService`] seam the controller talks through,
//! and the reqwest-backed implementation.

mod error;
mod http;

pub use error::MoveServiceError;
pub use http::HttpMoveService;

use derive_new::new;
use serde::{Deserialize, Serialize};
use ttt_core::{Board, CELL_COUNT, Mark};

/// Body of `POST /move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct MoveRequest {
    /// Board as the client sees it.
    pub board: Board,
    /// Mark the AI plays.
    #[serde(rename = "aiSymbol")]
    pub ai_symbol: Mark,
}

/// Response of `POST /move`: the board after the AI's move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct MoveResponse {
    /// Board with one more mark than the request.
    pub board: Board,
    /// Optional status text, sent by the service once the game has ended.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Something that can produce the AI's next board.
#[async_trait::async_trait]
pub trait MoveService: Send + Sync {
    /// Asks for the AI's move on `request.board`.
    async fn request_move(&self, request: MoveRequest) -> Result<MoveResponse, MoveServiceError>;
}

/// First cell (linear scan) where `after` differs from `before`.
pub fn find_changed_cell(before: &Board, after: &Board) -> Option<usize> {
    (0..CELL_COUNT).find(|&i| before.get(i) != after.get(i))
}
