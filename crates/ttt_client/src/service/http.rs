//! reqwest-backed move service client.

use super::{MoveRequest, MoveResponse, MoveService, MoveServiceError};
use tracing::{debug, info, instrument, warn};

/// Talks to the AI over `POST {base_url}/move`.
///
/// No timeout is configured; a request runs until it succeeds or fails.
#[derive(Debug, Clone)]
pub struct HttpMoveService {
    base_url: String,
    client: reqwest::Client,
}

impl HttpMoveService {
    /// Creates a client for the service at `base_url`.
    #[instrument(skip_all, fields(base_url = %base_url.as_ref()))]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        let base_url = base_url.as_ref().trim_end_matches('/').to_string();
        info!("Creating move service client");
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Endpoint URL.
    pub fn move_url(&self) -> String {
        format!("{}/move", self.base_url)
    }
}

#[async_trait::async_trait]
impl MoveService for HttpMoveService {
    #[instrument(skip(self, request), fields(ai_symbol = %request.ai_symbol))]
    async fn request_move(&self, request: MoveRequest) -> Result<MoveResponse, MoveServiceError> {
        debug!(board = ?request.board.cells(), "Requesting AI move");

        let response = self
            .client
            .post(self.move_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, body = %body, "Move service rejected request");
            return Err(MoveServiceError::new(format!("HTTP {} - {}", status, body)));
        }

        let reply: MoveResponse = response.json().await?;
        debug!(board = ?reply.board.cells(), message = ?reply.message, "Received AI move");
        Ok(reply)
    }
}
