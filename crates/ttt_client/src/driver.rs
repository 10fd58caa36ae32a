//! Async glue between the turn controller and the move service.

use crate::controller::{AiTicket, ControllerEffect, TurnController};
use crate::service::{MoveRequest, MoveResponse, MoveService, MoveServiceError};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use ttt_core::Outcome;
use tracing::{debug, instrument};

/// A finished AI request, waiting to be handed to the controller.
#[derive(Debug)]
pub struct AiReply {
    ticket: AiTicket,
    result: Result<MoveResponse, MoveServiceError>,
}

/// Runs a [`TurnController`] against a [`MoveService`].
///
/// Each AI request runs on its own tokio task; its reply comes back
/// through a channel and is applied on the next [`pump`](Self::pump), so
/// the controller itself is only ever touched from the caller's task.
pub struct GameDriver<S> {
    controller: TurnController,
    service: Arc<S>,
    replies_tx: mpsc::UnboundedSender<AiReply>,
    replies_rx: mpsc::UnboundedReceiver<AiReply>,
}

impl<S: MoveService + 'static> GameDriver<S> {
    /// Creates a driver around `controller`.
    pub fn new(controller: TurnController, service: Arc<S>) -> Self {
        let (replies_tx, replies_rx) = mpsc::unbounded_channel();
        Self {
            controller,
            service,
            replies_tx,
            replies_rx,
        }
    }

    /// The session.
    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    /// The session, for input and resets.
    pub fn controller_mut(&mut self) -> &mut TurnController {
        &mut self.controller
    }

    /// Brings the session up to `now`.
    ///
    /// Applies finished AI replies, runs timed transitions and launches any
    /// AI request they produce. Returns outcomes due for announcement.
    /// Must be called from within a tokio runtime.
    pub fn pump(&mut self, now: Instant) -> Vec<Outcome> {
        while let Ok(reply) = self.replies_rx.try_recv() {
            self.controller.ai_replied(reply.ticket, reply.result, now);
        }

        let mut announcements = Vec::new();
        for effect in self.controller.tick(now) {
            match effect {
                ControllerEffect::RequestAiMove { ticket, request } => {
                    self.spawn_request(ticket, request);
                }
                ControllerEffect::Announce(outcome) => announcements.push(outcome),
            }
        }
        announcements
    }

    #[instrument(skip(self, request))]
    fn spawn_request(&self, ticket: AiTicket, request: MoveRequest) {
        let service = Arc::clone(&self.service);
        let replies = self.replies_tx.clone();
        tokio::spawn(async move {
            let result = service.request_move(request).await;
            if replies.send(AiReply { ticket, result }).is_err() {
                debug!(%ticket, "Driver gone, AI reply dropped");
            }
        });
    }
}
