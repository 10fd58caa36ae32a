//! Tic-tac-toe client against a remote AI move service.
//!
//! # Architecture
//!
//! - **Controller**: the turn state machine, driven by clicks, replies and ticks
//! - **Animation**: time-driven marker placement with a one-at-a-time guard
//! - **Render**: board drawing over an abstract line/arc/clear surface
//! - **Service**: `POST /move` client for the AI opponent
//! - **Driver**: tokio glue running AI requests off the controller's task
//! - **TUI**: ratatui front end
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Instant;
//! use ttt_client::{GameConfig, GameDriver, HttpMoveService, TurnController};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = GameConfig::default();
//! let service = Arc::new(HttpMoveService::new(config.service_url()));
//! let controller = TurnController::from_config(&config, Instant::now());
//! let mut driver = GameDriver::new(controller, service);
//!
//! driver.controller_mut().click(4, Instant::now());
//! let announcements = driver.pump(Instant::now());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod animation;
mod config;
mod controller;
mod driver;
mod render;
mod service;
mod timer;

pub mod cli;
pub mod tui;

// Crate-level exports - Configuration
pub use config::{ConfigError, GameConfig, PacingConfig};

// Crate-level exports - Turn controller
pub use controller::{AiRequest, AiTicket, ControllerEffect, TurnController, TurnPhase};
pub use driver::GameDriver;

// Crate-level exports - Animation and timing
pub use animation::{Animator, MarkAnimation, progress};
pub use timer::GameTimer;

// Crate-level exports - Rendering
pub use render::{
    BoardGeometry, Color, DisplayList, DrawCommand, PartialMark, Point, Rect, Renderer, Stroke,
    Surface,
};

// Crate-level exports - Move service
pub use service::{
    HttpMoveService, MoveRequest, MoveResponse, MoveService, MoveServiceError, find_changed_cell,
};
