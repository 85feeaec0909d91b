//! Chat session: transcript, background worker, and the controller that ties UI
//! events to remote calls.

mod controller;
mod surface;
mod transcript;
pub mod worker;

pub use controller::ChatController;
pub use surface::RenderSurface;
pub use transcript::{Speaker, Transcript, TranscriptLine};
pub use worker::{Job, Notifier, SubmitError, UiAction, Worker, JOB_PANICKED};

use crate::config::Config;
use crate::service::{SessionToken, WatsonClient};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Session token from config `session.clientId`, or a generated one.
pub fn session_token(config: &Config) -> SessionToken {
    config
        .session
        .client_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(SessionToken::new)
        .unwrap_or_else(SessionToken::generate)
}

/// Build a controller talking to the configured conversation service.
pub fn start_controller<S: RenderSurface>(
    config: &Config,
    surface: S,
    notify: Notifier,
) -> Result<ChatController<S>> {
    let client = WatsonClient::from_config(config).context("building conversation client")?;
    let token = session_token(config);
    log::info!("chat session token: {}", token);
    let worker = Worker::spawn(
        Arc::new(client),
        token,
        config.worker.queue_capacity,
        notify,
    )?;
    Ok(ChatController::new(surface, worker))
}
