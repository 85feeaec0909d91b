//! Single-consumer background queue for remote calls.
//!
//! Jobs are drained one at a time on a dedicated thread, so exactly one remote
//! call is in flight and results come back in submission order. Results are
//! posted to the UI context as [`UiAction`]s; every job ends with
//! [`UiAction::JobDone`] whether it succeeded, failed or panicked.

use super::transcript::Speaker;
use crate::service::{ConversationService, SessionToken};
use anyhow::{Context, Result};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc as job_mpsc;

/// Called after actions are posted so the UI context wakes up to drain them.
pub type Notifier = Arc<dyn Fn() + Send + Sync>;

/// Error line shown when a remote call panics instead of returning.
pub const JOB_PANICKED: &str = "conversation request panicked";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Job {
    /// Request the welcome message.
    Welcome,
    /// Send user text.
    Send(String),
    /// Drop the remote session, then request a fresh welcome message.
    Clear,
}

/// Posted from the worker back to the UI context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    Append(Speaker, String),
    JobDone,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SubmitError {
    #[error("chat queue is full")]
    Full,
    #[error("chat worker has stopped")]
    Closed,
}

pub struct Worker {
    jobs: job_mpsc::Sender<Job>,
    actions: mpsc::Receiver<UiAction>,
}

impl Worker {
    /// Start the worker thread. `capacity` bounds how many jobs may wait.
    pub fn spawn(
        service: Arc<dyn ConversationService>,
        token: SessionToken,
        capacity: usize,
        notify: Notifier,
    ) -> Result<Self> {
        let (jobs_tx, jobs_rx) = job_mpsc::channel(capacity.max(1));
        let (actions_tx, actions_rx) = mpsc::channel();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building chat worker runtime")?;
        std::thread::Builder::new()
            .name("chat-worker".to_string())
            .spawn(move || rt.block_on(run_jobs(service, token, jobs_rx, actions_tx, notify)))
            .context("spawning chat worker thread")?;
        Ok(Self {
            jobs: jobs_tx,
            actions: actions_rx,
        })
    }

    pub fn submit(&self, job: Job) -> Result<(), SubmitError> {
        self.jobs.try_send(job).map_err(|e| match e {
            job_mpsc::error::TrySendError::Full(_) => SubmitError::Full,
            job_mpsc::error::TrySendError::Closed(_) => SubmitError::Closed,
        })
    }

    /// True once the worker thread has exited; no queued job will run after that.
    pub fn is_stopped(&self) -> bool {
        self.jobs.is_closed()
    }

    pub fn try_recv(&self) -> Option<UiAction> {
        self.actions.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<UiAction> {
        self.actions.recv_timeout(timeout).ok()
    }
}

async fn run_jobs(
    service: Arc<dyn ConversationService>,
    token: SessionToken,
    mut jobs: job_mpsc::Receiver<Job>,
    actions: mpsc::Sender<UiAction>,
    notify: Notifier,
) {
    log::debug!("chat worker started for {}", token);
    while let Some(job) = jobs.recv().await {
        log::debug!("chat worker: running {:?}", job);
        let task = {
            let service = service.clone();
            let token = token.clone();
            tokio::spawn(async move { run_job(service.as_ref(), &token, job).await })
        };
        let mut posted = match task.await {
            Ok(posted) => posted,
            Err(e) => {
                log::error!("chat worker: job did not complete: {}", e);
                vec![UiAction::Append(Speaker::Error, JOB_PANICKED.to_string())]
            }
        };
        posted.push(UiAction::JobDone);
        for action in posted {
            if actions.send(action).is_err() {
                log::debug!("chat worker: ui receiver closed, stopping");
                return;
            }
        }
        notify();
    }
    log::debug!("chat worker: job queue closed, stopping");
}

/// Run one job and return the lines to append. Failures become an error line.
async fn run_job(
    service: &dyn ConversationService,
    token: &SessionToken,
    job: Job,
) -> Vec<UiAction> {
    let result = match job {
        Job::Welcome => service.start_session(token).await,
        Job::Send(text) => service.send_message(token, &text).await,
        Job::Clear => match service.clear_session(token).await {
            Ok(()) => service.start_session(token).await,
            Err(e) => Err(e),
        },
    };
    match result {
        Ok(text) => vec![UiAction::Append(Speaker::Watson, text)],
        Err(e) => {
            log::warn!("chat worker: remote call failed: {}", e);
            vec![UiAction::Append(Speaker::Error, e.to_string())]
        }
    }
}
