//! Bridges UI events to the worker and keeps the visible transcript.

use super::surface::RenderSurface;
use super::transcript::{Speaker, Transcript};
use super::worker::{Job, SubmitError, UiAction, Worker};
use std::time::Duration;

/// Owns the transcript and the render surface; lives on the UI context.
///
/// Input is enabled only once the window is ready and no job is pending. Every
/// transcript change is followed by a full re-render of the history text.
pub struct ChatController<S: RenderSurface> {
    surface: S,
    transcript: Transcript,
    worker: Worker,
    /// Jobs submitted whose `JobDone` has not arrived yet.
    pending: usize,
    window_ready: bool,
}

impl<S: RenderSurface> ChatController<S> {
    pub fn new(mut surface: S, worker: Worker) -> Self {
        let transcript = Transcript::new();
        surface.set_text(&transcript.render());
        surface.set_enabled(false);
        Self {
            surface,
            transcript,
            worker,
            pending: 0,
            window_ready: false,
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn input_enabled(&self) -> bool {
        self.window_ready && self.pending == 0
    }

    /// Request the welcome message. Only the first call has an effect.
    pub fn on_window_ready(&mut self) {
        if self.window_ready {
            return;
        }
        self.window_ready = true;
        self.submit(Job::Welcome);
        self.sync_enabled();
    }

    /// Handle text submitted from the input box. Returns true when the text was
    /// taken (the caller should clear the box); empty text or a locked input is
    /// ignored.
    pub fn on_user_submit(&mut self, text: &str) -> bool {
        if text.is_empty() || !self.input_enabled() {
            return false;
        }
        self.append(Speaker::You, text);
        self.submit(Job::Send(text.to_string()));
        self.sync_enabled();
        true
    }

    /// Empty the transcript now, then reset the remote session and fetch a new welcome.
    pub fn on_clear(&mut self) {
        self.transcript.clear();
        self.render();
        self.submit(Job::Clear);
        self.sync_enabled();
    }

    /// Apply whatever the worker has posted. Returns the number of actions applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Some(action) = self.worker.try_recv() {
            self.apply(action);
            applied += 1;
        }
        if self.pending > 0 && self.worker.is_stopped() {
            self.abandon_pending(SubmitError::Closed);
        }
        applied
    }

    /// Wait up to `timeout` for the worker, then apply everything available.
    pub fn pump_blocking(&mut self, timeout: Duration) -> usize {
        match self.worker.recv_timeout(timeout) {
            Some(action) => {
                self.apply(action);
                1 + self.pump()
            }
            None => self.pump(),
        }
    }

    fn apply(&mut self, action: UiAction) {
        match action {
            UiAction::Append(speaker, text) => self.append(speaker, text),
            UiAction::JobDone => {
                self.pending = self.pending.saturating_sub(1);
                self.sync_enabled();
            }
        }
    }

    fn submit(&mut self, job: Job) {
        match self.worker.submit(job) {
            Ok(()) => self.pending += 1,
            Err(SubmitError::Closed) => self.abandon_pending(SubmitError::Closed),
            Err(e) => {
                log::warn!("chat: could not queue job: {}", e);
                self.append(Speaker::Error, e.to_string());
            }
        }
    }

    /// The worker is gone: nothing pending will ever finish, so unlock input.
    fn abandon_pending(&mut self, reason: SubmitError) {
        log::warn!("chat: {}, dropping {} pending job(s)", reason, self.pending);
        self.pending = 0;
        self.append(Speaker::Error, reason.to_string());
        self.sync_enabled();
    }

    fn append(&mut self, speaker: Speaker, text: impl Into<String>) {
        self.transcript.push(speaker, text);
        self.render();
    }

    fn render(&mut self) {
        self.surface.set_text(&self.transcript.render());
    }

    fn sync_enabled(&mut self) {
        let enabled = self.input_enabled();
        self.surface.set_enabled(enabled);
    }
}
