use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use super::pipeline::SubmissionOutcome;
use super::session::{lock_state, SessionState};

/// Default time a success message stays up before the form starts over.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    #[default]
    Success,
    Warning,
    Error,
}

/// Ephemeral message shown after a submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub visible: bool,
    pub message: String,
    pub kind: NoticeKind,
}

impl Notice {
    pub(crate) fn from_outcome(outcome: &SubmissionOutcome) -> Self {
        let kind = if outcome.is_complete() {
            NoticeKind::Success
        } else if outcome.persisted {
            NoticeKind::Warning
        } else {
            NoticeKind::Error
        };

        Self {
            visible: true,
            message: outcome.message.clone(),
            kind,
        }
    }

    pub(crate) fn hide(&mut self) {
        self.visible = false;
    }
}

/// Shows submission feedback and owns the one-shot reset armed after a complete submission.
///
/// The pending reset is aborted when the controller is dropped, so it never fires against a
/// torn-down session.
pub struct NotificationController {
    state: Arc<Mutex<SessionState>>,
    reset_delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl NotificationController {
    pub(crate) fn new(state: Arc<Mutex<SessionState>>, reset_delay: Duration) -> Self {
        Self {
            state,
            reset_delay,
            pending: Mutex::new(None),
        }
    }

    pub fn reset_delay(&self) -> Duration {
        self.reset_delay
    }

    /// Publish the outcome. Failure paths release the submission slot right away and leave
    /// the draft as entered; the complete path keeps the slot until the reset fires.
    pub(crate) fn present(&self, outcome: &SubmissionOutcome) {
        {
            let mut state = lock_state(&self.state);
            state.notice = Notice::from_outcome(outcome);
            if !outcome.is_complete() {
                state.form.end_submission();
                return;
            }
        }

        self.arm_reset();
    }

    fn arm_reset(&self) {
        self.cancel();

        let state = Arc::clone(&self.state);
        let delay = self.reset_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = lock_state(&state);
            state.notice.hide();
            state.form.reset();
            debug!("assessment form reset after successful submission");
        });

        debug!(delay_ms = delay.as_millis() as u64, "assessment reset armed");
        *self.pending.lock().expect("reset handle mutex poisoned") = Some(handle);
    }

    pub fn is_reset_pending(&self) -> bool {
        self.pending
            .lock()
            .expect("reset handle mutex poisoned")
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Abort the pending reset, if any. Returns whether one was still waiting.
    pub fn cancel(&self) -> bool {
        let handle = self
            .pending
            .lock()
            .expect("reset handle mutex poisoned")
            .take();

        match handle {
            Some(handle) if !handle.is_finished() => {
                handle.abort();
                debug!("pending assessment reset cancelled");
                true
            }
            _ => false,
        }
    }

    /// Hide a visible notice unless a reset is about to clear it anyway.
    pub fn dismiss(&self) -> bool {
        if self.is_reset_pending() {
            return false;
        }

        let mut state = lock_state(&self.state);
        let was_visible = state.notice.visible;
        state.notice.hide();
        was_visible
    }
}

impl Drop for NotificationController {
    fn drop(&mut self) {
        if let Some(handle) = self.pending.get_mut().ok().and_then(Option::take) {
            handle.abort();
        }
    }
}
