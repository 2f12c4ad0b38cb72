use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::error;

use super::domain::{AssessmentAnswers, AssessmentDraft, AssessmentStep, CandidateInfo};
use super::machine::{FieldUpdate, FormError, FormStateMachine};
use super::notification::{Notice, NotificationController};
use super::pipeline::{SubmissionError, SubmissionOutcome, SubmissionPipeline};
use super::repository::{CandidateStore, WebhookNotifier};
use super::validation::{field_hints, FieldHint};

/// Identifier handed to clients driving a session remotely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("asm-{id:06}"))
}

/// Form and notice live behind one lock so the delayed reset clears both together.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) form: FormStateMachine,
    pub(crate) notice: Notice,
}

pub(crate) fn lock_state(state: &Mutex<SessionState>) -> MutexGuard<'_, SessionState> {
    state.lock().expect("session mutex poisoned")
}

/// One evaluator working through one assessment.
///
/// Dropping the session tears down its notification controller, which cancels a pending reset.
/// A submission already in flight keeps the controller alive until it has been presented.
pub struct AssessmentSession<S, N> {
    id: SessionId,
    state: Arc<Mutex<SessionState>>,
    pipeline: Arc<SubmissionPipeline<S, N>>,
    notifications: Arc<NotificationController>,
}

impl<S, N> AssessmentSession<S, N>
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    pub fn new(pipeline: Arc<SubmissionPipeline<S, N>>, reset_delay: Duration) -> Self {
        let state = Arc::new(Mutex::new(SessionState::default()));
        let notifications = Arc::new(NotificationController::new(
            Arc::clone(&state),
            reset_delay,
        ));

        Self {
            id: next_session_id(),
            state,
            pipeline,
            notifications,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn notifications(&self) -> &NotificationController {
        &self.notifications
    }

    pub fn draft(&self) -> AssessmentDraft {
        lock_state(&self.state).form.draft().clone()
    }

    pub fn notice(&self) -> Notice {
        lock_state(&self.state).notice.clone()
    }

    pub fn is_submitting(&self) -> bool {
        lock_state(&self.state).form.is_submitting()
    }

    pub fn view(&self) -> SessionView {
        let state = lock_state(&self.state);
        let form = &state.form;
        let draft = form.draft();

        SessionView {
            session_id: self.id.clone(),
            active_step: draft.active_step,
            step_title: draft.active_step.title(),
            step_position: draft.active_step.index() + 1,
            step_count: AssessmentStep::ALL.len(),
            progress: draft.active_step.progress(),
            candidate: draft.candidate.clone(),
            answers: draft.answers,
            submitting: form.is_submitting(),
            can_advance: form.can_advance(),
            can_retreat: form.can_retreat(),
            can_finalize: form.can_finalize(),
            hints: field_hints(draft),
            notice: state.notice.clone(),
        }
    }

    pub fn update(&self, update: FieldUpdate) -> Result<(), FormError> {
        self.interact(|form| form.apply(update))
    }

    pub fn advance(&self) -> Result<AssessmentStep, FormError> {
        self.interact(FormStateMachine::advance)
    }

    pub fn advance_on_confirm(&self) -> Result<AssessmentStep, FormError> {
        self.interact(FormStateMachine::advance_on_confirm)
    }

    pub fn retreat(&self) -> Result<AssessmentStep, FormError> {
        self.interact(FormStateMachine::retreat)
    }

    pub fn dismiss(&self) -> bool {
        self.notifications.dismiss()
    }

    /// Run the pipeline on the current draft. Refused while another submission is in flight
    /// or when any step is incomplete.
    ///
    /// The store and webhook calls run on their own task: dropping the returned future does
    /// not cancel them, and the outcome is still presented once they finish.
    pub async fn submit(&self) -> Result<SubmissionOutcome, FormError> {
        let draft = {
            let mut state = lock_state(&self.state);
            state.form.begin_submission()?
        };
        self.notifications.cancel();

        let pipeline = Arc::clone(&self.pipeline);
        let notifications = Arc::clone(&self.notifications);
        let task = tokio::spawn(async move {
            let outcome = pipeline.finalize(&draft).await;
            notifications.present(&outcome);
            outcome
        });

        match task.await {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                error!(session_id = %self.id, error = %err, "assessment submission task failed");
                let interrupted = SubmissionError::Interrupted(err.to_string());
                let outcome = SubmissionOutcome::not_persisted(&interrupted);
                self.notifications.present(&outcome);
                Ok(outcome)
            }
        }
    }

    /// Accepted interactions implicitly dismiss a notice that no reset is waiting to clear.
    fn interact<T>(
        &self,
        action: impl FnOnce(&mut FormStateMachine) -> Result<T, FormError>,
    ) -> Result<T, FormError> {
        let notice_is_stale = !self.notifications.is_reset_pending();
        let mut state = lock_state(&self.state);
        let result = action(&mut state.form);
        if result.is_ok() && notice_is_stale {
            state.notice.hide();
        }
        result
    }
}

/// Snapshot of a session for rendering.
#[derive(Debug, Clone, Serialize)]
pub struct SessionView {
    pub session_id: SessionId,
    pub active_step: AssessmentStep,
    pub step_title: &'static str,
    pub step_position: usize,
    pub step_count: usize,
    pub progress: f32,
    pub candidate: CandidateInfo,
    pub answers: AssessmentAnswers,
    pub submitting: bool,
    pub can_advance: bool,
    pub can_retreat: bool,
    pub can_finalize: bool,
    pub hints: Vec<FieldHint>,
    pub notice: Notice,
}
