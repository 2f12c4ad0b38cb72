use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tracing::debug;

use super::notification::DEFAULT_RESET_DELAY;
use super::pipeline::SubmissionPipeline;
use super::repository::{CandidateStore, StoreError, WebhookNotifier};
use super::roster::{RosterFilter, RosterView};
use super::scoring::{ScoringEngine, ScoringWeights};
use super::session::{AssessmentSession, SessionId};

/// Tunables shared by every session the service opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentSettings {
    pub weights: ScoringWeights,
    pub reset_delay: Duration,
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            reset_delay: DEFAULT_RESET_DELAY,
        }
    }
}

/// Registry of live sessions sharing one pipeline and candidate store.
pub struct AssessmentService<S, N> {
    pipeline: Arc<SubmissionPipeline<S, N>>,
    store: Arc<S>,
    reset_delay: Duration,
    sessions: Mutex<HashMap<SessionId, Arc<AssessmentSession<S, N>>>>,
}

impl<S, N> AssessmentService<S, N>
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    pub fn new(store: Arc<S>, notifier: Arc<N>, settings: AssessmentSettings) -> Self {
        let engine = ScoringEngine::new(settings.weights);
        let pipeline = Arc::new(SubmissionPipeline::new(engine, Arc::clone(&store), notifier));

        Self {
            pipeline,
            store,
            reset_delay: settings.reset_delay,
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Start a fresh assessment with all defaults on the first step.
    pub fn open(&self) -> Arc<AssessmentSession<S, N>> {
        let session = Arc::new(AssessmentSession::new(
            Arc::clone(&self.pipeline),
            self.reset_delay,
        ));
        self.sessions
            .lock()
            .expect("session registry mutex poisoned")
            .insert(session.id().clone(), Arc::clone(&session));
        debug!(session_id = %session.id(), "assessment session opened");
        session
    }

    pub fn session(&self, id: &SessionId) -> Result<Arc<AssessmentSession<S, N>>, SessionError> {
        self.sessions
            .lock()
            .expect("session registry mutex poisoned")
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Tear a session down. Its pending reset is cancelled once the last handle is released.
    pub fn close(&self, id: &SessionId) -> Result<(), SessionError> {
        let removed = self
            .sessions
            .lock()
            .expect("session registry mutex poisoned")
            .remove(id);

        match removed {
            Some(session) => {
                session.notifications().cancel();
                debug!(session_id = %id, "assessment session closed");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.clone())),
        }
    }

    pub fn open_sessions(&self) -> usize {
        self.sessions
            .lock()
            .expect("session registry mutex poisoned")
            .len()
    }

    pub async fn roster(&self, filter: &RosterFilter) -> Result<RosterView, StoreError> {
        let candidates = self.store.list().await?;
        Ok(RosterView::build(&candidates, filter))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("assessment session {0} not found")]
    NotFound(SessionId),
}
