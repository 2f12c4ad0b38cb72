use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use super::domain::AssessmentDraft;
use super::repository::{
    CandidateId, CandidateRecord, CandidateStore, NotifyError, StoreError, StoredCandidate,
    WebhookNotifier, WebhookPayload,
};
use super::scoring::{ScoreResult, ScoringEngine, ScoringError};

/// Scores a completed draft, stores it, and notifies the webhook for qualifying bands.
///
/// The two I/O stages run strictly in sequence: the webhook is only attempted once the store
/// has accepted the record.
pub struct SubmissionPipeline<S, N> {
    engine: ScoringEngine,
    store: Arc<S>,
    notifier: Arc<N>,
}

impl<S, N> SubmissionPipeline<S, N>
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    pub fn new(engine: ScoringEngine, store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            engine,
            store,
            notifier,
        }
    }

    pub fn engine(&self) -> &ScoringEngine {
        &self.engine
    }

    pub async fn finalize(&self, draft: &AssessmentDraft) -> SubmissionOutcome {
        let persisted = match self.persist(draft).await {
            Ok(persisted) => persisted,
            Err(err) => {
                warn!(error = %err, "assessment was not stored");
                return SubmissionOutcome::not_persisted(&err);
            }
        };

        let stage = self.notify(&persisted).await;
        SubmissionOutcome::persisted(&persisted, &stage)
    }

    /// First stage: score and store. Nothing is retained when this fails.
    pub async fn persist(
        &self,
        draft: &AssessmentDraft,
    ) -> Result<PersistedAssessment, SubmissionError> {
        let score = self.engine.score(&draft.answers)?;
        let record = CandidateRecord::from_draft(draft, &score);
        let stored = self.store.create(record).await?;

        info!(
            candidate_id = %stored.id.0,
            fit_score = score.final_score,
            classification = %score.classification,
            "assessment stored"
        );

        Ok(PersistedAssessment { stored, score })
    }

    /// Second stage: push to the webhook when the band qualifies.
    pub async fn notify(&self, persisted: &PersistedAssessment) -> NotificationStage {
        if !persisted.score.classification.qualifies_for_notification() {
            info!(
                candidate_id = %persisted.stored.id.0,
                classification = %persisted.score.classification,
                "webhook skipped for non-qualifying band"
            );
            return NotificationStage::Skipped;
        }

        let payload = WebhookPayload::from_record(&persisted.stored.record);
        match self.notifier.notify(&payload).await {
            Ok(()) => {
                info!(candidate_id = %persisted.stored.id.0, "webhook delivered");
                NotificationStage::Delivered
            }
            Err(err) => {
                warn!(
                    candidate_id = %persisted.stored.id.0,
                    error = %err,
                    "webhook delivery failed after the record was stored"
                );
                NotificationStage::Failed(err)
            }
        }
    }
}

/// Intermediate result between the store and webhook stages.
#[derive(Debug, Clone, PartialEq)]
pub struct PersistedAssessment {
    pub stored: StoredCandidate,
    pub score: ScoreResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStage {
    Skipped,
    Delivered,
    Failed(NotifyError),
}

impl NotificationStage {
    /// `None` when no notification was required.
    pub fn notified(&self) -> Option<bool> {
        match self {
            NotificationStage::Skipped => None,
            NotificationStage::Delivered => Some(true),
            NotificationStage::Failed(_) => Some(false),
        }
    }
}

/// Failures that abort a submission before anything is stored.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Persistence(#[from] StoreError),
    #[error("submission stopped unexpectedly: {0}")]
    Interrupted(String),
}

/// Transient result of one submission, shown to the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionOutcome {
    pub persisted: bool,
    pub notified: Option<bool>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub candidate_id: Option<CandidateId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<ScoreResult>,
}

impl SubmissionOutcome {
    pub(crate) fn not_persisted(err: &SubmissionError) -> Self {
        Self {
            persisted: false,
            notified: None,
            message: format!("Failed to save assessment: {err}"),
            candidate_id: None,
            score: None,
        }
    }

    fn persisted(persisted: &PersistedAssessment, stage: &NotificationStage) -> Self {
        let record = &persisted.stored.record;
        let summary = format!(
            "{} - {} ({} points)",
            record.name, record.classification, record.fit_score
        );
        let message = match stage {
            NotificationStage::Failed(err) => {
                format!("Assessment saved ({summary}), but the notification failed: {err}")
            }
            NotificationStage::Skipped | NotificationStage::Delivered => {
                format!("Assessment complete! {summary}")
            }
        };

        Self {
            persisted: true,
            notified: stage.notified(),
            message,
            candidate_id: Some(persisted.stored.id.clone()),
            score: Some(persisted.score),
        }
    }

    /// Stored, and the webhook either delivered or was not needed.
    pub fn is_complete(&self) -> bool {
        self.persisted && self.notified != Some(false)
    }
}
