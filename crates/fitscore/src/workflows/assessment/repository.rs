use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    AssessmentAnswers, AssessmentDraft, CultureAnswers, EnergyAnswers, PerformanceAnswers,
};
use super::scoring::{Classification, ScoreResult};

/// Identifier assigned by the candidate store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Row written once per finalized assessment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateRecord {
    pub name: String,
    pub email: String,
    pub fit_score: u8,
    pub classification: Classification,
    pub answers: AssessmentAnswers,
}

impl CandidateRecord {
    pub fn from_draft(draft: &AssessmentDraft, score: &ScoreResult) -> Self {
        Self {
            name: draft.candidate.name.clone(),
            email: draft.candidate.email.clone(),
            fit_score: score.final_score,
            classification: score.classification,
            answers: draft.answers,
        }
    }
}

/// Record as returned by the store, stamped with its identity and creation time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCandidate {
    pub id: CandidateId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub record: CandidateRecord,
}

/// Persistence seam for finalized assessments.
#[async_trait]
pub trait CandidateStore: Send + Sync {
    async fn create(&self, record: CandidateRecord) -> Result<StoredCandidate, StoreError>;

    /// All stored candidates, newest first.
    async fn list(&self) -> Result<Vec<StoredCandidate>, StoreError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,
    #[error("candidate store unavailable: {0}")]
    Unavailable(String),
}

/// Body pushed to the webhook for qualifying candidates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub name: String,
    pub email: String,
    pub fit_score: u8,
    pub classification: Classification,
    pub performance_scores: PerformanceAnswers,
    #[serde(rename = "energia_scores")]
    pub energy_scores: EnergyAnswers,
    #[serde(rename = "cultura_scores")]
    pub culture_scores: CultureAnswers,
}

impl WebhookPayload {
    pub fn from_record(record: &CandidateRecord) -> Self {
        Self {
            name: record.name.clone(),
            email: record.email.clone(),
            fit_score: record.fit_score,
            classification: record.classification,
            performance_scores: record.answers.performance,
            energy_scores: record.answers.energy,
            culture_scores: record.answers.culture,
        }
    }
}

/// Outbound push channel (e.g. an automation webhook).
#[async_trait]
pub trait WebhookNotifier: Send + Sync {
    async fn notify(&self, payload: &WebhookPayload) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotifyError {
    #[error("webhook transport failed: {0}")]
    Transport(String),
    #[error("webhook responded with status {0}")]
    Status(u16),
    #[error("webhook response was not JSON: {0}")]
    InvalidBody(String),
}
