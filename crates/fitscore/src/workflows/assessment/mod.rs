//! Candidate fit assessment: a four-step form gated by per-step validation, a weighted
//! scoring rubric, and a submission pipeline that stores every result and pushes qualifying
//! ones to a webhook.
//!
//! Control flows one way: field edits mutate the [`FormStateMachine`], the validator gates
//! forward navigation, and a submission from the last step runs the [`SubmissionPipeline`]
//! before the [`NotificationController`] decides whether the form starts over.

pub mod domain;
pub mod machine;
pub mod notification;
pub mod pipeline;
pub mod repository;
pub mod roster;
pub mod router;
pub mod scoring;
pub mod service;
pub mod session;
pub mod validation;
pub mod webhook;

#[cfg(test)]
mod tests;

pub use domain::{
    AnswerBlock, AssessmentAnswers, AssessmentDraft, AssessmentStep, CandidateField,
    CandidateInfo, Category, CultureAnswers, CultureDimension, Dimension, EnergyAnswers,
    EnergyDimension, FieldKey, PerformanceAnswers, PerformanceDimension, Rating, RatingError,
    RatingInput, TouchedFields,
};
pub use machine::{FieldUpdate, FormError, FormStateMachine};
pub use notification::{Notice, NoticeKind, NotificationController, DEFAULT_RESET_DELAY};
pub use pipeline::{
    NotificationStage, PersistedAssessment, SubmissionError, SubmissionOutcome,
    SubmissionPipeline,
};
pub use repository::{
    CandidateId, CandidateRecord, CandidateStore, NotifyError, StoreError, StoredCandidate,
    WebhookNotifier, WebhookPayload,
};
pub use roster::{RosterEntry, RosterFilter, RosterStats, RosterView};
pub use router::assessment_router;
pub use scoring::{
    CategoryMeans, Classification, ScoreResult, ScoringEngine, ScoringError, ScoringWeights,
};
pub use service::{AssessmentService, AssessmentSettings, SessionError};
pub use session::{AssessmentSession, SessionId, SessionView};
pub use validation::{field_hints, is_step_valid, missing_fields, FieldHint};
pub use webhook::HttpWebhookNotifier;
