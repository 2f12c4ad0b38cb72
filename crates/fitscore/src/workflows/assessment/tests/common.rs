use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::response::Response;
use chrono::{TimeZone, Utc};
use serde_json::Value;
use tokio::sync::Notify;

use crate::workflows::assessment::domain::{
    AssessmentAnswers, CultureAnswers, CultureDimension, EnergyAnswers, EnergyDimension,
    PerformanceAnswers, PerformanceDimension, Rating,
};
use crate::workflows::assessment::machine::{FieldUpdate, FormStateMachine};
use crate::workflows::assessment::pipeline::SubmissionPipeline;
use crate::workflows::assessment::repository::{
    CandidateId, CandidateRecord, CandidateStore, NotifyError, StoreError, StoredCandidate,
    WebhookNotifier, WebhookPayload,
};
use crate::workflows::assessment::scoring::{Classification, ScoringEngine};
use crate::workflows::assessment::service::{AssessmentService, AssessmentSettings};
use crate::workflows::assessment::session::AssessmentSession;

pub(super) const RESET_DELAY: Duration = Duration::from_secs(5);

fn rating(value: u8) -> Rating {
    Rating::new(value).expect("fixture rating within 1..5")
}

pub(super) fn answers(performance: [u8; 4], energy: [u8; 3], culture: [u8; 3]) -> AssessmentAnswers {
    AssessmentAnswers {
        performance: PerformanceAnswers {
            experience: rating(performance[0]),
            deliveries: rating(performance[1]),
            skills: rating(performance[2]),
            quality: rating(performance[3]),
        },
        energy: EnergyAnswers {
            availability: rating(energy[0]),
            deadlines: rating(energy[1]),
            pressure: rating(energy[2]),
        },
        culture: CultureAnswers {
            transparency: rating(culture[0]),
            collaboration: rating(culture[1]),
            innovation: rating(culture[2]),
        },
    }
}

/// 76 points, approved band.
pub(super) fn approved_answers() -> AssessmentAnswers {
    answers([5, 5, 5, 5], [5, 5, 5], [1, 1, 1])
}

/// 80 points, top band.
pub(super) fn very_high_answers() -> AssessmentAnswers {
    answers([4, 4, 4, 4], [4, 4, 4], [4, 4, 4])
}

/// 40 points, questionable band.
pub(super) fn questionable_answers() -> AssessmentAnswers {
    answers([2, 2, 2, 2], [2, 2, 2], [2, 2, 2])
}

pub(super) fn candidate_updates() -> Vec<FieldUpdate> {
    vec![
        FieldUpdate::Name {
            value: "Ana Souza".to_string(),
        },
        FieldUpdate::Email {
            value: "ana.souza@example.com".to_string(),
        },
    ]
}

pub(super) fn performance_updates(answers: &AssessmentAnswers) -> Vec<FieldUpdate> {
    PerformanceDimension::ALL
        .iter()
        .map(|dimension| FieldUpdate::Performance {
            dimension: *dimension,
            value: answers.performance.get(*dimension).value().into(),
        })
        .collect()
}

pub(super) fn energy_updates(answers: &AssessmentAnswers) -> Vec<FieldUpdate> {
    EnergyDimension::ALL
        .iter()
        .map(|dimension| FieldUpdate::Energy {
            dimension: *dimension,
            value: answers.energy.get(*dimension).value().into(),
        })
        .collect()
}

pub(super) fn culture_updates(answers: &AssessmentAnswers) -> Vec<FieldUpdate> {
    CultureDimension::ALL
        .iter()
        .map(|dimension| FieldUpdate::Culture {
            dimension: *dimension,
            value: answers.culture.get(*dimension).value().into(),
        })
        .collect()
}

fn updates_per_step(answers: &AssessmentAnswers) -> [Vec<FieldUpdate>; 4] {
    [
        candidate_updates(),
        performance_updates(answers),
        energy_updates(answers),
        culture_updates(answers),
    ]
}

/// Walk a fresh machine through every step, ending on the last one with all answers set.
pub(super) fn completed_machine(answers: &AssessmentAnswers) -> FormStateMachine {
    let mut machine = FormStateMachine::new();
    let steps = updates_per_step(answers);
    let last = steps.len() - 1;
    for (index, updates) in steps.into_iter().enumerate() {
        for update in updates {
            machine.apply(update).expect("fixture update accepted");
        }
        if index < last {
            machine.advance().expect("fixture step complete");
        }
    }
    machine
}

pub(super) fn complete_session<S, N>(session: &AssessmentSession<S, N>, answers: &AssessmentAnswers)
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    let steps = updates_per_step(answers);
    let last = steps.len() - 1;
    for (index, updates) in steps.into_iter().enumerate() {
        for update in updates {
            session.update(update).expect("fixture update accepted");
        }
        if index < last {
            session.advance().expect("fixture step complete");
        }
    }
}

pub(super) fn build_pipeline<S, N>(store: Arc<S>, notifier: Arc<N>) -> SubmissionPipeline<S, N>
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    SubmissionPipeline::new(ScoringEngine::default(), store, notifier)
}

pub(super) fn build_session<S, N>(store: Arc<S>, notifier: Arc<N>) -> AssessmentSession<S, N>
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    AssessmentSession::new(Arc::new(build_pipeline(store, notifier)), RESET_DELAY)
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryStore, MemoryNotifier>,
    Arc<MemoryStore>,
    Arc<MemoryNotifier>,
) {
    let store = Arc::new(MemoryStore::default());
    let notifier = Arc::new(MemoryNotifier::default());
    let service = AssessmentService::new(
        store.clone(),
        notifier.clone(),
        AssessmentSettings {
            reset_delay: RESET_DELAY,
            ..AssessmentSettings::default()
        },
    );
    (service, store, notifier)
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    records: Arc<Mutex<Vec<StoredCandidate>>>,
}

impl MemoryStore {
    pub(super) fn records(&self) -> Vec<StoredCandidate> {
        self.records.lock().expect("store mutex poisoned").clone()
    }

    pub(super) fn seed(&self, name: &str, email: &str, fit_score: u8) {
        let record = CandidateRecord {
            name: name.to_string(),
            email: email.to_string(),
            fit_score,
            classification: Classification::from_score(fit_score),
            answers: AssessmentAnswers::default(),
        };
        self.push(record);
    }

    fn push(&self, record: CandidateRecord) -> StoredCandidate {
        let mut guard = self.records.lock().expect("store mutex poisoned");
        let sequence = guard.len() as i64 + 1;
        let stored = StoredCandidate {
            id: CandidateId(format!("cand-{sequence:03}")),
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 1, 9, 0, 0)
                .single()
                .expect("valid timestamp")
                + chrono::Duration::minutes(sequence),
            record,
        };
        guard.push(stored.clone());
        stored
    }
}

#[async_trait]
impl CandidateStore for MemoryStore {
    async fn create(&self, record: CandidateRecord) -> Result<StoredCandidate, StoreError> {
        Ok(self.push(record))
    }

    async fn list(&self) -> Result<Vec<StoredCandidate>, StoreError> {
        let mut records = self.records();
        records.sort_by(|left, right| right.created_at.cmp(&left.created_at));
        Ok(records)
    }
}

pub(super) struct UnavailableStore;

#[async_trait]
impl CandidateStore for UnavailableStore {
    async fn create(&self, _record: CandidateRecord) -> Result<StoredCandidate, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }

    async fn list(&self) -> Result<Vec<StoredCandidate>, StoreError> {
        Err(StoreError::Unavailable("database offline".to_string()))
    }
}

/// Holds every `create` until [`GatedStore::release`] is called.
#[derive(Default)]
pub(super) struct GatedStore {
    gate: Notify,
    inner: MemoryStore,
}

impl GatedStore {
    pub(super) fn release(&self) {
        self.gate.notify_one();
    }

    pub(super) fn records(&self) -> Vec<StoredCandidate> {
        self.inner.records()
    }
}

#[async_trait]
impl CandidateStore for GatedStore {
    async fn create(&self, record: CandidateRecord) -> Result<StoredCandidate, StoreError> {
        self.gate.notified().await;
        self.inner.create(record).await
    }

    async fn list(&self) -> Result<Vec<StoredCandidate>, StoreError> {
        self.inner.list().await
    }
}

pub(super) struct PanickingStore;

#[async_trait]
impl CandidateStore for PanickingStore {
    async fn create(&self, _record: CandidateRecord) -> Result<StoredCandidate, StoreError> {
        panic!("driver crashed");
    }

    async fn list(&self) -> Result<Vec<StoredCandidate>, StoreError> {
        Ok(Vec::new())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryNotifier {
    payloads: Arc<Mutex<Vec<WebhookPayload>>>,
}

impl MemoryNotifier {
    pub(super) fn payloads(&self) -> Vec<WebhookPayload> {
        self.payloads.lock().expect("notifier mutex poisoned").clone()
    }
}

#[async_trait]
impl WebhookNotifier for MemoryNotifier {
    async fn notify(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
        self.payloads
            .lock()
            .expect("notifier mutex poisoned")
            .push(payload.clone());
        Ok(())
    }
}

#[derive(Default, Clone)]
pub(super) struct FailingNotifier {
    attempts: Arc<Mutex<usize>>,
}

impl FailingNotifier {
    pub(super) fn attempts(&self) -> usize {
        *self.attempts.lock().expect("notifier mutex poisoned")
    }
}

#[async_trait]
impl WebhookNotifier for FailingNotifier {
    async fn notify(&self, _payload: &WebhookPayload) -> Result<(), NotifyError> {
        *self.attempts.lock().expect("notifier mutex poisoned") += 1;
        Err(NotifyError::Status(502))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
