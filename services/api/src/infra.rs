use async_trait::async_trait;
use chrono::Utc;
use fitscore::workflows::assessment::{
    CandidateId, CandidateRecord, CandidateStore, StoreError, StoredCandidate,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local candidate store; records live as long as the service.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCandidateStore {
    records: Arc<Mutex<Vec<StoredCandidate>>>,
}

#[async_trait]
impl CandidateStore for InMemoryCandidateStore {
    async fn create(&self, record: CandidateRecord) -> Result<StoredCandidate, StoreError> {
        let mut guard = self.records.lock().expect("candidate store mutex poisoned");
        let stored = StoredCandidate {
            id: CandidateId(format!("cand-{:06}", guard.len() + 1)),
            created_at: Utc::now(),
            record,
        };
        guard.push(stored.clone());
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<StoredCandidate>, StoreError> {
        let guard = self.records.lock().expect("candidate store mutex poisoned");
        Ok(guard.iter().rev().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitscore::workflows::assessment::{AssessmentAnswers, Classification};

    fn record(name: &str, fit_score: u8) -> CandidateRecord {
        CandidateRecord {
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            fit_score,
            classification: Classification::from_score(fit_score),
            answers: AssessmentAnswers::default(),
        }
    }

    #[tokio::test]
    async fn store_assigns_ids_and_lists_newest_first() {
        let store = InMemoryCandidateStore::default();
        let first = store.create(record("Ana", 76)).await.expect("stored");
        let second = store.create(record("Bruno", 84)).await.expect("stored");

        assert_eq!(first.id, CandidateId("cand-000001".to_string()));
        assert_eq!(second.id, CandidateId("cand-000002".to_string()));

        let listed = store.list().await.expect("listed");
        let names: Vec<_> = listed.iter().map(|c| c.record.name.as_str()).collect();
        assert_eq!(names, vec!["Bruno", "Ana"]);
    }
}
