//! Integration scenarios for the candidate fit assessment workflow.
//!
//! Scenarios drive the public service facade and HTTP router the way an evaluator would: fill
//! each step, navigate, submit, and then read the roster back.

mod common {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use chrono::{Duration as ChronoDuration, TimeZone, Utc};

    use fitscore::workflows::assessment::{
        AssessmentService, AssessmentSession, AssessmentSettings, CandidateId, CandidateRecord,
        CandidateStore, CultureDimension, EnergyDimension, FieldUpdate, NotifyError,
        PerformanceDimension, StoreError, StoredCandidate, WebhookNotifier, WebhookPayload,
    };

    pub(super) const RESET_DELAY: Duration = Duration::from_millis(1500);

    #[derive(Default, Clone)]
    pub(super) struct Store {
        records: Arc<Mutex<Vec<StoredCandidate>>>,
    }

    impl Store {
        pub(super) fn records(&self) -> Vec<StoredCandidate> {
            self.records.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl CandidateStore for Store {
        async fn create(&self, record: CandidateRecord) -> Result<StoredCandidate, StoreError> {
            let mut guard = self.records.lock().expect("lock");
            let sequence = guard.len() as i64 + 1;
            let stored = StoredCandidate {
                id: CandidateId(format!("cand-{sequence}")),
                created_at: Utc
                    .with_ymd_and_hms(2025, 6, 2, 14, 0, 0)
                    .single()
                    .expect("valid timestamp")
                    + ChronoDuration::seconds(sequence),
                record,
            };
            guard.push(stored.clone());
            Ok(stored)
        }

        async fn list(&self) -> Result<Vec<StoredCandidate>, StoreError> {
            let mut records = self.records();
            records.reverse();
            Ok(records)
        }
    }

    #[derive(Default, Clone)]
    pub(super) struct Webhook {
        payloads: Arc<Mutex<Vec<WebhookPayload>>>,
    }

    impl Webhook {
        pub(super) fn payloads(&self) -> Vec<WebhookPayload> {
            self.payloads.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl WebhookNotifier for Webhook {
        async fn notify(&self, payload: &WebhookPayload) -> Result<(), NotifyError> {
            self.payloads.lock().expect("lock").push(payload.clone());
            Ok(())
        }
    }

    pub(super) fn build_service() -> (Arc<AssessmentService<Store, Webhook>>, Store, Webhook) {
        let store = Store::default();
        let webhook = Webhook::default();
        let service = AssessmentService::new(
            Arc::new(store.clone()),
            Arc::new(webhook.clone()),
            AssessmentSettings {
                reset_delay: RESET_DELAY,
                ..AssessmentSettings::default()
            },
        );
        (Arc::new(service), store, webhook)
    }

    /// Ratings in presentation order: four performance, three energy, three culture.
    pub(super) fn fill(
        session: &AssessmentSession<Store, Webhook>,
        name: &str,
        email: &str,
        ratings: [u8; 10],
    ) {
        session
            .update(FieldUpdate::Name {
                value: name.to_string(),
            })
            .expect("edit accepted");
        session
            .update(FieldUpdate::Email {
                value: email.to_string(),
            })
            .expect("edit accepted");
        session.advance().expect("candidate step complete");

        for (dimension, value) in PerformanceDimension::ALL.iter().zip(&ratings[0..4]) {
            session
                .update(FieldUpdate::Performance {
                    dimension: *dimension,
                    value: (*value).into(),
                })
                .expect("rating accepted");
        }
        session.advance().expect("performance step complete");

        for (dimension, value) in EnergyDimension::ALL.iter().zip(&ratings[4..7]) {
            session
                .update(FieldUpdate::Energy {
                    dimension: *dimension,
                    value: (*value).into(),
                })
                .expect("rating accepted");
        }
        session.advance().expect("energy step complete");

        for (dimension, value) in CultureDimension::ALL.iter().zip(&ratings[7..10]) {
            session
                .update(FieldUpdate::Culture {
                    dimension: *dimension,
                    value: (*value).into(),
                })
                .expect("rating accepted");
        }
    }
}

mod navigation {
    use super::common::*;
    use fitscore::workflows::assessment::{AssessmentStep, FieldUpdate, FormError};

    #[test]
    fn steps_unlock_one_at_a_time() {
        let (service, _, _) = build_service();
        let session = service.open();

        assert_eq!(
            session.advance(),
            Err(FormError::StepIncomplete(AssessmentStep::CandidateInfo))
        );
        assert_eq!(session.retreat(), Err(FormError::AtFirstStep));

        session
            .update(FieldUpdate::Name {
                value: "Marina Costa".to_string(),
            })
            .expect("edit accepted");
        let view = session.view();
        assert!(!view.can_advance);
        assert_eq!(view.hints.len(), 0);

        session
            .update(FieldUpdate::Email {
                value: "marina@example.com".to_string(),
            })
            .expect("edit accepted");
        assert_eq!(session.advance_on_confirm(), Ok(AssessmentStep::Performance));

        let view = session.view();
        assert_eq!(view.step_title, "Performance");
        assert_eq!(view.step_position, 2);
        assert!(view.can_retreat);
        assert!(!view.can_advance);
    }

    #[test]
    fn filled_form_lands_on_last_step_ready_to_finalize() {
        let (service, _, _) = build_service();
        let session = service.open();
        fill(
            &session,
            "Marina Costa",
            "marina@example.com",
            [4, 4, 4, 4, 4, 4, 4, 4, 4, 4],
        );

        let view = session.view();
        assert_eq!(view.active_step, AssessmentStep::Culture);
        assert_eq!(view.step_title, "Cultura");
        assert_eq!(view.progress, 1.0);
        assert!(view.can_finalize);
        assert!(!view.can_advance);
    }
}

mod submission {
    use super::common::*;
    use fitscore::workflows::assessment::{
        AssessmentDraft, Classification, NoticeKind, RosterFilter,
    };

    #[tokio::test(start_paused = true)]
    async fn approved_candidate_is_stored_notified_and_form_restarts() {
        let (service, store, webhook) = build_service();
        let session = service.open();
        fill(
            &session,
            "Marina Costa",
            "marina@example.com",
            [5, 5, 5, 5, 5, 5, 5, 1, 1, 1],
        );

        let outcome = session.submit().await.expect("submission accepted");

        assert!(outcome.is_complete());
        assert_eq!(
            outcome.message,
            "Assessment complete! Marina Costa - Fit Aprovado (76 points)"
        );
        assert_eq!(store.records()[0].record.classification, Classification::ApprovedFit);
        assert_eq!(webhook.payloads()[0].fit_score, 76);
        assert_eq!(session.notice().kind, NoticeKind::Success);

        tokio::time::sleep(RESET_DELAY * 2).await;
        tokio::task::yield_now().await;

        assert_eq!(session.draft(), AssessmentDraft::default());
        assert!(!session.view().submitting);
        assert!(!session.notice().visible);
    }

    #[tokio::test]
    async fn out_of_profile_candidate_is_stored_without_webhook() {
        let (service, store, webhook) = build_service();
        let session = service.open();
        fill(
            &session,
            "Rafael Nunes",
            "rafael@example.com",
            [1, 2, 1, 2, 1, 1, 1, 2, 1, 1],
        );

        let outcome = session.submit().await.expect("submission accepted");

        assert!(outcome.persisted);
        assert_eq!(outcome.notified, None);
        assert!(outcome.is_complete());
        assert!(webhook.payloads().is_empty());

        let roster = service
            .roster(&RosterFilter::default())
            .await
            .expect("store lists");
        assert_eq!(roster.stats.total, 1);
        assert_eq!(roster.stats.out_of_profile, 1);
        assert_eq!(roster.candidates[0].name, "Rafael Nunes");
        assert_eq!(store.records()[0].record.fit_score, 26);
    }
}

mod http {
    use super::common::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use fitscore::workflows::assessment::assessment_router;
    use serde_json::Value;
    use tower::ServiceExt;

    #[tokio::test]
    async fn candidates_route_lists_submitted_assessments() {
        let (service, _, _) = build_service();
        let session = service.open();
        fill(
            &session,
            "Marina Costa",
            "marina@example.com",
            [4, 4, 4, 4, 4, 4, 4, 4, 4, 4],
        );
        session.submit().await.expect("submission accepted");

        let response = assessment_router(service)
            .oneshot(
                Request::get("/api/v1/candidates?search=marina")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), 4096)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["stats"]["very_high"], 1);
        assert_eq!(body["candidates"][0]["classification"], "Fit Altíssimo");
        assert_eq!(body["candidates"][0]["fit_score"], 80);
    }
}
