use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use serde_json::json;

use super::machine::{FieldUpdate, FormError};
use super::repository::{CandidateStore, WebhookNotifier};
use super::roster::RosterFilter;
use super::service::{AssessmentService, SessionError};
use super::session::{AssessmentSession, SessionId};

type SharedService<S, N> = Arc<AssessmentService<S, N>>;

/// Router builder exposing the assessment form and the candidate listing.
pub fn assessment_router<S, N>(service: SharedService<S, N>) -> Router
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    Router::new()
        .route("/api/v1/assessments", post(open_handler::<S, N>))
        .route(
            "/api/v1/assessments/:session_id",
            get(view_handler::<S, N>).delete(close_handler::<S, N>),
        )
        .route(
            "/api/v1/assessments/:session_id/fields",
            patch(update_handler::<S, N>),
        )
        .route(
            "/api/v1/assessments/:session_id/advance",
            post(advance_handler::<S, N>),
        )
        .route(
            "/api/v1/assessments/:session_id/retreat",
            post(retreat_handler::<S, N>),
        )
        .route(
            "/api/v1/assessments/:session_id/submit",
            post(submit_handler::<S, N>),
        )
        .route(
            "/api/v1/assessments/:session_id/dismiss",
            post(dismiss_handler::<S, N>),
        )
        .route("/api/v1/candidates", get(roster_handler::<S, N>))
        .with_state(service)
}

pub(crate) async fn open_handler<S, N>(State(service): State<SharedService<S, N>>) -> Response
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    let session = service.open();
    (StatusCode::CREATED, axum::Json(session.view())).into_response()
}

pub(crate) async fn view_handler<S, N>(
    State(service): State<SharedService<S, N>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    match service.session(&SessionId(session_id)) {
        Ok(session) => (StatusCode::OK, axum::Json(session.view())).into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn close_handler<S, N>(
    State(service): State<SharedService<S, N>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    match service.close(&SessionId(session_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => session_error_response(error),
    }
}

pub(crate) async fn update_handler<S, N>(
    State(service): State<SharedService<S, N>>,
    Path(session_id): Path<String>,
    axum::Json(update): axum::Json<FieldUpdate>,
) -> Response
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    with_session(&service, session_id, |session| {
        session.update(update).map(|()| session.view())
    })
}

pub(crate) async fn advance_handler<S, N>(
    State(service): State<SharedService<S, N>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    with_session(&service, session_id, |session| {
        session.advance().map(|_| session.view())
    })
}

pub(crate) async fn retreat_handler<S, N>(
    State(service): State<SharedService<S, N>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    with_session(&service, session_id, |session| {
        session.retreat().map(|_| session.view())
    })
}

pub(crate) async fn dismiss_handler<S, N>(
    State(service): State<SharedService<S, N>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    with_session(&service, session_id, |session| {
        session.dismiss();
        Ok(session.view())
    })
}

pub(crate) async fn submit_handler<S, N>(
    State(service): State<SharedService<S, N>>,
    Path(session_id): Path<String>,
) -> Response
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    let session = match service.session(&SessionId(session_id)) {
        Ok(session) => session,
        Err(error) => return session_error_response(error),
    };

    match session.submit().await {
        Ok(outcome) => {
            let payload = json!({
                "outcome": outcome,
                "session": session.view(),
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => form_error_response(error),
    }
}

pub(crate) async fn roster_handler<S, N>(
    State(service): State<SharedService<S, N>>,
    Query(filter): Query<RosterFilter>,
) -> Response
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
{
    match service.roster(&filter).await {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => {
            let payload = json!({ "error": error.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, axum::Json(payload)).into_response()
        }
    }
}

fn with_session<S, N, T>(
    service: &SharedService<S, N>,
    session_id: String,
    action: impl FnOnce(&AssessmentSession<S, N>) -> Result<T, FormError>,
) -> Response
where
    S: CandidateStore + 'static,
    N: WebhookNotifier + 'static,
    T: serde::Serialize,
{
    let session = match service.session(&SessionId(session_id)) {
        Ok(session) => session,
        Err(error) => return session_error_response(error),
    };

    match action(&session) {
        Ok(body) => (StatusCode::OK, axum::Json(body)).into_response(),
        Err(error) => form_error_response(error),
    }
}

fn session_error_response(error: SessionError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}

pub(crate) fn form_error_status(error: &FormError) -> StatusCode {
    match error {
        FormError::InvalidRating(_) => StatusCode::UNPROCESSABLE_ENTITY,
        FormError::StepIncomplete(_)
        | FormError::AtFirstStep
        | FormError::AtLastStep
        | FormError::SubmissionInFlight => StatusCode::CONFLICT,
    }
}

fn form_error_response(error: FormError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (form_error_status(&error), axum::Json(payload)).into_response()
}
