use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCandidateStore};
use crate::routes::with_assessment_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use fitscore::config::AppConfig;
use fitscore::error::AppError;
use fitscore::telemetry;
use fitscore::workflows::assessment::{AssessmentService, HttpWebhookNotifier};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryCandidateStore::default());
    let notifier = Arc::new(HttpWebhookNotifier::new(
        config.assessment.webhook_url.clone(),
        config.assessment.webhook_timeout,
    )?);
    let assessment_service = Arc::new(AssessmentService::new(
        store,
        notifier,
        config.assessment.settings(),
    ));

    let app = with_assessment_routes(assessment_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|source| AppError::Bind { addr, source })?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        webhook = %config.assessment.webhook_url,
        "fitscore assessment service ready"
    );

    axum::serve(listener, app).await.map_err(AppError::Serve)?;
    Ok(())
}
