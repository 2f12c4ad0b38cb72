use std::io;
use std::net::SocketAddr;

use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::assessment::NotifyError;

/// Failures that stop the assessment service from starting or keep it from serving.
///
/// Request-level failures never surface here; the router maps those to responses itself.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("telemetry error: {0}")]
    Telemetry(#[from] TelemetryError),
    #[error("webhook notifier could not be built: {0}")]
    Notifier(#[from] NotifyError),
    #[error("could not listen on {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("http server stopped: {0}")]
    Serve(#[source] io::Error),
}
