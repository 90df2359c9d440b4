//! HTTP handler for the metrics endpoint, served in-process.

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tower::ServiceExt;
use tracing::{debug, info};

use crate::collector::{MetricCollector, SharedCollector};
use crate::collectors::register_collectors;
use crate::config::ExpositionConfig;
use crate::error::ExpositionError;

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    collector: SharedCollector,
}

/// Create the HTTP router.
fn create_router(collector: SharedCollector, metrics_path: &str) -> Router {
    let state = AppState { collector };

    Router::new()
        .route(metrics_path, get(metrics_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for the metrics endpoint.
async fn metrics_handler(State(state): State<AppState>) -> Response {
    let body = state.collector.render();

    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
        .into_response()
}

/// Handler for the /health endpoint.
async fn health_handler() -> Response {
    (StatusCode::OK, "healthy\n").into_response()
}

/// Status and body of one in-process request.
#[derive(Debug, Clone)]
pub struct ScrapeResponse {
    pub status: StatusCode,
    pub body: String,
}

/// The metrics endpoint, wired to an explicit set of collectors.
pub struct ExpositionHandler {
    collector: SharedCollector,
    router: Router,
    metrics_path: String,
}

impl ExpositionHandler {
    /// Build the handler and register the collectors selected in `config`.
    pub fn new(config: &ExpositionConfig) -> Result<Self, ExpositionError> {
        config.validate()?;

        let collector = SharedCollector::new(MetricCollector::new());
        register_collectors(&collector, &config.collectors)?;
        let stats = collector.stats();
        info!(
            path = %config.path,
            families = collector.family_count(),
            registered = stats.families_registered,
            rejected = stats.families_rejected,
            "Exposition handler ready"
        );

        Ok(Self::with_collector(collector, &config.path))
    }

    /// Build the handler around an already populated collector.
    pub fn with_collector(collector: SharedCollector, metrics_path: &str) -> Self {
        Self {
            router: create_router(collector.clone(), metrics_path),
            collector,
            metrics_path: metrics_path.to_string(),
        }
    }

    /// The collector backing this handler.
    pub fn collector(&self) -> &SharedCollector {
        &self.collector
    }

    /// The configured metrics path.
    pub fn metrics_path(&self) -> &str {
        &self.metrics_path
    }

    /// Issue a GET for `path` against the router without opening a socket.
    pub async fn get(&self, path: &str) -> Result<ScrapeResponse, ExpositionError> {
        let request = Request::get(path)
            .body(Body::empty())
            .map_err(|e| ExpositionError::Request {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .map_err(|e| ExpositionError::Request {
                path: path.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| ExpositionError::Body {
                path: path.to_string(),
                message: e.to_string(),
            })?;
        let body = String::from_utf8(bytes.to_vec()).map_err(|e| ExpositionError::Body {
            path: path.to_string(),
            message: e.to_string(),
        })?;

        debug!(
            path,
            status = status.as_u16(),
            bytes = body.len(),
            renders = self.collector.stats().renders,
            "In-process request served"
        );
        Ok(ScrapeResponse { status, body })
    }

    /// Scrape the metrics path.
    pub async fn scrape(&self) -> Result<ScrapeResponse, ExpositionError> {
        self.get(&self.metrics_path).await
    }
}
