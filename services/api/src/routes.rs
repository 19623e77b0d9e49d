use crate::infra::{cors_layer, AppState};
use agro_ai::config::ConfigError;
use agro_ai::scoring::ReliabilityScorer;
use agro_ai::workflows::scoring_router;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use serde::Serialize;
use serde_json::json;
use std::sync::atomic::Ordering;
use std::sync::Arc;

pub(crate) const SERVICE_NAME: &str = "AgroConnect AI";
pub(crate) const API_VERSION: &str = "2.0";

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) status: &'static str,
    pub(crate) service: &'static str,
    pub(crate) version: &'static str,
    pub(crate) model_loaded: bool,
}

pub(crate) fn with_scoring_routes(scorer: Arc<ReliabilityScorer>) -> Router {
    scoring_router(scorer)
        .route("/", get(healthcheck))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

/// Full application router minus the metrics recorder layer.
pub(crate) fn app(
    scorer: Arc<ReliabilityScorer>,
    state: AppState,
    cors_origins: &[String],
) -> Result<Router, ConfigError> {
    let cors = cors_layer(cors_origins)?;
    Ok(with_scoring_routes(scorer)
        .layer(Extension(state))
        .layer(cors))
}

pub(crate) async fn healthcheck(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running",
        service: SERVICE_NAME,
        version: API_VERSION,
        model_loaded: state.model_loaded,
    })
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
