use agro_ai::config::ConfigError;
use axum::http::HeaderValue;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) model_loaded: bool,
}

/// CORS policy for the frontend/backend origins. Credentials are allowed, so
/// methods and headers mirror the request instead of using wildcards.
pub(crate) fn cors_layer(origins: &[String]) -> Result<CorsLayer, ConfigError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).map_err(|_| ConfigError::InvalidOrigin(origin.clone()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_origins_that_are_not_header_values() {
        let err = cors_layer(&["http://bad\norigin".to_string()]).expect_err("newline");
        assert!(matches!(err, ConfigError::InvalidOrigin(_)));
    }

    #[test]
    fn builds_layer_for_default_origins() {
        let origins: Vec<String> = agro_ai::config::DEFAULT_CORS_ORIGINS
            .iter()
            .map(|origin| origin.to_string())
            .collect();
        assert!(cors_layer(&origins).is_ok());
    }
}
