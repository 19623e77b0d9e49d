use crate::cli::ServeArgs;
use crate::infra::AppState;
use crate::routes::app;
use agro_ai::config::AppConfig;
use agro_ai::error::AppError;
use agro_ai::model::ModelBundle;
use agro_ai::scoring::ReliabilityScorer;
use agro_ai::telemetry;
use axum_prometheus::PrometheusMetricLayer;
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
    if let Some(model_dir) = args.model_dir.take() {
        config.model.directory = model_dir;
    }

    telemetry::init(&config.telemetry)?;

    let bundle = ModelBundle::load_or_degrade(&config.model.artifact_paths());
    let scorer = Arc::new(ReliabilityScorer::new(bundle));
    let model_loaded = scorer.model_loaded();

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
        model_loaded,
    };

    let router = app(scorer, app_state, &config.server.cors_origins)?.layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        model_dir = %config.model.directory.display(),
        model_loaded,
        "agroconnect reliability service ready"
    );

    axum::serve(listener, router).await?;
    Ok(())
}
