use crate::cli::ServeArgs;
use crate::infra::{open_atlas, AppState};
use crate::routes::build_app;
use axum_prometheus::PrometheusMetricLayer;
use district_atlas::config::AppConfig;
use district_atlas::error::AppError;
use district_atlas::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
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
    if let Some(data) = args.data.take() {
        config.data.dataset_path = data;
    }
    if let Some(newsletter) = args.newsletter.take() {
        config.data.newsletter_path = newsletter;
    }

    telemetry::init(&config.telemetry)?;

    let atlas = open_atlas(&config.data)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Some(Arc::new(prometheus_handle)),
    };

    let app = build_app(atlas, app_state).layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "district atlas api ready");

    axum::serve(listener, app).await?;
    Ok(())
}
