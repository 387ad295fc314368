use district_atlas::catalog::Catalog;
use district_atlas::config::DataConfig;
use district_atlas::error::AppError;
use district_atlas::newsletter::NewsletterStore;
use district_atlas::router::AtlasState;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::info;

/// Process-level handles shared with the operational endpoints.
#[derive(Clone, Default)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Option<Arc<PrometheusHandle>>,
}

/// Load the dataset and open the newsletter store named by `config`.
pub(crate) fn open_atlas(config: &DataConfig) -> Result<AtlasState, AppError> {
    let catalog = Catalog::load(&config.dataset_path)?;
    let newsletter = NewsletterStore::open(config.newsletter_path.clone())?;

    info!(
        districts = catalog.len(),
        subscribers = newsletter.len(),
        "district atlas state initialised"
    );
    Ok(AtlasState::new(catalog, newsletter))
}
