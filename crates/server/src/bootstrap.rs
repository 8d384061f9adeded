use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use catalog_core::config::{AppConfig, ConfigError};
use catalog_core::{CatalogLoader, CatalogQueries, LoadError};
use thiserror::Error;
use tracing::info;

use crate::{health, rpc};

pub struct Application {
    pub config: AppConfig,
    pub queries: CatalogQueries,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("catalog load failed: {0}")]
    CatalogLoad(#[source] LoadError),
}

/// Loads the catalog exactly once. Nothing is served if this fails.
pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        catalog_path = %config.catalog.path.display(),
        "starting application bootstrap"
    );

    let store =
        CatalogLoader::new(&config.catalog.path).load().map_err(BootstrapError::CatalogLoad)?;
    info!(
        event_name = "system.bootstrap.catalog_loaded",
        correlation_id = "bootstrap",
        product_count = store.len(),
        "product catalog ready"
    );

    Ok(Application { queries: CatalogQueries::new(Arc::new(store)), config })
}

impl Application {
    pub fn router(&self) -> Router {
        let extra_latency = Duration::from_millis(self.config.server.extra_latency_ms);
        rpc::router(rpc::RpcState::new(self.queries.clone(), extra_latency))
            .merge(health::router(self.queries.clone()))
    }
}
