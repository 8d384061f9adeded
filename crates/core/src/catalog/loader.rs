use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::product::{Product, ProductId};

use super::CatalogStore;

const MAX_DISCOUNT_PCT: u32 = 100;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not read catalog file `{path}`: {source}")]
    Read { path: PathBuf, source: std::io::Error },
    #[error("could not parse catalog from `{origin}`: {source}")]
    Parse { origin: String, source: serde_json::Error },
    #[error("duplicate product id `{id}` in catalog")]
    DuplicateId { id: ProductId },
    #[error("invalid product `{id}`: {reason}")]
    Invalid { id: String, reason: String },
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    products: Vec<Product>,
}

/// Reads the catalog data source once and builds the [`CatalogStore`].
#[derive(Clone, Debug)]
pub struct CatalogLoader {
    path: PathBuf,
}

impl CatalogLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<CatalogStore, LoadError> {
        let raw = fs::read_to_string(&self.path)
            .map_err(|source| LoadError::Read { path: self.path.clone(), source })?;

        let store = parse_catalog(&self.path.display().to_string(), &raw)?;
        info!(
            event_name = "catalog.load.completed",
            path = %self.path.display(),
            product_count = store.len(),
            "product catalog loaded"
        );
        Ok(store)
    }
}

/// Parses a serialized catalog document. `origin` only labels errors.
pub fn parse_catalog(origin: &str, raw: &str) -> Result<CatalogStore, LoadError> {
    let document = serde_json::from_str::<CatalogDocument>(raw)
        .map_err(|source| LoadError::Parse { origin: origin.to_string(), source })?;

    for product in &document.products {
        validate_product(product)?;
    }
    debug!(
        event_name = "catalog.load.validated",
        origin,
        product_count = document.products.len(),
        "catalog records validated"
    );

    CatalogStore::new(document.products)
}

fn validate_product(product: &Product) -> Result<(), LoadError> {
    let invalid = |reason: String| LoadError::Invalid { id: product.id.0.clone(), reason };

    if product.id.0.trim().is_empty() {
        return Err(invalid("product id must not be empty".to_string()));
    }
    if !product.price.is_valid() {
        return Err(invalid(format!(
            "price units ({}) and nanos ({}) are inconsistent",
            product.price.units, product.price.nanos
        )));
    }
    if product.price.is_negative() {
        return Err(invalid(format!("price must not be negative, got {}", product.price)));
    }
    if product.discount > MAX_DISCOUNT_PCT {
        return Err(invalid(format!(
            "discount must be in range 0..={MAX_DISCOUNT_PCT}, got {}",
            product.discount
        )));
    }

    Ok(())
}
