use std::sync::Arc;

use tracing::debug;

use crate::catalog::CatalogStore;
use crate::domain::product::{Product, ProductId};
use crate::errors::CatalogError;

/// Read-only queries over a loaded catalog.
///
/// Cloning is cheap; every clone shares the same store.
#[derive(Clone, Debug)]
pub struct CatalogQueries {
    store: Arc<CatalogStore>,
}

impl CatalogQueries {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn list_products(&self) -> &[Product] {
        self.store.all()
    }

    /// Exact, case-sensitive id lookup.
    pub fn get_product(&self, id: &str) -> Result<&Product, CatalogError> {
        let id = ProductId(id.to_string());
        match self.store.by_id(&id) {
            Some(product) => Ok(product),
            None => {
                debug!(event_name = "catalog.query.not_found", product_id = %id, "product not found");
                Err(CatalogError::NotFound { id })
            }
        }
    }

    /// Products whose name or description contains `query`, ignoring case.
    ///
    /// Results keep catalog order. An empty query matches every product.
    pub fn search_products(&self, query: &str) -> Vec<&Product> {
        let needle = query.to_lowercase();
        let results: Vec<&Product> =
            self.store.all().iter().filter(|product| product.matches_text(&needle)).collect();

        debug!(
            event_name = "catalog.query.search",
            query,
            result_count = results.len(),
            "catalog search evaluated"
        );
        results
    }
}
