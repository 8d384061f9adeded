use std::collections::HashMap;

use crate::domain::product::{Product, ProductId};

use super::LoadError;

/// Immutable, ordered product catalog with an id index.
///
/// Built once and shared by reference; there are no mutating methods.
#[derive(Debug, Default)]
pub struct CatalogStore {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl CatalogStore {
    pub fn new(products: Vec<Product>) -> Result<Self, LoadError> {
        let mut index = HashMap::with_capacity(products.len());
        for (position, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), position).is_some() {
                return Err(LoadError::DuplicateId { id: product.id.clone() });
            }
        }

        Ok(Self { products, index })
    }

    pub fn all(&self) -> &[Product] {
        &self.products
    }

    pub fn by_id(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|position| &self.products[*position])
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
