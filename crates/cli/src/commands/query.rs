use catalog_core::config::{AppConfig, LoadOptions};
use catalog_core::{ApplicationError, CatalogError, CatalogLoader, CatalogQueries, Product};
use serde::Serialize;
use std::sync::Arc;

use super::CommandResult;

pub const EXIT_CONFIG: u8 = 2;
pub const EXIT_CATALOG_LOAD: u8 = 3;
pub const EXIT_NOT_FOUND: u8 = 4;

#[derive(Debug, Serialize)]
struct ProductView<'a> {
    #[serde(flatten)]
    product: &'a Product,
    discounted_price: String,
}

impl<'a> From<&'a Product> for ProductView<'a> {
    fn from(product: &'a Product) -> Self {
        Self { product, discounted_price: product.discounted_price().to_string() }
    }
}

pub fn list() -> CommandResult {
    let queries = match load_queries() {
        Ok(queries) => queries,
        Err(error) => return failure("list", error),
    };

    let products: Vec<ProductView<'_>> =
        queries.list_products().iter().map(ProductView::from).collect();
    CommandResult::success("list", format!("{} products", products.len()), &products)
}

pub fn get(id: &str) -> CommandResult {
    let queries = match load_queries() {
        Ok(queries) => queries,
        Err(error) => return failure("get", error),
    };

    match queries.get_product(id) {
        Ok(product) => CommandResult::success(
            "get",
            format!("found product `{}`", product.id),
            &ProductView::from(product),
        ),
        Err(error) => failure("get", ApplicationError::from(error)),
    }
}

pub fn search(query: &str) -> CommandResult {
    let queries = match load_queries() {
        Ok(queries) => queries,
        Err(error) => return failure("search", error),
    };

    let results: Vec<ProductView<'_>> =
        queries.search_products(query).into_iter().map(ProductView::from).collect();
    CommandResult::success(
        "search",
        format!("{} products match `{query}`", results.len()),
        &results,
    )
}

fn load_queries() -> Result<CatalogQueries, ApplicationError> {
    let config = AppConfig::load(LoadOptions::default())
        .map_err(|error| ApplicationError::Configuration(error.to_string()))?;
    let store = CatalogLoader::new(&config.catalog.path).load().map_err(CatalogError::Load)?;

    Ok(CatalogQueries::new(Arc::new(store)))
}

fn failure(command: &str, error: ApplicationError) -> CommandResult {
    let (error_class, exit_code) = match &error {
        ApplicationError::Configuration(_) => ("config_validation", EXIT_CONFIG),
        ApplicationError::Catalog(CatalogError::Load(_)) => ("catalog_load", EXIT_CATALOG_LOAD),
        ApplicationError::Catalog(CatalogError::NotFound { .. }) => ("not_found", EXIT_NOT_FOUND),
        ApplicationError::InvalidArgument(_) => ("invalid_argument", 1),
    };
    CommandResult::failure(command, error_class, error.to_string(), exit_code)
}
