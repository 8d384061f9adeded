pub mod catalog;
pub mod config;
pub mod convert;
pub mod domain;
pub mod errors;
pub mod query;

pub use catalog::{CatalogLoader, CatalogStore, LoadError};
pub use convert::{merge_discounts, to_discount_product, to_product};
pub use domain::discount::{DiscountMoney, DiscountProduct};
pub use domain::product::{Money, Product, ProductId};
pub use errors::{ApplicationError, CatalogError, InterfaceError};
pub use query::CatalogQueries;
