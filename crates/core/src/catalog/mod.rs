pub mod loader;
pub mod store;

pub use loader::{CatalogLoader, LoadError};
pub use store::CatalogStore;
