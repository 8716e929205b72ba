//! Product catalog: typed records, file load/save, and structural validation.

pub mod error;
pub mod product;
pub mod store;
pub mod validate;

pub use error::{CatalogError, Result};
pub use product::{Product, ProductId};
pub use store::{load_catalog, save_catalog, DEFAULT_CATALOG_PATH};
