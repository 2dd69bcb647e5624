//! Caching layer for the fetched catalog

pub mod catalog_cache;

pub use catalog_cache::{load_catalog, CachedCatalog, CatalogCache};
