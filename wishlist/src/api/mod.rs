//! Client for the public Pokemon TCG Pocket card database

pub mod catalog;

pub use catalog::{validate_cards, Catalog, CatalogClient, DEFAULT_BASE_URL};
