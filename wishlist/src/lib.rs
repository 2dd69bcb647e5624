//! Pocket Wishlist - Pokemon TCG Pocket catalog browser and wishlist manager
//!
//! Browses the public card database, filters it by set, rarity, pack and
//! name, and keeps a wishlist in a local key-value store that recovers from
//! corrupted data on its own.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod formatters;
pub mod spreadsheet;
pub mod storage;
pub mod validation;
pub mod wishlist_store;

// Re-export commonly used items
pub use api::{Catalog, CatalogClient};
pub use cache::{load_catalog, CatalogCache};
pub use config::{Config, StorageBackend};
pub use error::{CatalogError, ExportError, ImportError, StorageError, WishlistError};
pub use filter::{
    all_packs, filter_cards, filter_wishlist, matching_entries, FilterCriteria, FilterOutcome,
};
pub use pocket_common::{Card, CardKey, CardSet, RarityMap, WishlistEntry};
pub use storage::{FileStorage, MemoryStorage, SqliteStorage, Storage};
pub use wishlist_store::{AddOutcome, LoadOutcome, LoadReport, WishlistStore, WISHLIST_KEY};
