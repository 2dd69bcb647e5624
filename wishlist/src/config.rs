//! Runtime configuration assembled from command-line arguments and environment.

use crate::api::DEFAULT_BASE_URL;
use crate::cache::CatalogCache;
use crate::error::StorageResult;
use crate::storage::{FileStorage, SqliteStorage, Storage};
use std::path::PathBuf;

/// Default quota, matching the usual 5 MiB browser storage allowance
pub const DEFAULT_QUOTA_BYTES: usize = 5 * 1024 * 1024;

/// Default maximum age of the cached catalog
pub const DEFAULT_CACHE_MAX_AGE_HOURS: u64 = 24;

const MAX_CACHE_AGE_HOURS: u64 = 24 * 365 * 100;

/// Which backend persists the wishlist
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum StorageBackend {
    /// One JSON file per key in the data directory
    #[default]
    File,
    /// A SQLite database in the data directory
    Sqlite,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub backend: StorageBackend,
    /// `None` disables the quota check
    pub quota_bytes: Option<usize>,
    pub catalog_url: String,
    pub cache_path: PathBuf,
    pub cache_max_age_hours: u64,
    /// Bypass the catalog cache
    pub refresh: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: StorageBackend::default(),
            quota_bytes: Some(DEFAULT_QUOTA_BYTES),
            catalog_url: DEFAULT_BASE_URL.to_string(),
            cache_path: CatalogCache::default_path(),
            cache_max_age_hours: DEFAULT_CACHE_MAX_AGE_HOURS,
            refresh: false,
        }
    }
}

/// Returns the default data directory: ~/.local/share/pocket_wishlist
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pocket_wishlist")
}

/// A quota of 0 means "unlimited"
pub fn quota_from_bytes(bytes: usize) -> Option<usize> {
    (bytes > 0).then_some(bytes)
}

impl Config {
    /// Open the configured storage backend
    pub fn open_storage(&self) -> StorageResult<Box<dyn Storage>> {
        log::debug!(
            "Opening {:?} storage in {} (quota: {:?})",
            self.backend,
            self.data_dir.display(),
            self.quota_bytes
        );
        let storage: Box<dyn Storage> = match self.backend {
            StorageBackend::File => {
                Box::new(FileStorage::open(self.data_dir.join("storage"), self.quota_bytes)?)
            }
            StorageBackend::Sqlite => Box::new(SqliteStorage::open(
                &self.data_dir.join("wishlist.db"),
                self.quota_bytes,
            )?),
        };
        Ok(storage)
    }

    pub fn catalog_cache(&self) -> CatalogCache {
        // Capped so the conversion to a duration cannot overflow
        let hours = self.cache_max_age_hours.min(MAX_CACHE_AGE_HOURS) as i64;
        CatalogCache::new(self.cache_path.clone(), chrono::Duration::hours(hours))
    }
}
