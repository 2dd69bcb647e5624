use crate::api::{Catalog, CatalogClient};
use crate::error::{CacheResult, CatalogResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Catalog snapshot as stored on disk
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CachedCatalog {
    pub fetched_at: DateTime<Utc>,
    pub catalog: Catalog,
}

impl CachedCatalog {
    pub fn is_fresh(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.fetched_at) < max_age
    }
}

/// Keeps the last fetched catalog in a JSON file so repeated runs skip the network
#[derive(Debug, Clone)]
pub struct CatalogCache {
    path: PathBuf,
    max_age: Duration,
}

impl CatalogCache {
    pub fn new(path: impl Into<PathBuf>, max_age: Duration) -> Self {
        Self {
            path: path.into(),
            max_age,
        }
    }

    /// Get the default cache file path
    pub fn default_path() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pocket_wishlist")
            .join("catalog.json")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Load the cached snapshot, or `None` if missing or unreadable
    pub fn load(&self) -> Option<CachedCatalog> {
        if !self.path.exists() {
            return None;
        }
        match std::fs::read_to_string(&self.path) {
            Ok(content) => match serde_json::from_str::<CachedCatalog>(&content) {
                Ok(cached) => {
                    log::debug!(
                        "Loaded catalog cache with {} cards from {}",
                        cached.catalog.cards.len(),
                        cached.fetched_at
                    );
                    Some(cached)
                }
                Err(e) => {
                    log::warn!("Failed to parse catalog cache, ignoring it: {}", e);
                    None
                }
            },
            Err(e) => {
                log::warn!("Failed to read catalog cache, ignoring it: {}", e);
                None
            }
        }
    }

    /// Save a freshly fetched catalog
    pub fn save(&self, catalog: &Catalog) -> CacheResult<()> {
        self.save_at(catalog, Utc::now())
    }

    fn save_at(&self, catalog: &Catalog, fetched_at: DateTime<Utc>) -> CacheResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let snapshot = CachedCatalogRef {
            fetched_at,
            catalog,
        };
        let content = serde_json::to_string(&snapshot)?;
        std::fs::write(&self.path, content)?;

        log::debug!("Saved catalog cache with {} cards", catalog.cards.len());
        Ok(())
    }
}

/// Borrowing twin of [`CachedCatalog`] for writing without a clone
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CachedCatalogRef<'a> {
    fetched_at: DateTime<Utc>,
    catalog: &'a Catalog,
}

/// Load the catalog, using the cache when it is fresh.
///
/// With `refresh` set the cache is bypassed. If fetching fails and a stale
/// snapshot exists, the stale snapshot is returned.
pub async fn load_catalog(
    client: &CatalogClient,
    cache: &CatalogCache,
    refresh: bool,
) -> CatalogResult<Catalog> {
    let cached = match cache.load() {
        Some(snapshot) if !refresh && snapshot.is_fresh(cache.max_age(), Utc::now()) => {
            log::info!("Catalog cache hit ({} cards)", snapshot.catalog.cards.len());
            return Ok(snapshot.catalog);
        }
        other => other,
    };

    log::info!("Catalog cache miss, fetching from {}", client.base_url());
    match client.fetch_all().await {
        Ok(catalog) => {
            if let Err(e) = cache.save(&catalog) {
                log::warn!("Failed to save catalog cache: {}", e);
            }
            Ok(catalog)
        }
        Err(e) => match cached {
            Some(stale) => {
                log::warn!(
                    "Failed to refresh catalog ({}), using cached copy from {}",
                    e,
                    stale.fetched_at
                );
                Ok(stale.catalog)
            }
            None => Err(e),
        },
    }
}
