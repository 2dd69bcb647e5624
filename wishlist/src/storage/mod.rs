//! Key-value storage backends for persisted client state
//!
//! The wishlist lives in one serialized blob under a well-known key, so a
//! backend only needs string get / set / remove.

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

use crate::error::{StorageError, StorageResult};

/// Synchronous string key-value store
pub trait Storage {
    /// Returns `None` if nothing is stored under `key`
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Removes `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<S: Storage + ?Sized> Storage for &S {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

impl<S: Storage + ?Sized> Storage for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// Fails with `QuotaExceeded` if `others + key + value` bytes exceed `quota`.
///
/// `others` is the size of everything else already stored.
pub(crate) fn check_quota(
    quota: Option<usize>,
    others: usize,
    key: &str,
    value: &str,
) -> StorageResult<()> {
    let Some(limit) = quota else {
        return Ok(());
    };
    let needed = others + key.len() + value.len();
    if needed > limit {
        log::warn!(
            "Write of {} bytes under '{}' exceeds storage quota ({} of {} bytes)",
            value.len(),
            key,
            needed,
            limit
        );
        return Err(StorageError::QuotaExceeded { needed, limit });
    }
    Ok(())
}
