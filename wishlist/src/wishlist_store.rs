//! Persisted wishlist keyed by card identity.
//!
//! The whole wishlist is one JSON array under [`WISHLIST_KEY`]:
//! - A blob that does not parse as an array is deleted (full reset).
//! - Elements that fail validation are dropped and the rest written back.
//! - Writes are last-writer-wins; there is no concurrency token.

use crate::error::{StorageError, WishlistError};
use crate::storage::Storage;
use crate::validation::{parse_blob, validate_entries, RejectedEntry};
use chrono::{SecondsFormat, Utc};
use pocket_common::{Card, CardKey, WishlistEntry};

/// Storage key holding the serialized wishlist
pub const WISHLIST_KEY: &str = "pokemon-wishlist";

/// What `load` found in storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored yet
    Missing,
    /// Every stored element was valid
    Clean,
    /// Some elements were dropped and the rest written back
    Healed,
    /// The blob was unparseable and has been deleted
    Reset,
    /// The backend failed to read; nothing was changed
    Unreadable,
}

/// Entries read from storage plus what was dropped on the way
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub entries: Vec<WishlistEntry>,
    pub rejected: Vec<RejectedEntry>,
    pub outcome: LoadOutcome,
}

impl LoadReport {
    fn empty(outcome: LoadOutcome) -> Self {
        Self {
            entries: Vec::new(),
            rejected: Vec::new(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
}

/// Current time as an RFC 3339 timestamp with millisecond precision
fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub struct WishlistStore<S> {
    storage: S,
}

impl<S: Storage> WishlistStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Underlying storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Read, validate and (if needed) repair the stored wishlist.
    ///
    /// A backend read failure is logged and reported as
    /// [`LoadOutcome::Unreadable`]; nothing is changed in storage.
    pub fn load(&self) -> LoadReport {
        self.try_load().unwrap_or_else(|e| {
            log::error!("Error reading wishlist from storage: {}", e);
            LoadReport::empty(LoadOutcome::Unreadable)
        })
    }

    fn try_load(&self) -> Result<LoadReport, StorageError> {
        let raw = match self.storage.get(WISHLIST_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Ok(LoadReport::empty(LoadOutcome::Missing)),
            Err(e @ StorageError::InvalidEncoding { .. }) => return Ok(self.reset(e)),
            Err(e) => return Err(e),
        };

        let items = match parse_blob(&raw) {
            Ok(items) => items,
            Err(e) => return Ok(self.reset(e)),
        };

        let (entries, rejected) = validate_entries(items);
        if rejected.is_empty() {
            return Ok(LoadReport {
                entries,
                rejected,
                outcome: LoadOutcome::Clean,
            });
        }

        for r in &rejected {
            log::debug!("Dropped wishlist element {}: {}", r.index, r.reason);
        }
        log::warn!("Cleaned {} invalid wishlist items", rejected.len());
        if let Err(e) = self.persist(&entries) {
            log::warn!("Failed to save cleaned wishlist: {}", e);
        }

        Ok(LoadReport {
            entries,
            rejected,
            outcome: LoadOutcome::Healed,
        })
    }

    /// Delete a blob that cannot be read as a wishlist
    fn reset(&self, cause: impl std::fmt::Display) -> LoadReport {
        log::warn!("Invalid wishlist data format ({}), clearing stored wishlist", cause);
        if let Err(e) = self.storage.remove(WISHLIST_KEY) {
            log::error!("Failed to clear corrupted wishlist data: {}", e);
        }
        LoadReport::empty(LoadOutcome::Reset)
    }

    /// Current entries for a mutation; an unreadable store is an error so
    /// the write cannot replace data it never saw
    fn entries_for_update(&self) -> Result<Vec<WishlistEntry>, WishlistError> {
        self.try_load().map(|report| report.entries).map_err(|e| {
            let err = WishlistError::from(e);
            log::error!("Wishlist not modified, stored data is unreadable: {}", err);
            err
        })
    }

    /// All valid entries in insertion order
    pub fn list(&self) -> Vec<WishlistEntry> {
        self.load().entries
    }

    pub fn len(&self) -> usize {
        self.list().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, key: &CardKey) -> bool {
        self.list().iter().any(|entry| entry.card.has_key(key))
    }

    /// Add a card unless it is already on the wishlist
    pub fn add(&self, card: &Card) -> Result<AddOutcome, WishlistError> {
        let mut entries = self.entries_for_update()?;
        if entries.iter().any(|entry| entry.card.has_key(&card.key())) {
            log::debug!("{} is already on the wishlist", card.key());
            return Ok(AddOutcome::AlreadyPresent);
        }

        entries.push(WishlistEntry::new(card.clone(), now_timestamp()));
        self.persist(&entries).map_err(|e| {
            let err = WishlistError::from(e);
            log::error!("Error adding to wishlist: {}", err);
            err
        })?;
        log::info!("Added {} to wishlist", card.key());
        Ok(AddOutcome::Added)
    }

    /// Add every card not yet on the wishlist in a single write.
    ///
    /// Returns how many cards were newly added.
    pub fn add_all(&self, cards: &[Card]) -> Result<usize, WishlistError> {
        let mut entries = self.entries_for_update()?;
        let timestamp = now_timestamp();
        let before = entries.len();

        for card in cards {
            if !entries.iter().any(|entry| entry.card.has_key(&card.key())) {
                entries.push(WishlistEntry::new(card.clone(), timestamp.clone()));
            }
        }

        let added = entries.len() - before;
        if added == 0 {
            return Ok(0);
        }
        self.persist(&entries).map_err(|e| {
            let err = WishlistError::from(e);
            log::error!("Error adding {} cards to wishlist: {}", added, err);
            err
        })?;
        log::info!("Added {} cards to wishlist", added);
        Ok(added)
    }

    /// Remove every entry for `key`; returns how many were removed
    pub fn remove(&self, key: &CardKey) -> Result<usize, WishlistError> {
        let mut entries = self.entries_for_update()?;
        let before = entries.len();
        entries.retain(|entry| !entry.card.has_key(key));

        let removed = before - entries.len();
        if removed == 0 {
            return Ok(0);
        }
        self.persist(&entries).map_err(|e| {
            let err = WishlistError::from(e);
            log::error!("Error removing from wishlist: {}", err);
            err
        })?;
        log::info!("Removed {} from wishlist", key);
        Ok(removed)
    }

    /// Delete the stored wishlist
    pub fn clear(&self) -> Result<(), WishlistError> {
        self.storage.remove(WISHLIST_KEY).map_err(|e| {
            let err = WishlistError::from(e);
            log::error!("Error clearing wishlist: {}", err);
            err
        })?;
        log::info!("Wishlist cleared");
        Ok(())
    }

    fn persist(&self, entries: &[WishlistEntry]) -> Result<(), StorageError> {
        let blob = serde_json::to_string(entries)?;
        self.storage.set(WISHLIST_KEY, &blob)
    }
}

#[cfg(test)]
#[path = "wishlist_store_tests.rs"]
mod tests;
