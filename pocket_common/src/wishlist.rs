use crate::card::{Card, CardKey};
use serde::{Deserialize, Serialize};

/// A wishlist record: a snapshot of the card plus when it was added
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistEntry {
    pub card: Card,
    /// RFC 3339 timestamp
    pub date_added: String,
}

impl WishlistEntry {
    pub fn new(card: Card, date_added: impl Into<String>) -> Self {
        Self {
            card,
            date_added: date_added.into(),
        }
    }

    pub fn key(&self) -> CardKey {
        self.card.key()
    }
}
