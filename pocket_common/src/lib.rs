//! Shared types for Pokemon TCG Pocket tooling.
//!
//! The JSON shapes mirror the public card database the catalog is fetched
//! from, so the same types decode remote documents and persisted wishlist
//! blobs.

pub mod card;
pub mod set;
pub mod wishlist;

pub use card::{Card, CardKey, CardLabel};
pub use set::{CardSet, RarityMap, SetLabel};
pub use wishlist::WishlistEntry;
