//! Card filtering over the catalog or the wishlist.
//!
//! Filtering is a stable, pure pass over the input. Cards without a usable
//! identity are left out and reported in [`FilterOutcome::skipped`] instead
//! of failing the whole view.

use pocket_common::{Card, CardKey, WishlistEntry};
use std::collections::{BTreeSet, HashSet};
use std::fmt;

/// Active filter constraints; an empty field means "no constraint"
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring of the display name
    pub search: String,
    /// Exact set code
    pub set: String,
    /// Exact rarity label
    pub rarity: String,
    /// Pack the card must belong to
    pub pack: String,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.set.is_empty() && self.rarity.is_empty() && self.pack.is_empty()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingSetCode,
    InvalidNumber,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSetCode => write!(f, "card has no set code"),
            SkipReason::InvalidNumber => write!(f, "card number must be positive"),
        }
    }
}

/// A card left out of the view because it could not be evaluated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position in the input sequence
    pub index: usize,
    pub key: CardKey,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOutcome<'a> {
    pub cards: Vec<&'a Card>,
    pub skipped: Vec<SkippedRecord>,
}

impl FilterOutcome<'_> {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

fn check_identity(card: &Card) -> Result<(), SkipReason> {
    if card.set.trim().is_empty() {
        return Err(SkipReason::MissingSetCode);
    }
    if card.number == 0 {
        return Err(SkipReason::InvalidNumber);
    }
    Ok(())
}

/// `search_lower` is the already-lowercased search text
fn matches(card: &Card, criteria: &FilterCriteria, search_lower: &str) -> bool {
    let matches_search = search_lower.is_empty()
        || card
            .display_name()
            .is_some_and(|name| name.to_lowercase().contains(search_lower));
    let matches_set = criteria.set.is_empty() || card.set == criteria.set;
    let matches_rarity = criteria.rarity.is_empty() || card.rarity == criteria.rarity;
    let matches_pack = criteria.pack.is_empty() || card.in_pack(&criteria.pack);

    matches_search && matches_set && matches_rarity && matches_pack
}

/// Returns true if `card` satisfies every active criterion
pub fn card_matches(card: &Card, criteria: &FilterCriteria) -> bool {
    matches(card, criteria, &criteria.search.to_lowercase())
}

/// Filter cards, preserving input order
pub fn filter_cards<'a, I>(cards: I, criteria: &FilterCriteria) -> FilterOutcome<'a>
where
    I: IntoIterator<Item = &'a Card>,
{
    let search_lower = criteria.search.to_lowercase();
    let mut outcome = FilterOutcome::default();

    for (index, card) in cards.into_iter().enumerate() {
        if let Err(reason) = check_identity(card) {
            log::warn!("Skipping card {} at position {}: {}", card.key(), index, reason);
            outcome.skipped.push(SkippedRecord {
                index,
                key: card.key(),
                reason,
            });
            continue;
        }
        if matches(card, criteria, &search_lower) {
            outcome.cards.push(card);
        }
    }

    log::debug!(
        "Filter {:?} kept {} cards, skipped {}",
        criteria,
        outcome.cards.len(),
        outcome.skipped.len()
    );
    outcome
}

/// Filter the cards embedded in wishlist entries
pub fn filter_wishlist<'a>(
    entries: &'a [WishlistEntry],
    criteria: &FilterCriteria,
) -> FilterOutcome<'a> {
    filter_cards(entries.iter().map(|entry| &entry.card), criteria)
}

/// Wishlist entries whose card passes `criteria`, in stored order
pub fn matching_entries(entries: &[WishlistEntry], criteria: &FilterCriteria) -> Vec<WishlistEntry> {
    if criteria.is_empty() {
        return entries.to_vec();
    }
    let keys: HashSet<CardKey> = filter_wishlist(entries, criteria)
        .cards
        .iter()
        .map(|card| card.key())
        .collect();
    entries
        .iter()
        .filter(|entry| keys.contains(&entry.key()))
        .cloned()
        .collect()
}

/// Every pack name across `cards`, deduplicated and sorted
pub fn all_packs(cards: &[Card]) -> Vec<String> {
    let packs: BTreeSet<&str> = cards
        .iter()
        .flat_map(|card| card.packs.iter().map(String::as_str))
        .collect();
    packs.into_iter().map(str::to_string).collect()
}
