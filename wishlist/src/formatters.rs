use crate::filter::FilterOutcome;
use pocket_common::{Card, CardKey, CardSet, RarityMap, WishlistEntry};
use std::collections::HashSet;

/// One line per card: key, name, rarity, packs, and a marker for wishlisted cards
pub fn format_card_line(card: &Card, wishlisted: bool) -> String {
    let marker = if wishlisted { "*" } else { " " };
    let name = card.display_name().unwrap_or("(unnamed)");
    let rarity = if card.rarity.is_empty() {
        String::new()
    } else {
        format!(" [{}]", card.rarity)
    };
    let packs = if card.packs.is_empty() {
        String::new()
    } else {
        format!(" - packs: {}", card.packs.join(", "))
    };
    format!("{marker} {:<8} {name}{rarity}{packs}", card.key().to_string())
}

/// Filtered card list with a trailing count line.
///
/// `wishlist` holds the keys to mark; `wishlist_view` changes the count wording.
pub fn format_card_list(
    outcome: &FilterOutcome,
    wishlist: &HashSet<CardKey>,
    wishlist_view: bool,
) -> String {
    let mut output = String::new();
    for card in &outcome.cards {
        output.push_str(&format_card_line(card, wishlist.contains(&card.key())));
        output.push('\n');
    }

    if outcome.cards.is_empty() {
        output.push_str("No cards found. Try adjusting your filters.\n");
    }
    let kind = if wishlist_view { "wishlist cards" } else { "cards" };
    output.push_str(&format!("Showing {} {kind}\n", outcome.cards.len()));
    if !outcome.skipped.is_empty() {
        output.push_str(&format!(
            "({} malformed records skipped)\n",
            outcome.skipped.len()
        ));
    }
    output
}

/// Wishlist entries with the date each was added
pub fn format_wishlist(entries: &[WishlistEntry]) -> String {
    if entries.is_empty() {
        return "Your wishlist is empty.\n".to_string();
    }
    let mut output = String::new();
    for entry in entries {
        let date = entry.date_added.get(..10).unwrap_or(&entry.date_added);
        output.push_str(&format!(
            "{}  (added {date})\n",
            format_card_line(&entry.card, true)
        ));
    }
    output.push_str(&format!("{} cards on wishlist\n", entries.len()));
    output
}

pub fn format_sets(sets: &[CardSet]) -> String {
    let mut output = String::new();
    for set in sets {
        let count = set
            .count
            .map(|c| format!(", {c} cards"))
            .unwrap_or_default();
        output.push_str(&format!(
            "{:<6} {} (released {}{count})\n",
            set.code, set.label.en, set.release_date
        ));
    }
    output
}

pub fn format_rarities(rarities: &RarityMap) -> String {
    rarities
        .iter()
        .map(|(code, name)| format!("{code:<4} {name}\n"))
        .collect()
}

pub fn format_packs(packs: &[String]) -> String {
    packs.iter().map(|p| format!("{p}\n")).collect()
}
