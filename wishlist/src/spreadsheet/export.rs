use log::info;
use pocket_common::{Card, WishlistEntry};
use std::io::Write;
use std::path::Path;

use super::join_packs;
use crate::error::{ExportError, ExportResult};

pub const CARD_HEADERS: [&str; 7] = ["Set", "Number", "Name", "Rarity", "Rarity Code", "Packs", "Image"];
pub const WISHLIST_HEADERS: [&str; 7] = [
    "Set",
    "Number",
    "Name",
    "Rarity",
    "Rarity Code",
    "Packs",
    "Date Added",
];

type Row = [String; 7];

/// Columns shared by both sheets; the last column is filled by the caller
fn card_columns(card: &Card, name: &str, last: String) -> Row {
    [
        card.set.clone(),
        card.number.to_string(),
        name.to_string(),
        card.rarity.clone(),
        card.rarity_code.clone(),
        join_packs(&card.packs),
        last,
    ]
}

/// `YYYY-MM-DD` of an RFC 3339 timestamp, or the raw string if it does not parse
fn format_date_added(date_added: &str) -> String {
    chrono::DateTime::parse_from_rfc3339(date_added)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|_| date_added.to_string())
}

fn card_rows(cards: &[Card]) -> ExportResult<Vec<Row>> {
    if cards.is_empty() {
        return Err(ExportError::Empty("No cards to export!"));
    }
    let rows: Vec<Row> = cards
        .iter()
        .filter_map(|card| {
            let name = card.display_name()?;
            Some(card_columns(card, name, card.image_name.clone()))
        })
        .collect();
    if rows.is_empty() {
        return Err(ExportError::Empty("No valid card data found to export!"));
    }
    Ok(rows)
}

fn wishlist_rows(entries: &[WishlistEntry]) -> ExportResult<Vec<Row>> {
    if entries.is_empty() {
        return Err(ExportError::Empty("Your wishlist is empty!"));
    }
    let rows: Vec<Row> = entries
        .iter()
        .filter_map(|entry| {
            let name = entry.card.display_name()?;
            Some(card_columns(
                &entry.card,
                name,
                format_date_added(&entry.date_added),
            ))
        })
        .collect();
    if rows.is_empty() {
        return Err(ExportError::Empty("No valid wishlist items found to export!"));
    }
    Ok(rows)
}

fn write_rows<W: Write>(headers: &[&str], rows: &[Row], writer: W) -> ExportResult<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a cards sheet; returns the number of rows written
pub fn write_cards<W: Write>(cards: &[Card], writer: W) -> ExportResult<usize> {
    let rows = card_rows(cards)?;
    write_rows(&CARD_HEADERS, &rows, writer)?;
    Ok(rows.len())
}

/// Write a wishlist sheet; returns the number of rows written
pub fn write_wishlist<W: Write>(entries: &[WishlistEntry], writer: W) -> ExportResult<usize> {
    let rows = wishlist_rows(entries)?;
    write_rows(&WISHLIST_HEADERS, &rows, writer)?;
    Ok(rows.len())
}

/// Export cards to `path`. No file is created when there is nothing to export.
pub fn export_cards_to_file(cards: &[Card], path: &Path) -> ExportResult<usize> {
    let rows = card_rows(cards)?;
    let file = std::fs::File::create(path)?;
    write_rows(&CARD_HEADERS, &rows, file)?;
    info!("Successfully exported {} cards to {}", rows.len(), path.display());
    Ok(rows.len())
}

/// Export the wishlist to `path`. No file is created when it is empty.
pub fn export_wishlist_to_file(entries: &[WishlistEntry], path: &Path) -> ExportResult<usize> {
    let rows = wishlist_rows(entries)?;
    let file = std::fs::File::create(path)?;
    write_rows(&WISHLIST_HEADERS, &rows, file)?;
    info!(
        "Successfully exported {} wishlist items to {}",
        rows.len(),
        path.display()
    );
    Ok(rows.len())
}
