//! Spreadsheet import / export of cards and wishlists.
//!
//! Sheets are CSV files with a header row. Import accepts the same columns
//! the export and the template write.
//!
//! - [`import`] - all-or-nothing wishlist import with per-row errors
//! - [`export`] - catalog and wishlist export
//! - [`template`] - sample sheet for users to fill in

pub mod export;
pub mod import;
pub mod template;

pub use export::{export_cards_to_file, export_wishlist_to_file, write_cards, write_wishlist};
pub use import::{import_into_store, parse_rows, read_wishlist_file};
pub use template::{write_template, write_template_file};

/// Joins pack names the way they are written to and read from a sheet
pub(crate) fn join_packs(packs: &[String]) -> String {
    packs.join(", ")
}

/// Split a comma-separated pack cell, trimming each name
pub(crate) fn split_packs(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}
