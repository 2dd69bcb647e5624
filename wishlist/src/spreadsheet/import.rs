//! Wishlist spreadsheet import.
//!
//! Every data row is checked; if any row fails, the whole batch is rejected
//! with one message per failing row and nothing is added to the wishlist.

use log::{debug, info, warn};
use pocket_common::{Card, CardLabel};
use std::io::Read;
use std::path::Path;

use super::split_packs;
use crate::error::{ImportError, ImportResult, WishlistError};
use crate::storage::Storage;
use crate::wishlist_store::WishlistStore;

/// Column indices for each recognised field; aliases are tried in order
#[derive(Debug, Default)]
struct Columns {
    set: Vec<usize>,
    number: Vec<usize>,
    name: Vec<usize>,
    rarity: Vec<usize>,
    rarity_code: Vec<usize>,
    image_name: Vec<usize>,
    image_url: Vec<usize>,
    packs: Vec<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Self {
        let find = |aliases: &[&str]| -> Vec<usize> {
            aliases
                .iter()
                .filter_map(|alias| headers.iter().position(|h| h.trim() == *alias))
                .collect()
        };
        Self {
            set: find(&["Set"]),
            number: find(&["Number"]),
            name: find(&["Pokemon", "Name"]),
            rarity: find(&["Rarity"]),
            rarity_code: find(&["Rarity Code", "RarityCode"]),
            image_name: find(&["Image Name", "ImageName"]),
            image_url: find(&["Image URL", "ImageURL"]),
            packs: find(&["Packs"]),
        }
    }
}

/// First non-empty value among the alias columns
fn field<'r>(record: &'r csv::StringRecord, columns: &[usize]) -> &'r str {
    columns
        .iter()
        .filter_map(|&i| record.get(i))
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or("")
}

/// Parse one data row; `row_num` is the spreadsheet row for messages
fn parse_row(record: &csv::StringRecord, columns: &Columns, row_num: usize) -> Result<Card, String> {
    let set = field(record, &columns.set);
    let number = field(record, &columns.number);
    if set.is_empty() || number.is_empty() {
        return Err(format!(
            "Row {row_num}: Missing required fields (Set and Number)"
        ));
    }

    let number = match number.parse::<u32>() {
        Ok(n) if n > 0 => n,
        _ => return Err(format!("Row {row_num}: Invalid card number")),
    };

    let name = field(record, &columns.name);
    let image_url = field(record, &columns.image_url);
    Ok(Card {
        set: set.to_string(),
        number,
        rarity: field(record, &columns.rarity).to_string(),
        rarity_code: field(record, &columns.rarity_code).to_string(),
        image_name: field(record, &columns.image_name).to_string(),
        image_url: (!image_url.is_empty()).then(|| image_url.to_string()),
        label: CardLabel {
            slug: name.to_string(),
            eng: name.to_string(),
        },
        packs: split_packs(field(record, &columns.packs)),
    })
}

/// Parse a wishlist sheet.
///
/// Returns every card if all rows are valid, otherwise
/// [`ImportError::InvalidRows`] with every row error.
pub fn parse_rows<R: Read>(reader: R) -> ImportResult<Vec<Card>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    debug!("Spreadsheet headers: {:?}", headers);
    let columns = Columns::from_headers(&headers);

    let mut cards = Vec::new();
    let mut errors = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let row_num = index + 2; // +2 because sheets are 1-indexed and have a header
        let parsed = match result {
            Ok(record) => parse_row(&record, &columns, row_num),
            Err(e) => {
                debug!("Row {row_num}: {e}");
                Err(format!("Row {row_num}: Failed to parse data"))
            }
        };
        match parsed {
            Ok(card) => cards.push(card),
            Err(msg) => {
                warn!("{msg}");
                errors.push(msg);
            }
        }
    }

    if !errors.is_empty() {
        warn!(
            "Import rejected: {} row errors, {} valid rows",
            errors.len(),
            cards.len()
        );
        return Err(ImportError::InvalidRows {
            details: errors,
            valid_items: cards.len(),
        });
    }

    info!("Parsed {} cards from spreadsheet", cards.len());
    Ok(cards)
}

/// Read a wishlist sheet from a `.csv` file
pub fn read_wishlist_file(path: &Path) -> ImportResult<Vec<Card>> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if !is_csv {
        return Err(ImportError::UnsupportedFile(path.display().to_string()));
    }

    info!("Importing wishlist from {}", path.display());
    let file = std::fs::File::open(path)?;
    parse_rows(file)
}

/// Add an imported batch to the wishlist; returns how many were new
pub fn import_into_store<S: Storage>(
    store: &WishlistStore<S>,
    cards: &[Card],
) -> Result<usize, WishlistError> {
    let added = store.add_all(cards)?;
    info!(
        "Imported {} cards ({} already on the wishlist)",
        added,
        cards.len() - added
    );
    Ok(added)
}
