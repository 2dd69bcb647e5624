//! Schema checks for persisted wishlist data.
//!
//! A blob that is not a JSON array is corrupt as a whole. Inside an array,
//! every element is checked on its own and either accepted as a
//! [`WishlistEntry`] or rejected with a reason.

use pocket_common::{CardKey, WishlistEntry};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Why a persisted blob could not be read at all
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlobError {
    /// Not valid JSON
    Syntax(String),
    /// Valid JSON, but not an array; carries the JSON type found
    NotArray(&'static str),
}

impl fmt::Display for BlobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlobError::Syntax(msg) => write!(f, "malformed JSON: {}", msg),
            BlobError::NotArray(kind) => write!(f, "expected an array, found {}", kind),
        }
    }
}

/// Why a single wishlist element was dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    NotAnObject,
    MissingCard,
    InvalidSetCode,
    InvalidNumber,
    InvalidDateAdded,
    /// Identity fields were fine but another field had the wrong type
    Malformed(String),
    /// An earlier element already holds this card
    Duplicate(CardKey),
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::NotAnObject => write!(f, "entry is not an object"),
            RejectReason::MissingCard => write!(f, "entry has no card object"),
            RejectReason::InvalidSetCode => write!(f, "card set code is not a string"),
            RejectReason::InvalidNumber => write!(f, "card number is not a valid integer"),
            RejectReason::InvalidDateAdded => write!(f, "dateAdded is not a string"),
            RejectReason::Malformed(msg) => write!(f, "entry does not decode: {}", msg),
            RejectReason::Duplicate(key) => write!(f, "duplicate entry for {}", key),
        }
    }
}

/// A dropped element and its position in the stored array
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    pub index: usize,
    pub reason: RejectReason,
}

/// Result of checking one stored element
#[derive(Debug, Clone, PartialEq)]
pub enum EntryCheck {
    Valid(WishlistEntry),
    Rejected(RejectedEntry),
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a stored blob into its raw elements
pub fn parse_blob(raw: &str) -> Result<Vec<Value>, BlobError> {
    let value: Value = serde_json::from_str(raw).map_err(|e| BlobError::Syntax(e.to_string()))?;
    match value {
        Value::Array(items) => Ok(items),
        other => Err(BlobError::NotArray(json_kind(&other))),
    }
}

/// Check the identity and timestamp fields of one element, then decode it
pub fn validate_entry(index: usize, value: Value) -> EntryCheck {
    let reject = |reason| EntryCheck::Rejected(RejectedEntry { index, reason });

    let Some(object) = value.as_object() else {
        return reject(RejectReason::NotAnObject);
    };
    let Some(card) = object.get("card").and_then(Value::as_object) else {
        return reject(RejectReason::MissingCard);
    };
    if !card.get("set").is_some_and(Value::is_string) {
        return reject(RejectReason::InvalidSetCode);
    }
    let number_ok = card
        .get("number")
        .and_then(Value::as_u64)
        .is_some_and(|n| u32::try_from(n).is_ok());
    if !number_ok {
        return reject(RejectReason::InvalidNumber);
    }
    if !object.get("dateAdded").is_some_and(Value::is_string) {
        return reject(RejectReason::InvalidDateAdded);
    }

    match serde_json::from_value::<WishlistEntry>(value) {
        Ok(entry) => EntryCheck::Valid(entry),
        Err(e) => reject(RejectReason::Malformed(e.to_string())),
    }
}

/// Validate every element, keeping the first entry for each card.
///
/// Returns the accepted entries in stored order and the rejected ones.
pub fn validate_entries(items: Vec<Value>) -> (Vec<WishlistEntry>, Vec<RejectedEntry>) {
    let mut seen: HashSet<CardKey> = HashSet::new();
    let mut entries = Vec::with_capacity(items.len());
    let mut rejected = Vec::new();

    for (index, item) in items.into_iter().enumerate() {
        match validate_entry(index, item) {
            EntryCheck::Valid(entry) => {
                let key = entry.key();
                if seen.contains(&key) {
                    rejected.push(RejectedEntry {
                        index,
                        reason: RejectReason::Duplicate(key),
                    });
                } else {
                    seen.insert(key);
                    entries.push(entry);
                }
            }
            EntryCheck::Rejected(r) => rejected.push(r),
        }
    }

    (entries, rejected)
}
