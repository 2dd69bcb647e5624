//! Error types for pocket_wishlist

use thiserror::Error;

/// Message shown when a write does not fit in the storage quota
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "Storage quota exceeded. Please clear some data or use a different data directory.";

/// Failures of a key-value storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    /// The write would grow the store past its configured quota
    #[error("Storage quota exceeded: {needed} bytes needed, {limit} bytes allowed")]
    QuotaExceeded { needed: usize, limit: usize },
    /// The stored bytes under `key` are not text; the value is corrupt
    #[error("Stored value under '{key}' is not valid UTF-8")]
    InvalidEncoding { key: String },
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Database operation failed
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Failed to serialize a value before writing it
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failures surfaced by wishlist mutations
#[derive(Debug, Error)]
pub enum WishlistError {
    /// Kept apart from other storage failures so the user can be told how to fix it
    #[error("{}", QUOTA_EXCEEDED_MESSAGE)]
    QuotaExceeded(#[source] StorageError),
    #[error("Failed to update wishlist: {0}")]
    Storage(#[source] StorageError),
}

impl From<StorageError> for WishlistError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::QuotaExceeded { .. } => WishlistError::QuotaExceeded(err),
            other => WishlistError::Storage(other),
        }
    }
}

/// Failures while fetching the remote card database
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Server answered with a non-success status
    #[error("Failed to fetch {resource}: {status}")]
    HttpStatus {
        resource: &'static str,
        status: reqwest::StatusCode,
    },
    /// Body was not JSON at all
    #[error("Invalid JSON data received from {0} API")]
    InvalidJson(&'static str),
    /// Body was JSON but not the expected structure
    #[error("{0}")]
    InvalidData(String),
}

/// Failures of the on-disk catalog cache
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Failures while importing a wishlist spreadsheet
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Please upload a spreadsheet file (.csv): {0}")]
    UnsupportedFile(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to process spreadsheet: {0}")]
    Csv(#[from] csv::Error),
    /// The whole batch is rejected; `details` lists every offending row
    #[error("Some rows contain errors ({valid_items} valid items found)")]
    InvalidRows {
        details: Vec<String>,
        valid_items: usize,
    },
}

/// Failures while exporting cards or the wishlist
#[derive(Debug, Error)]
pub enum ExportError {
    /// Nothing to write; carries the message to show the user
    #[error("{0}")]
    Empty(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write spreadsheet: {0}")]
    Csv(#[from] csv::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;
pub type CatalogResult<T> = Result<T, CatalogError>;
pub type CacheResult<T> = Result<T, CacheError>;
pub type ImportResult<T> = Result<T, ImportError>;
pub type ExportResult<T> = Result<T, ExportError>;
