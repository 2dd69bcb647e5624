use crate::error::{CatalogError, CatalogResult};
use pocket_common::{Card, CardKey, CardSet, RarityMap};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Base URL of the published card database
pub const DEFAULT_BASE_URL: &str =
    "https://raw.githubusercontent.com/flibustier/pokemon-tcg-pocket-database/main/dist";

/// Everything the catalog view needs, fetched once at startup
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub cards: Vec<Card>,
    pub sets: Vec<CardSet>,
    pub rarities: RarityMap,
}

impl Catalog {
    /// Look up a card by identity
    pub fn find(&self, key: &CardKey) -> Option<&Card> {
        self.cards.iter().find(|card| card.has_key(key))
    }
}

/// Fetches the three catalog documents over HTTPS
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against another host serving the same documents
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET `{base}/{file}` and parse the body as JSON
    async fn get_json(&self, resource: &'static str, file: &str) -> CatalogResult<Value> {
        let url = format!("{}/{}", self.base_url, file);
        log::info!("Fetching {} from {}", resource, url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "pocket_wishlist/1.0")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::HttpStatus { resource, status });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            log::debug!("Invalid JSON from {}: {}", url, e);
            CatalogError::InvalidJson(resource)
        })
    }

    /// Fetch and validate the card list
    pub async fn fetch_cards(&self) -> CatalogResult<Vec<Card>> {
        let data = self.get_json("cards", "cards.json").await?;
        let cards = validate_cards(data)?;
        log::info!("Fetched {} cards", cards.len());
        Ok(cards)
    }

    pub async fn fetch_sets(&self) -> CatalogResult<Vec<CardSet>> {
        let data = self.get_json("sets", "sets.json").await?;
        let sets: Vec<CardSet> = serde_json::from_value(data)
            .map_err(|e| CatalogError::InvalidData(format!("Invalid sets data: {e}")))?;
        log::info!("Fetched {} sets", sets.len());
        Ok(sets)
    }

    pub async fn fetch_rarities(&self) -> CatalogResult<RarityMap> {
        let data = self.get_json("rarities", "rarity.json").await?;
        let rarities: RarityMap = serde_json::from_value(data)
            .map_err(|e| CatalogError::InvalidData(format!("Invalid rarity data: {e}")))?;
        log::info!("Fetched {} rarities", rarities.len());
        Ok(rarities)
    }

    /// Fetch cards, sets and rarities concurrently; the first failure wins
    pub async fn fetch_all(&self) -> CatalogResult<Catalog> {
        let (cards, sets, rarities) =
            tokio::try_join!(self.fetch_cards(), self.fetch_sets(), self.fetch_rarities())
                .inspect_err(|e| log::error!("Error fetching card data: {}", e))?;
        Ok(Catalog {
            cards,
            sets,
            rarities,
        })
    }
}

/// Shape check on a raw card record: string set, numeric number, string name
fn has_card_shape(record: &Value) -> bool {
    record.get("set").is_some_and(Value::is_string)
        && record.get("number").is_some_and(Value::is_number)
        && record
            .get("label")
            .and_then(|label| label.get("eng"))
            .is_some_and(Value::is_string)
}

/// Keep the well-formed records of a raw `cards.json` document
pub fn validate_cards(data: Value) -> CatalogResult<Vec<Card>> {
    let Value::Array(records) = data else {
        return Err(CatalogError::InvalidData(
            "Invalid cards data: Expected array".to_string(),
        ));
    };

    let total = records.len();
    let cards: Vec<Card> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            if !has_card_shape(&record) {
                log::debug!("Dropping card record {}: missing set, number or name", index);
                return None;
            }
            match serde_json::from_value::<Card>(record) {
                Ok(card) => Some(card),
                Err(e) => {
                    log::debug!("Dropping card record {}: {}", index, e);
                    None
                }
            }
        })
        .collect();

    if cards.is_empty() {
        return Err(CatalogError::InvalidData(
            "No valid cards found in data".to_string(),
        ));
    }
    if cards.len() < total {
        log::warn!("Dropped {} malformed card records", total - cards.len());
    }
    Ok(cards)
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
