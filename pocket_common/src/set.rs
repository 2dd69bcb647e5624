use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rarity code (e.g. "C") to rarity label, ordered by code
pub type RarityMap = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetLabel {
    #[serde(default)]
    pub en: String,
}

/// An expansion in the card database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardSet {
    pub code: String,
    #[serde(default)]
    pub release_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(default)]
    pub label: SetLabel,
    #[serde(default)]
    pub packs: Vec<String>,
}
