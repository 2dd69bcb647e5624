use serde::{Deserialize, Serialize};
use std::fmt;

/// Localised names of a card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardLabel {
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub eng: String,
}

/// A single catalog card, identified by set code and collector number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub set: String,
    pub number: u32,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub rarity_code: String,
    #[serde(default)]
    pub image_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub label: CardLabel,
    /// Booster packs the card can be pulled from, in source order
    #[serde(default)]
    pub packs: Vec<String>,
}

impl Card {
    /// Create a card with only identity and name filled in
    pub fn new(set: impl Into<String>, number: u32, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            set: set.into(),
            number,
            rarity: String::new(),
            rarity_code: String::new(),
            image_name: String::new(),
            image_url: None,
            label: CardLabel {
                slug: name.to_lowercase(),
                eng: name,
            },
            packs: Vec::new(),
        }
    }

    pub fn with_rarity(mut self, rarity: impl Into<String>, rarity_code: impl Into<String>) -> Self {
        self.rarity = rarity.into();
        self.rarity_code = rarity_code.into();
        self
    }

    pub fn with_packs<I, S>(mut self, packs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packs = packs.into_iter().map(Into::into).collect();
        self
    }

    /// English display name, `None` when the source left it blank
    pub fn display_name(&self) -> Option<&str> {
        if self.label.eng.is_empty() {
            None
        } else {
            Some(&self.label.eng)
        }
    }

    /// Identity key of this card
    pub fn key(&self) -> CardKey {
        CardKey::new(self.set.clone(), self.number)
    }

    /// Returns true if this card has the given identity
    pub fn has_key(&self, key: &CardKey) -> bool {
        self.set == key.set && self.number == key.number
    }

    /// Returns true if the card is in the given booster pack
    pub fn in_pack(&self, pack: &str) -> bool {
        self.packs.iter().any(|p| p == pack)
    }
}

/// Card identity: (set code, collector number)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CardKey {
    pub set: String,
    pub number: u32,
}

impl CardKey {
    pub fn new(set: impl Into<String>, number: u32) -> Self {
        Self {
            set: set.into(),
            number,
        }
    }
}

impl fmt::Display for CardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.set, self.number)
    }
}

impl From<&Card> for CardKey {
    fn from(card: &Card) -> Self {
        card.key()
    }
}
