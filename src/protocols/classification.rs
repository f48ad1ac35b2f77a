//! Classification record returned by `POST /analyze/`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Recyclable material category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WasteType {
    #[serde(rename = "plastic")]
    Plastic,
    #[serde(rename = "paper/cardboard")]
    PaperCardboard,
    #[serde(rename = "metal")]
    Metal,
    #[serde(rename = "glass")]
    Glass,
}

impl WasteType {
    pub const ALL: [WasteType; 4] = [
        WasteType::Plastic,
        WasteType::PaperCardboard,
        WasteType::Metal,
        WasteType::Glass,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            WasteType::Plastic => "plastic",
            WasteType::PaperCardboard => "paper/cardboard",
            WasteType::Metal => "metal",
            WasteType::Glass => "glass",
        }
    }

    /// Map a free-form model label onto a category.
    ///
    /// Matching is case-insensitive and accepts the common spellings models
    /// produce for the paper category (`paper`, `cardboard`, `paper and cardboard`).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "plastic" | "plastics" => Some(WasteType::Plastic),
            "paper" | "cardboard" | "paper/cardboard" | "paper and cardboard"
            | "paper & cardboard" | "paper-cardboard" => Some(WasteType::PaperCardboard),
            "metal" | "metals" => Some(WasteType::Metal),
            "glass" => Some(WasteType::Glass),
            _ => None,
        }
    }
}

impl fmt::Display for WasteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated size of the object, used by the model to scale the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantity {
    Small,
    Medium,
    Large,
}

impl Quantity {
    pub const ALL: [Quantity; 3] = [Quantity::Small, Quantity::Medium, Quantity::Large];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Quantity::Small => "small",
            Quantity::Medium => "medium",
            Quantity::Large => "large",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "small" => Some(Quantity::Small),
            "medium" => Some(Quantity::Medium),
            "large" => Some(Quantity::Large),
            _ => None,
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Highest reward a single classification can earn.
pub const MAX_SCORE: u8 = 100;

/// Structured classification of the central object in an uploaded image.
///
/// Built fresh for every request and serialized straight into the response body.
/// The reward score travels under the `kwetche` key the prompt asks the model for;
/// `score` is accepted as an alias on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub recyclable: bool,
    #[serde(rename = "type")]
    pub waste_type: Option<WasteType>,
    pub explanation: String,
    pub quantity: Option<Quantity>,
    #[serde(rename = "kwetche", alias = "score")]
    pub score: Option<u8>,
}

impl ClassificationResult {
    /// Whether a non-recyclable record leaves `type` and `quantity` empty.
    ///
    /// Recyclable records always satisfy this.
    pub fn honors_non_recyclable_nulls(&self) -> bool {
        self.recyclable || (self.waste_type.is_none() && self.quantity.is_none())
    }
}
