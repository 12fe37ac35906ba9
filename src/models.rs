//! Domain models that travel between the store, the CSV layer, and the TUI.
//! The intent is that these types stay light-weight data holders so other
//! layers can focus on presentation and persistence logic.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Branches the business operates. Selectors and the default Stock filter
/// iterate this list in order.
pub const BRANCHES: &[&str] = &[
    "Dongdaemun",
    "Goodmorning City",
    "Yangjae",
    "Suwon Yeongtong",
    "Dongtan",
    "Yeongdeungpo",
    "Lumbini",
];

/// Item classifications offered by the entry form.
pub const CATEGORIES: &[&str] = &[
    "Meat",
    "Vegetables",
    "Seafood",
    "Spices",
    "Sauces",
    "Grains/Noodles",
    "Beverages",
    "Packaging",
    "Other",
];

/// One row of stock data. `(branch, item_name)` is the identity; everything
/// else is payload that an upsert overwrites wholesale.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InventoryRecord {
    #[serde(default)]
    pub branch: String,
    #[serde(rename = "itemName", default)]
    pub item_name: String,
    #[serde(default)]
    pub category: String,
    /// Free text such as `kg` or `box`.
    #[serde(default)]
    pub unit: String,
    #[serde(rename = "currentQty", default, deserialize_with = "de_quantity")]
    pub current_qty: f64,
    /// Reorder threshold.
    #[serde(rename = "minQty", default, deserialize_with = "de_quantity")]
    pub min_qty: f64,
    #[serde(default)]
    pub note: String,
}

impl InventoryRecord {
    pub fn new(
        branch: impl Into<String>,
        item_name: impl Into<String>,
        category: impl Into<String>,
        unit: impl Into<String>,
        current_qty: f64,
        min_qty: f64,
        note: impl Into<String>,
    ) -> Self {
        Self {
            branch: branch.into(),
            item_name: item_name.into(),
            category: category.into(),
            unit: unit.into(),
            current_qty: coerce_quantity(current_qty),
            min_qty: coerce_quantity(min_qty),
            note: note.into(),
        }
    }

    /// True when stock has fallen to or below the reorder threshold.
    pub fn is_below_threshold(&self) -> bool {
        self.current_qty <= self.min_qty
    }

    /// Whether this record carries the given identity key.
    pub fn has_key(&self, branch: &str, item_name: &str) -> bool {
        self.branch == branch && self.item_name == item_name
    }
}

impl fmt::Display for InventoryRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.branch, self.item_name)
    }
}

/// Clamp a quantity into the valid domain. NaN, infinities and negatives all
/// collapse to zero.
pub fn coerce_quantity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Parse free-form quantity text, treating anything unparseable as zero.
pub fn parse_quantity(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .map(coerce_quantity)
        .unwrap_or(0.0)
}

/// Render a quantity without a trailing `.0` for whole numbers.
pub fn format_quantity(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

fn de_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(parse_quantity(&raw))
}
