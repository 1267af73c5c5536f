/// Shared data structures for the wardrobe catalog
///
/// These structs represent the data model that flows between
/// the database layer, the ingestion pipeline and the recommender.

use rusqlite::types::{FromSql, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Coarse garment category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Top,
    Bottom,
    Outerwear,
    Shoes,
    #[default]
    Unknown,
}

impl ItemType {
    pub const ALL: [ItemType; 5] = [
        ItemType::Top,
        ItemType::Bottom,
        ItemType::Outerwear,
        ItemType::Shoes,
        ItemType::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Top => "top",
            ItemType::Bottom => "bottom",
            ItemType::Outerwear => "outerwear",
            ItemType::Shoes => "shoes",
            ItemType::Unknown => "unknown",
        }
    }

    /// Parse a category label, falling back to `Unknown` for anything
    /// outside the closed set
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or_default()
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Returned when a label is not one of the five categories
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized item type '{0}'")]
pub struct ParseItemTypeError(pub String);

impl FromStr for ItemType {
    type Err = ParseItemTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        ItemType::ALL
            .into_iter()
            .find(|t| t.as_str() == label)
            .ok_or_else(|| ParseItemTypeError(s.to_string()))
    }
}

impl ToSql for ItemType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for ItemType {
    // Rows written by other tools may carry labels outside the closed set
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(ItemType::Unknown),
            other => other.as_str().map(ItemType::from_label),
        }
    }
}

/// Represents a single wardrobe item in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Unique database ID
    pub id: i64,
    /// Image name relative to the images directory (may not exist on disk)
    pub filename: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    /// Canonical `rgb(R,G,B)` text, None if extraction was skipped or failed
    pub dominant_color: Option<String>,
    pub pattern: Option<String>,
    pub season: Option<String>,
    /// 0 (casual) to 5 (formal)
    pub formality: Option<i64>,
    pub notes: Option<String>,
}

/// Fields for a record that has not been inserted yet
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewItem {
    pub filename: String,
    pub item_type: ItemType,
    pub dominant_color: Option<String>,
    pub pattern: Option<String>,
    pub season: Option<String>,
    pub formality: Option<i64>,
    pub notes: Option<String>,
}

impl NewItem {
    pub fn new(filename: impl Into<String>, item_type: ItemType) -> Self {
        Self {
            filename: filename.into(),
            item_type,
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.dominant_color = Some(color.into());
        self
    }

    /// Attach the id assigned by the store
    pub fn into_item(self, id: i64) -> CatalogItem {
        CatalogItem {
            id,
            filename: self.filename,
            item_type: self.item_type,
            dominant_color: self.dominant_color,
            pattern: self.pattern,
            season: self.season,
            formality: self.formality,
            notes: self.notes,
        }
    }
}
