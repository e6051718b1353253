/// Data models for database entities
///
/// All models map to database tables and use sqlx for type-safe queries.
/// NULL attribute columns mean "the user never specified this"; rows are
/// lifted into core types with the defaults filled in, so the engine never
/// sees an absent field.

use crate::core::intent::ItemIntent;
use crate::core::item::{ShoppingItem, DEFAULT_BRAND, DEFAULT_CATEGORY, DEFAULT_SIZE};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Row of the live_list table
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct StoredItem {
    /// Trimmed, lower-cased name; the table's primary key
    pub key: String,
    pub name: String,
    pub quantity: i64,
    pub category: Option<String>,
    pub unit_price: f64,
    pub line_total: f64,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub updated_at: String, // ISO 8601 format from SQLite
}

impl StoredItem {
    /// Lift a row into the core item type, filling defaulted attributes
    pub fn into_item(self) -> ShoppingItem {
        ShoppingItem {
            name: self.name,
            quantity: self.quantity.max(1) as u32,
            category: self
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            unit_price: self.unit_price,
            line_total: self.line_total,
            brand: self.brand.unwrap_or_else(|| DEFAULT_BRAND.to_string()),
            size: self.size.unwrap_or_else(|| DEFAULT_SIZE.to_string()),
        }
    }
}

/// Default markers are stored as NULL so the row itself says "unspecified"
pub fn optional_attr<'a>(value: &'a str, default: &str) -> Option<&'a str> {
    if value == default {
        None
    } else {
        Some(value)
    }
}

/// What a history row records
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChangeAction {
    Added,
    Removed,
}

impl std::fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ChangeAction::Added => "added",
            ChangeAction::Removed => "removed",
        };
        write!(f, "{}", s)
    }
}

/// Input for appending one history row
///
/// Snapshots the delta an intent asked for, not the merged entry, so the
/// history reads as a log of what the user said.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub action: ChangeAction,
    pub name: String,
    pub quantity: u32,
    pub category: String,
    pub unit_price: f64,
    pub line_total: f64,
    pub brand: String,
    pub size: String,
}

impl ChangeRecord {
    pub fn from_intent(action: ChangeAction, intent: &ItemIntent) -> Self {
        Self {
            action,
            name: intent.item.clone(),
            quantity: intent.quantity,
            category: intent.category.clone(),
            unit_price: intent.price,
            line_total: intent.price * intent.quantity as f64,
            brand: intent.brand.clone(),
            size: intent.size.clone(),
        }
    }
}

/// Row of the history table
///
/// Serialized wholesale into the recommendation prompt, so field names are
/// part of that prompt's vocabulary.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HistoryEntry {
    pub id: i64,
    pub action: String, // 'added' or 'removed'
    pub name: String,
    pub quantity: i64,
    pub category: Option<String>,
    pub unit_price: f64,
    pub line_total: f64,
    pub brand: Option<String>,
    pub size: Option<String>,
    pub recorded_at: String, // ISO 8601 format from SQLite
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_item_fills_defaults() {
        let row = StoredItem {
            key: "milk".to_string(),
            name: "Milk".to_string(),
            quantity: 2,
            category: None,
            unit_price: 1.5,
            line_total: 3.0,
            brand: None,
            size: None,
            updated_at: "2026-08-25 10:00:00".to_string(),
        };

        let item = row.into_item();
        assert_eq!(item.name, "Milk");
        assert_eq!(item.category, "Uncategorized");
        assert_eq!(item.brand, "any");
        assert_eq!(item.size, "any");
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_into_item_keeps_specified_attributes() {
        let row = StoredItem {
            key: "milk".to_string(),
            name: "Milk".to_string(),
            quantity: 1,
            category: Some("dairy".to_string()),
            unit_price: 0.0,
            line_total: 0.0,
            brand: Some("Amul".to_string()),
            size: Some("1L".to_string()),
            updated_at: "2026-08-25 10:00:00".to_string(),
        };

        let item = row.into_item();
        assert_eq!(item.category, "dairy");
        assert_eq!(item.brand, "Amul");
        assert_eq!(item.size, "1L");
    }

    #[test]
    fn test_optional_attr_hides_defaults() {
        assert_eq!(optional_attr("Uncategorized", "Uncategorized"), None);
        assert_eq!(optional_attr("dairy", "Uncategorized"), Some("dairy"));
        assert_eq!(optional_attr("any", "any"), None);
    }

    #[test]
    fn test_change_action_display() {
        assert_eq!(ChangeAction::Added.to_string(), "added");
        assert_eq!(ChangeAction::Removed.to_string(), "removed");
    }

    #[test]
    fn test_change_record_from_intent() {
        let intent = ItemIntent {
            item: "rice".to_string(),
            quantity: 2,
            category: "grains".to_string(),
            price: 3.0,
            brand: "any".to_string(),
            size: "any".to_string(),
        };

        let record = ChangeRecord::from_intent(ChangeAction::Added, &intent);
        assert_eq!(record.action, ChangeAction::Added);
        assert_eq!(record.quantity, 2);
        assert_eq!(record.line_total, 6.0);
    }
}
