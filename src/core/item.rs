/// Shopping list entries
///
/// One entry per item name. The name is the identity: two spellings that
/// differ only in case or surrounding whitespace are the same item.

use serde::{Deserialize, Serialize};

/// Category used when the intent didn't classify the item
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

/// Brand marker meaning "the user didn't specify one"
pub const DEFAULT_BRAND: &str = "any";

/// Size marker meaning "the user didn't specify one"
pub const DEFAULT_SIZE: &str = "any";

/// A single entry on the live shopping list
///
/// `line_total` is derivable from the unit price and quantity but stored,
/// because a quantity-only merge keeps the old total (see the reconciler).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    pub name: String,
    pub quantity: u32,
    pub category: String,
    pub unit_price: f64,
    pub line_total: f64,
    pub brand: String,
    pub size: String,
}

impl ShoppingItem {
    /// Identity key for this entry
    pub fn key(&self) -> String {
        name_key(&self.name)
    }
}

/// Normalize a name for identity comparison: trimmed, lower-cased
pub fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rice() -> ShoppingItem {
        ShoppingItem {
            name: "Rice".to_string(),
            quantity: 2,
            category: "grains".to_string(),
            unit_price: 3.0,
            line_total: 6.0,
            brand: DEFAULT_BRAND.to_string(),
            size: DEFAULT_SIZE.to_string(),
        }
    }

    #[test]
    fn test_key_ignores_case() {
        let item = rice();
        assert_eq!(item.key(), "rice");
        assert_eq!(name_key("RICE"), item.key());
    }

    #[test]
    fn test_key_trims_whitespace() {
        assert_eq!(name_key("  Basmati Rice "), "basmati rice");
    }

    #[test]
    fn test_display_casing_survives() {
        let item = rice();
        assert_eq!(item.name, "Rice");
    }
}
