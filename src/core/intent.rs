/// Validated shopping commands
///
/// The extraction service hands back untyped JSON; the validator turns it
/// into one of these. An `Intent` is built once per utterance, consumed by
/// the controller, then dropped.

use crate::core::item::{DEFAULT_BRAND, DEFAULT_SIZE};

/// Exact reply the extraction service gives for non-shopping utterances
pub const NOT_A_COMMAND: &str = "Not a shopping command.";

/// Wire tags carried in the `intent` field of the extraction payload
pub const INTENT_ADD: &str = "add_to_list";
pub const INTENT_REMOVE: &str = "remove_from_list";
pub const INTENT_SEARCH: &str = "search_item";

/// A validated shopping command
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AddToList(ItemIntent),
    RemoveFromList(ItemIntent),
    SearchItem(SearchIntent),
    /// Upstream signal meaning "ignore this utterance"
    NotAShoppingCommand,
}

/// Item fields shared by add and remove commands
///
/// All fields are already defaulted by the validator: quantity is at least
/// one, price is zero when the user didn't say one, and the attribute
/// strings carry their "unspecified" markers instead of being empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemIntent {
    /// Display casing preserved; compare via `name_key`
    pub item: String,
    pub quantity: u32,
    pub category: String,
    /// Unit price, zero meaning unspecified
    pub price: f64,
    pub brand: String,
    pub size: String,
}

/// A validated search command
#[derive(Debug, Clone, PartialEq)]
pub struct SearchIntent {
    pub term: String,
    pub filters: SearchFilters,
    pub price_range: PriceRange,
}

/// Attribute filters the extraction service attaches to a search
///
/// Normalized and carried along, but not part of the matching rule.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilters {
    pub brand: String,
    pub size: String,
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self {
            brand: DEFAULT_BRAND.to_string(),
            size: DEFAULT_SIZE.to_string(),
        }
    }
}

/// Price bounds attached to a search, clamped to `0 <= min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}
