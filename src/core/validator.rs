// Normalizes raw extraction payloads into validated intents
//
// The extraction service is a language model, so every field gets
// sanity-checked and defaulted here before the rest of the engine sees it.

use crate::core::intent::{
    Intent, ItemIntent, PriceRange, SearchFilters, SearchIntent, INTENT_ADD, INTENT_REMOVE,
    INTENT_SEARCH, NOT_A_COMMAND,
};
use crate::core::item::{DEFAULT_BRAND, DEFAULT_CATEGORY, DEFAULT_SIZE};
use crate::error::{CartError, Result};
use serde_json::{Map, Value};

/// Turn a raw payload into a validated intent
///
/// The payload is either the non-command sentinel (a bare JSON string) or
/// an object tagged with an `intent` field. Anything else is malformed.
pub fn normalize(raw: &Value) -> Result<Intent> {
    if let Value::String(text) = raw {
        if text.trim() == NOT_A_COMMAND {
            return Ok(Intent::NotAShoppingCommand);
        }
        return Err(CartError::MalformedIntent(format!(
            "unexpected text payload: {}",
            text
        )));
    }

    let fields = raw.as_object().ok_or_else(|| {
        CartError::MalformedIntent("intent payload is not an object".to_string())
    })?;

    let tag = fields
        .get("intent")
        .and_then(Value::as_str)
        .ok_or_else(|| CartError::MalformedIntent("missing intent field".to_string()))?;

    match tag {
        INTENT_ADD => Ok(Intent::AddToList(normalize_item(fields)?)),
        INTENT_REMOVE => Ok(Intent::RemoveFromList(normalize_item(fields)?)),
        INTENT_SEARCH => Ok(Intent::SearchItem(normalize_search(fields)?)),
        other => Err(CartError::MalformedIntent(format!(
            "unknown intent: {}",
            other
        ))),
    }
}

/// Shared field rules for add and remove payloads
fn normalize_item(fields: &Map<String, Value>) -> Result<ItemIntent> {
    // The name is the one field we can't invent. Casing is kept for display.
    let item = trimmed_string(fields.get("item"))
        .ok_or_else(|| CartError::MalformedIntent("item name is empty".to_string()))?;

    Ok(ItemIntent {
        item,
        quantity: quantity_or_default(fields.get("quantity")),
        category: trimmed_string(fields.get("category"))
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        price: price_or_default(fields.get("price")),
        brand: trimmed_string(fields.get("brand")).unwrap_or_else(|| DEFAULT_BRAND.to_string()),
        size: trimmed_string(fields.get("size")).unwrap_or_else(|| DEFAULT_SIZE.to_string()),
    })
}

fn normalize_search(fields: &Map<String, Value>) -> Result<SearchIntent> {
    let term = trimmed_string(fields.get("search_term"))
        .ok_or_else(|| CartError::MalformedIntent("search term is empty".to_string()))?;

    let filter_fields = fields.get("filters").and_then(Value::as_object);
    let filters = SearchFilters {
        brand: filter_fields
            .and_then(|f| trimmed_string(f.get("brand")))
            .unwrap_or_else(|| DEFAULT_BRAND.to_string()),
        size: filter_fields
            .and_then(|f| trimmed_string(f.get("size")))
            .unwrap_or_else(|| DEFAULT_SIZE.to_string()),
    };

    let range_fields = fields.get("price_range").and_then(Value::as_object);
    let min = price_or_default(range_fields.and_then(|r| r.get("min")));
    let max = price_or_default(range_fields.and_then(|r| r.get("max")));

    // Inverted bounds get swapped, never rejected
    let price_range = if min <= max {
        PriceRange { min, max }
    } else {
        PriceRange { min: max, max: min }
    };

    Ok(SearchIntent {
        term,
        filters,
        price_range,
    })
}

/// A trimmed, non-empty string, or None for anything else
fn trimmed_string(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Coerce a quantity to a positive integer, defaulting to one
///
/// Fractions are floored first, so 2.7 means 2 but 0.5 still means 1.
fn quantity_or_default(value: Option<&Value>) -> u32 {
    match value.and_then(Value::as_f64) {
        Some(q) if q >= 1.0 => q.floor() as u32,
        _ => 1,
    }
}

/// Coerce a price to a non-negative number, defaulting to zero
fn price_or_default(value: Option<&Value>) -> f64 {
    match value.and_then(Value::as_f64) {
        Some(p) if p >= 0.0 => p,
        _ => 0.0,
    }
}
