// Applies add and remove intents to the list
//
// Pure transformations: list in, list out, plus the notification to show.
// Store writes and recommendation refreshes belong to the session, not here.

use crate::core::intent::ItemIntent;
use crate::core::item::{name_key, ShoppingItem, DEFAULT_BRAND, DEFAULT_CATEGORY, DEFAULT_SIZE};
use crate::core::notification::{Notification, NotificationKind};

/// Entry fields covered by the merge policy table
///
/// Quantity is additive and the line total derived from the merge, so
/// neither appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeField {
    Name,
    Category,
    UnitPrice,
    Brand,
    Size,
}

/// What happens to a field when an add lands on an existing entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    AlwaysOverwrite,
    /// Take the incoming value unless it is the "unspecified" marker
    OverwriteUnlessDefault,
    NeverOverwrite,
}

/// The merge policy table
///
/// A known attribute is never clobbered by an unspecified one, and the
/// first-spoken name keeps its casing forever.
pub fn policy_for(field: MergeField) -> MergePolicy {
    match field {
        MergeField::Name => MergePolicy::NeverOverwrite,
        MergeField::Category
        | MergeField::UnitPrice
        | MergeField::Brand
        | MergeField::Size => MergePolicy::OverwriteUnlessDefault,
    }
}

/// Apply the table to one text field
pub fn merge_text(field: MergeField, existing: &str, incoming: &str) -> String {
    let unspecified = match field {
        MergeField::Category => DEFAULT_CATEGORY,
        MergeField::Brand => DEFAULT_BRAND,
        MergeField::Size => DEFAULT_SIZE,
        // Name never overwrites and price is numeric, see merge_price
        MergeField::Name | MergeField::UnitPrice => "",
    };

    match policy_for(field) {
        MergePolicy::AlwaysOverwrite => incoming.to_string(),
        MergePolicy::NeverOverwrite => existing.to_string(),
        MergePolicy::OverwriteUnlessDefault => {
            if incoming == unspecified {
                existing.to_string()
            } else {
                incoming.to_string()
            }
        }
    }
}

/// Apply the table to the unit price, where zero means unspecified
pub fn merge_price(existing: f64, incoming: f64) -> f64 {
    match policy_for(MergeField::UnitPrice) {
        MergePolicy::AlwaysOverwrite => incoming,
        MergePolicy::NeverOverwrite => existing,
        MergePolicy::OverwriteUnlessDefault => {
            if incoming == 0.0 {
                existing
            } else {
                incoming
            }
        }
    }
}

/// Add an item, merging into an existing entry when the name matches
///
/// Adds are additive, not idempotent: applying the same intent twice
/// increases the quantity twice.
pub fn apply_add(
    mut list: Vec<ShoppingItem>,
    intent: &ItemIntent,
) -> (Vec<ShoppingItem>, Notification) {
    let key = name_key(&intent.item);
    let message = format!("Added {} {}(s)", intent.quantity, intent.item);

    match list.iter_mut().find(|entry| entry.key() == key) {
        Some(entry) => {
            // Saturate instead of wrapping when a merge hits the quantity ceiling
            let merged_quantity = entry.quantity.saturating_add(intent.quantity);

            // A priced add recomputes the total from the merged quantity at
            // the incoming unit price. A quantity-only add (price zero)
            // keeps the old total instead of zeroing it out.
            if intent.price != 0.0 {
                entry.line_total = merged_quantity as f64 * intent.price;
            }

            entry.quantity = merged_quantity;
            entry.unit_price = merge_price(entry.unit_price, intent.price);
            entry.name = merge_text(MergeField::Name, &entry.name, &intent.item);
            entry.category = merge_text(MergeField::Category, &entry.category, &intent.category);
            entry.brand = merge_text(MergeField::Brand, &entry.brand, &intent.brand);
            entry.size = merge_text(MergeField::Size, &entry.size, &intent.size);
        }
        None => list.push(ShoppingItem {
            name: intent.item.clone(),
            quantity: intent.quantity,
            category: intent.category.clone(),
            unit_price: intent.price,
            line_total: intent.price * intent.quantity as f64,
            brand: intent.brand.clone(),
            size: intent.size.clone(),
        }),
    }

    (list, Notification::new(NotificationKind::Added, message))
}

/// Remove an item, decrementing or deleting depending on the quantity
///
/// Removing more than is on the list deletes the entry. Removing something
/// that isn't there leaves the list alone but still reports the removal,
/// matching the long-standing behavior users see.
pub fn apply_remove(
    mut list: Vec<ShoppingItem>,
    intent: &ItemIntent,
) -> (Vec<ShoppingItem>, Notification) {
    let key = name_key(&intent.item);
    // Reports the requested quantity, not the quantity actually dropped
    let message = format!("Removed {} {}(s)", intent.quantity, intent.item);

    if let Some(position) = list.iter().position(|entry| entry.key() == key) {
        if list[position].quantity > intent.quantity {
            // Partial removal only decrements the count. The stored total
            // stays as-is; rescaling it is an open product question.
            list[position].quantity -= intent.quantity;
        } else {
            list.remove(position);
        }
    }

    (list, Notification::new(NotificationKind::Removed, message))
}
