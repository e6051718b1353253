// Substring search over the live list
//
// Matches against name, category, and brand, keeping the list's own order.
// Recomputed fresh on every call; never mutates the list.

use crate::core::item::ShoppingItem;

/// Items whose name, category, or brand contains `term`, case-insensitively
pub fn search(list: &[ShoppingItem], term: &str) -> Vec<ShoppingItem> {
    let needle = term.trim().to_lowercase();

    list.iter()
        .filter(|entry| {
            entry.name.to_lowercase().contains(&needle)
                || entry.category.to_lowercase().contains(&needle)
                || entry.brand.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::item::{DEFAULT_BRAND, DEFAULT_SIZE};

    fn item(name: &str, category: &str, brand: &str) -> ShoppingItem {
        ShoppingItem {
            name: name.to_string(),
            quantity: 1,
            category: category.to_string(),
            unit_price: 0.0,
            line_total: 0.0,
            brand: brand.to_string(),
            size: DEFAULT_SIZE.to_string(),
        }
    }

    fn sample_list() -> Vec<ShoppingItem> {
        vec![
            item("Milk", "dairy", "Amul"),
            item("bread", "bakery", DEFAULT_BRAND),
            item("cheese", "dairy", DEFAULT_BRAND),
        ]
    }

    #[test]
    fn test_partial_name_match() {
        let matches = search(&sample_list(), "brea");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "bread");
    }

    #[test]
    fn test_match_is_case_insensitive() {
        let matches = search(&sample_list(), "milk");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Milk");

        let matches = search(&sample_list(), "BREAD");
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_category_match() {
        let matches = search(&sample_list(), "dairy");
        assert_eq!(matches.len(), 2);
    }

    #[test]
    fn test_brand_match() {
        let matches = search(&sample_list(), "amul");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "Milk");
    }

    #[test]
    fn test_no_match_is_empty_not_error() {
        let matches = search(&sample_list(), "caviar");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_order_follows_the_list() {
        let list = vec![
            item("cheddar", "dairy", DEFAULT_BRAND),
            item("bread", "bakery", DEFAULT_BRAND),
            item("milk", "dairy", DEFAULT_BRAND),
        ];

        let matches = search(&list, "dairy");
        assert_eq!(matches[0].name, "cheddar");
        assert_eq!(matches[1].name, "milk");
    }

    #[test]
    fn test_search_does_not_touch_the_list() {
        let list = sample_list();
        let before = list.clone();
        let _ = search(&list, "milk");
        assert_eq!(list, before);
    }
}
