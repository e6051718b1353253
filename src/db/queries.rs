/// SQL query functions for database operations
///
/// Runtime-checked sqlx queries over the live_list and history tables. The
/// live list mirrors the in-memory list one row per normalized name; the
/// history only ever grows.

use crate::core::item::{ShoppingItem, DEFAULT_BRAND, DEFAULT_CATEGORY, DEFAULT_SIZE};
use crate::db::models::*;
use crate::db::Database;
use crate::error::Result;
use chrono::Utc;
use sqlx::Row;

impl Database {
    /// Insert or update the live_list row for an item
    ///
    /// Keyed on the normalized name, so re-adding an item lands on the same
    /// row. The stored name is not updated on conflict: the first-spoken
    /// casing wins, matching the in-memory merge rule.
    pub async fn upsert_item(&self, item: &ShoppingItem) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO live_list (key, name, quantity, category, unit_price, line_total, brand, size, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                quantity = excluded.quantity,
                category = excluded.category,
                unit_price = excluded.unit_price,
                line_total = excluded.line_total,
                brand = excluded.brand,
                size = excluded.size,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(item.key())
        .bind(&item.name)
        .bind(item.quantity as i64)
        .bind(optional_attr(&item.category, DEFAULT_CATEGORY))
        .bind(item.unit_price)
        .bind(item.line_total)
        .bind(optional_attr(&item.brand, DEFAULT_BRAND))
        .bind(optional_attr(&item.size, DEFAULT_SIZE))
        .bind(Utc::now().to_rfc3339())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    /// Delete a live_list row by its normalized-name key
    pub async fn remove_item(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM live_list WHERE key = ?")
            .bind(key)
            .execute(self.pool())
            .await?;

        Ok(())
    }

    /// Load the whole live list in insertion order
    ///
    /// rowid order is what the user saw while building the list, so a
    /// restored session renders identically.
    pub async fn load_items(&self) -> Result<Vec<ShoppingItem>> {
        let rows = sqlx::query_as::<_, StoredItem>("SELECT * FROM live_list ORDER BY rowid")
            .fetch_all(self.pool())
            .await?;

        Ok(rows.into_iter().map(StoredItem::into_item).collect())
    }

    /// Append one row to the change history
    ///
    /// # Returns
    /// * `Ok(i64)` - The new history row ID
    pub async fn append_history(&self, record: &ChangeRecord) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO history (action, name, quantity, category, unit_price, line_total, brand, size)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(record.action.to_string())
        .bind(&record.name)
        .bind(record.quantity as i64)
        .bind(optional_attr(&record.category, DEFAULT_CATEGORY))
        .bind(record.unit_price)
        .bind(record.line_total)
        .bind(optional_attr(&record.brand, DEFAULT_BRAND))
        .bind(optional_attr(&record.size, DEFAULT_SIZE))
        .fetch_one(self.pool())
        .await?;

        Ok(result.get(0))
    }

    /// Most recent history rows, newest first
    ///
    /// # Arguments
    /// * `limit` - Maximum number of rows to return
    pub async fn recent_history(&self, limit: i64) -> Result<Vec<HistoryEntry>> {
        let entries =
            sqlx::query_as::<_, HistoryEntry>("SELECT * FROM history ORDER BY id DESC LIMIT ?")
                .bind(limit)
                .fetch_all(self.pool())
                .await?;

        Ok(entries)
    }

    /// Drop every live_list row; the history is kept
    pub async fn clear_list(&self) -> Result<()> {
        sqlx::query("DELETE FROM live_list")
            .execute(self.pool())
            .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::intent::ItemIntent;

    fn item(name: &str, quantity: u32) -> ShoppingItem {
        ShoppingItem {
            name: name.to_string(),
            quantity,
            category: DEFAULT_CATEGORY.to_string(),
            unit_price: 0.0,
            line_total: 0.0,
            brand: DEFAULT_BRAND.to_string(),
            size: DEFAULT_SIZE.to_string(),
        }
    }

    fn record(action: ChangeAction, name: &str, quantity: u32) -> ChangeRecord {
        ChangeRecord::from_intent(
            action,
            &ItemIntent {
                item: name.to_string(),
                quantity,
                category: DEFAULT_CATEGORY.to_string(),
                price: 0.0,
                brand: DEFAULT_BRAND.to_string(),
                size: DEFAULT_SIZE.to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_upsert_and_load_round_trip() {
        let db = Database::new_test().await.unwrap();

        let mut milk = item("Milk", 2);
        milk.category = "dairy".to_string();
        milk.unit_price = 1.5;
        milk.line_total = 3.0;

        db.upsert_item(&milk).await.unwrap();

        let loaded = db.load_items().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].name, "Milk");
        assert_eq!(loaded[0].quantity, 2);
        assert_eq!(loaded[0].category, "dairy");
        assert_eq!(loaded[0].line_total, 3.0);
        // unspecified attributes come back as their defaults
        assert_eq!(loaded[0].brand, "any");
        assert_eq!(loaded[0].size, "any");
    }

    #[tokio::test]
    async fn test_upsert_same_key_updates_in_place() {
        let db = Database::new_test().await.unwrap();

        db.upsert_item(&item("rice", 2)).await.unwrap();

        let mut updated = item("RICE", 3);
        updated.line_total = 9.0;
        db.upsert_item(&updated).await.unwrap();

        let loaded = db.load_items().await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].quantity, 3);
        assert_eq!(loaded[0].line_total, 9.0);
        // the first-spoken casing survives the upsert
        assert_eq!(loaded[0].name, "rice");
    }

    #[tokio::test]
    async fn test_load_preserves_insertion_order() {
        let db = Database::new_test().await.unwrap();

        for name in ["milk", "bread", "cheese"] {
            db.upsert_item(&item(name, 1)).await.unwrap();
        }
        // touching an early row must not move it
        db.upsert_item(&item("milk", 5)).await.unwrap();

        let loaded = db.load_items().await.unwrap();
        let names: Vec<&str> = loaded.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["milk", "bread", "cheese"]);
        assert_eq!(loaded[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_remove_item_deletes_row() {
        let db = Database::new_test().await.unwrap();

        db.upsert_item(&item("milk", 1)).await.unwrap();
        db.remove_item("milk").await.unwrap();

        let loaded = db.load_items().await.unwrap();
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_history_appends_and_orders_newest_first() {
        let db = Database::new_test().await.unwrap();

        let first = db
            .append_history(&record(ChangeAction::Added, "milk", 2))
            .await
            .unwrap();
        let second = db
            .append_history(&record(ChangeAction::Removed, "milk", 1))
            .await
            .unwrap();

        assert!(second > first);

        let recent = db.recent_history(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].action, "removed");
        assert_eq!(recent[1].action, "added");
    }

    #[tokio::test]
    async fn test_recent_history_respects_limit() {
        let db = Database::new_test().await.unwrap();

        for i in 1..=5 {
            db.append_history(&record(ChangeAction::Added, "milk", i))
                .await
                .unwrap();
        }

        let recent = db.recent_history(3).await.unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].quantity, 5);
    }

    #[tokio::test]
    async fn test_clear_list_keeps_history() {
        let db = Database::new_test().await.unwrap();

        db.upsert_item(&item("milk", 1)).await.unwrap();
        db.append_history(&record(ChangeAction::Added, "milk", 1))
            .await
            .unwrap();

        db.clear_list().await.unwrap();

        assert!(db.load_items().await.unwrap().is_empty());
        assert_eq!(db.recent_history(10).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_stats_counts_both_tables() {
        let db = Database::new_test().await.unwrap();

        db.upsert_item(&item("milk", 1)).await.unwrap();
        db.append_history(&record(ChangeAction::Added, "milk", 1))
            .await
            .unwrap();

        let stats = db.stats().await.unwrap();
        assert_eq!(stats.live_items, 1);
        assert_eq!(stats.history_entries, 1);
    }
}
