//! Record store — owner-scoped persistence for receipts.
//!
//! Every query conjoins `owner_id`; a row belonging to another owner behaves
//! as absent, never as forbidden. The tenancy predicate lives here, at the
//! boundary, so no caller can forget it.

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;

use crate::errors::AppError;
use crate::models::receipt::{NewReceipt, ReceiptRow, ReceiptStats};

/// Store boundary. `PgReceiptStore` is the production implementation; tests
/// run against the in-memory double below.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// Persists a receipt atomically, assigning `id` and `created_at`.
    async fn create(&self, receipt: NewReceipt) -> Result<ReceiptRow, AppError>;

    async fn get(&self, id: i64, owner_id: &str) -> Result<Option<ReceiptRow>, AppError>;

    /// Returns one page ordered by `created_at` descending (ties broken by
    /// `id` descending) plus the total row count ignoring pagination.
    async fn list(
        &self,
        owner_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<ReceiptRow>, i64), AppError>;

    /// `true` only after a confirmed removal of the caller's own row.
    async fn delete(&self, id: i64, owner_id: &str) -> Result<bool, AppError>;

    async fn stats(&self, owner_id: &str) -> Result<ReceiptStats, AppError>;
}

/// Rounds a captured amount to the two fractional digits the store keeps.
pub(crate) fn normalize_amount(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub struct PgReceiptStore {
    pool: PgPool,
}

impl PgReceiptStore {
    pub fn new(pool: PgPool) -> Self {
        PgReceiptStore { pool }
    }
}

#[async_trait]
impl ReceiptStore for PgReceiptStore {
    async fn create(&self, receipt: NewReceipt) -> Result<ReceiptRow, AppError> {
        // Single INSERT .. RETURNING: either the whole row exists afterwards
        // or the error surfaces and nothing was written.
        let row: ReceiptRow = sqlx::query_as(
            r#"
            INSERT INTO receipts
                (file_name, raw_text, merchant, total_amount, purchase_date, confidence, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&receipt.file_name)
        .bind(&receipt.raw_text)
        .bind(&receipt.merchant)
        .bind(receipt.total_amount.map(normalize_amount))
        .bind(receipt.purchase_date)
        .bind(receipt.confidence)
        .bind(&receipt.owner_id)
        .fetch_one(&self.pool)
        .await?;

        info!("Created receipt {} for owner {}", row.id, row.owner_id);
        Ok(row)
    }

    async fn get(&self, id: i64, owner_id: &str) -> Result<Option<ReceiptRow>, AppError> {
        let row = sqlx::query_as("SELECT * FROM receipts WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(
        &self,
        owner_id: &str,
        page: i64,
        limit: i64,
    ) -> Result<(Vec<ReceiptRow>, i64), AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts WHERE owner_id = $1")
            .bind(owner_id)
            .fetch_one(&self.pool)
            .await?;

        let items = sqlx::query_as(
            r#"
            SELECT * FROM receipts
            WHERE owner_id = $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(owner_id)
        .bind(limit)
        .bind((page - 1) * limit)
        .fetch_all(&self.pool)
        .await?;

        Ok((items, total))
    }

    async fn delete(&self, id: i64, owner_id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM receipts WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?;

        let removed = result.rows_affected() > 0;
        if removed {
            info!("Deleted receipt {id} for owner {owner_id}");
        }
        Ok(removed)
    }

    async fn stats(&self, owner_id: &str) -> Result<ReceiptStats, AppError> {
        let (count, total_amount_sum, avg_confidence): (i64, f64, f64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COALESCE(SUM(total_amount), 0),
                   COALESCE(AVG(confidence), 0)
            FROM receipts
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(ReceiptStats {
            count,
            total_amount_sum,
            avg_confidence,
        })
    }
}


#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};

    use super::testing::MemoryStore;
    use super::*;

    fn receipt(owner: &str) -> NewReceipt {
        NewReceipt {
            file_name: "boleta.jpg".to_string(),
            raw_text: Some("SUPERMERCADO ABC\nTotal: $50.00".to_string()),
            merchant: Some("SUPERMERCADO ABC".to_string()),
            total_amount: Some(50.0),
            purchase_date: NaiveDate::from_ymd_opt(2023, 12, 20),
            confidence: Some(0.85),
            owner_id: owner.to_string(),
        }
    }

    #[test]
    fn test_normalize_amount_rounds_to_cents() {
        assert_eq!(normalize_amount(12.345), 12.35);
        assert_eq!(normalize_amount(12.344), 12.34);
        assert_eq!(normalize_amount(50.0), 50.0);
    }

    #[tokio::test]
    async fn test_create_assigns_increasing_ids() {
        let store = MemoryStore::new();
        let first = store.create(receipt("owner-a")).await.unwrap();
        let second = store.create(receipt("owner-b")).await.unwrap();
        // Global sequence: ids keep growing across owners.
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let store = MemoryStore::new();
        let created = store.create(receipt("owner-a")).await.unwrap();
        let fetched = store.get(created.id, "owner-a").await.unwrap().unwrap();
        assert_eq!(created, fetched);
    }

    #[tokio::test]
    async fn test_create_normalizes_amount_to_two_decimals() {
        let store = MemoryStore::new();
        let mut new = receipt("owner-a");
        new.total_amount = Some(19.999);
        let created = store.create(new).await.unwrap();
        assert_eq!(created.total_amount, Some(20.0));
    }

    #[tokio::test]
    async fn test_get_by_wrong_owner_is_none() {
        let store = MemoryStore::new();
        let created = store.create(receipt("owner-a")).await.unwrap();
        assert!(store.get(created.id, "owner-b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_is_scoped_to_owner() {
        let store = MemoryStore::new();
        store.create(receipt("owner-a")).await.unwrap();
        store.create(receipt("owner-b")).await.unwrap();
        store.create(receipt("owner-a")).await.unwrap();

        let (items, total) = store.list("owner-a", 1, 10).await.unwrap();
        assert_eq!(total, 2);
        assert!(items.iter().all(|r| r.owner_id == "owner-a"));
    }

    #[tokio::test]
    async fn test_list_orders_most_recent_first() {
        let store = MemoryStore::new();
        let old = store.create_at(
            receipt("owner-a"),
            Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        );
        let new = store.create_at(
            receipt("owner-a"),
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        );

        let (items, _) = store.list("owner-a", 1, 10).await.unwrap();
        assert_eq!(items[0].id, new.id);
        assert_eq!(items[1].id, old.id);
    }

    #[tokio::test]
    async fn test_list_breaks_timestamp_ties_by_id_desc() {
        let store = MemoryStore::new();
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap();
        let first = store.create_at(receipt("owner-a"), at);
        let second = store.create_at(receipt("owner-a"), at);

        let (items, _) = store.list("owner-a", 1, 10).await.unwrap();
        assert_eq!(items[0].id, second.id);
        assert_eq!(items[1].id, first.id);
    }

    #[tokio::test]
    async fn test_list_pagination_offsets() {
        let store = MemoryStore::new();
        for day in 1..=5 {
            store.create_at(
                receipt("owner-a"),
                Utc.with_ymd_and_hms(2024, 1, day, 0, 0, 0).unwrap(),
            );
        }

        let (page_two, total) = store.list("owner-a", 2, 2).await.unwrap();
        assert_eq!(total, 5);
        assert_eq!(page_two.len(), 2);
        // Newest first: page 1 holds days 5 and 4, page 2 days 3 and 2.
        assert_eq!(
            page_two[0].created_at,
            Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn test_list_past_the_end_is_empty_but_counts() {
        let store = MemoryStore::new();
        store.create(receipt("owner-a")).await.unwrap();
        let (items, total) = store.list("owner-a", 7, 10).await.unwrap();
        assert!(items.is_empty());
        assert_eq!(total, 1);
    }

    #[tokio::test]
    async fn test_delete_by_owner_removes_the_row() {
        let store = MemoryStore::new();
        let created = store.create(receipt("owner-a")).await.unwrap();
        assert!(store.delete(created.id, "owner-a").await.unwrap());
        assert!(store.get(created.id, "owner-a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_by_non_owner_is_a_silent_miss() {
        let store = MemoryStore::new();
        let created = store.create(receipt("owner-a")).await.unwrap();
        assert!(!store.delete(created.id, "owner-b").await.unwrap());
        // The true owner still sees the record.
        assert!(store.get(created.id, "owner-a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_delete_twice_returns_false() {
        let store = MemoryStore::new();
        let created = store.create(receipt("owner-a")).await.unwrap();
        assert!(store.delete(created.id, "owner-a").await.unwrap());
        assert!(!store.delete(created.id, "owner-a").await.unwrap());
    }

    #[tokio::test]
    async fn test_stats_on_empty_store_is_all_zero() {
        let store = MemoryStore::new();
        let stats = store.stats("owner-a").await.unwrap();
        assert_eq!(
            stats,
            ReceiptStats {
                count: 0,
                total_amount_sum: 0.0,
                avg_confidence: 0.0,
            }
        );
    }

    #[tokio::test]
    async fn test_stats_skips_absent_amounts() {
        let store = MemoryStore::new();
        store.create(receipt("owner-a")).await.unwrap();
        let mut no_amount = receipt("owner-a");
        no_amount.total_amount = None;
        no_amount.confidence = Some(0.55);
        store.create(no_amount).await.unwrap();

        let stats = store.stats("owner-a").await.unwrap();
        assert_eq!(stats.count, 2);
        assert_eq!(stats.total_amount_sum, 50.0);
        assert!((stats.avg_confidence - 0.70).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_stats_is_scoped_to_owner() {
        let store = MemoryStore::new();
        store.create(receipt("owner-a")).await.unwrap();
        store.create(receipt("owner-b")).await.unwrap();

        let stats = store.stats("owner-a").await.unwrap();
        assert_eq!(stats.count, 1);
        assert_eq!(stats.total_amount_sum, 50.0);
    }
}
