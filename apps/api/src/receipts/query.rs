//! Query service — clamps pagination input, delegates to the store, and
//! packages the page envelope callers render.

use serde::Serialize;

use crate::config::PageConfig;
use crate::errors::AppError;
use crate::models::receipt::ReceiptRow;
use crate::receipts::store::ReceiptStore;

#[derive(Debug, Serialize)]
pub struct ReceiptPage {
    pub items: Vec<ReceiptRow>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub pages: i64,
}

pub async fn list_receipts(
    store: &dyn ReceiptStore,
    config: PageConfig,
    owner_id: &str,
    page: Option<i64>,
    limit: Option<i64>,
) -> Result<ReceiptPage, AppError> {
    let page = page.unwrap_or(1).max(1);
    let limit = limit
        .unwrap_or(config.default_limit)
        .clamp(1, config.max_limit);

    let (items, total) = store.list(owner_id, page, limit).await?;

    Ok(ReceiptPage {
        items,
        total,
        page,
        limit,
        pages: page_count(total, limit),
    })
}

/// ceil(total / limit); zero pages when there are no rows.
fn page_count(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::receipt::NewReceipt;
    use crate::receipts::store::testing::MemoryStore;

    fn receipt(owner: &str) -> NewReceipt {
        NewReceipt {
            file_name: "boleta.jpg".to_string(),
            raw_text: None,
            merchant: None,
            total_amount: None,
            purchase_date: None,
            confidence: None,
            owner_id: owner.to_string(),
        }
    }

    #[test]
    fn test_page_count_zero_total() {
        assert_eq!(page_count(0, 20), 0);
    }

    #[test]
    fn test_page_count_exact_multiple() {
        assert_eq!(page_count(40, 20), 2);
    }

    #[test]
    fn test_page_count_with_remainder() {
        assert_eq!(page_count(41, 20), 3);
    }

    #[test]
    fn test_page_count_single_page() {
        assert_eq!(page_count(5, 20), 1);
    }

    #[tokio::test]
    async fn test_defaults_apply_when_params_absent() {
        let store = MemoryStore::new();
        let page = list_receipts(&store, PageConfig::default(), "owner-a", None, None)
            .await
            .unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 20);
        assert_eq!(page.pages, 0);
        assert!(page.items.is_empty());
    }

    #[tokio::test]
    async fn test_page_is_floored_at_one() {
        let store = MemoryStore::new();
        let page = list_receipts(&store, PageConfig::default(), "owner-a", Some(0), None)
            .await
            .unwrap();
        assert_eq!(page.page, 1);
    }

    #[tokio::test]
    async fn test_limit_clamps_to_bounds() {
        let store = MemoryStore::new();
        let config = PageConfig::default();

        let too_big = list_receipts(&store, config, "owner-a", None, Some(1000))
            .await
            .unwrap();
        assert_eq!(too_big.limit, 100);

        let too_small = list_receipts(&store, config, "owner-a", None, Some(0))
            .await
            .unwrap();
        assert_eq!(too_small.limit, 1);
    }

    #[tokio::test]
    async fn test_envelope_matches_store_contents() {
        let store = MemoryStore::new();
        for _ in 0..5 {
            store.create(receipt("owner-a")).await.unwrap();
        }
        store.create(receipt("owner-b")).await.unwrap();

        let page = list_receipts(&store, PageConfig::default(), "owner-a", Some(2), Some(2))
            .await
            .unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.page, 2);
        assert_eq!(page.limit, 2);
        assert_eq!(page.pages, 3);
        assert_eq!(page.items.len(), 2);
        assert!(page.items.iter().all(|r| r.owner_id == "owner-a"));
    }
}
