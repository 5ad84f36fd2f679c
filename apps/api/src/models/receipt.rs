use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A persisted receipt. Immutable after creation; rows are only ever
/// inserted by the ingestion path and removed by their owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ReceiptRow {
    pub id: i64,
    pub file_name: String,
    pub raw_text: Option<String>,
    pub merchant: Option<String>,
    pub total_amount: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub confidence: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub owner_id: String,
}

/// Fields supplied by the ingestion orchestrator; `id` and `created_at`
/// are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewReceipt {
    pub file_name: String,
    pub raw_text: Option<String>,
    pub merchant: Option<String>,
    pub total_amount: Option<f64>,
    pub purchase_date: Option<NaiveDate>,
    pub confidence: Option<f64>,
    pub owner_id: String,
}

/// Aggregates over one owner's receipts. Sum and average skip rows where
/// the underlying field is absent and default to zero when nothing matches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptStats {
    pub count: i64,
    pub total_amount_sum: f64,
    pub avg_confidence: f64,
}
