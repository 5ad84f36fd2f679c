//! Ingestion orchestrator — the only place receipts are created.
//!
//! Takes the recognized text plus caller metadata, runs the extraction
//! engine, and commits one row through the store. Recognition that produced
//! no usable text is the caller's problem (bad image), not a server fault.

use tracing::info;

use crate::errors::AppError;
use crate::extract::ReceiptExtractor;
use crate::models::receipt::{NewReceipt, ReceiptRow};
use crate::receipts::store::ReceiptStore;

pub async fn ingest_receipt(
    store: &dyn ReceiptStore,
    extractor: &ReceiptExtractor,
    raw_text: &str,
    file_name: &str,
    owner_id: &str,
) -> Result<ReceiptRow, AppError> {
    if file_name.trim().is_empty() {
        return Err(AppError::Validation("File name must not be empty".into()));
    }
    if raw_text.trim().is_empty() {
        return Err(AppError::Validation(
            "No text could be recognized in the image".into(),
        ));
    }

    let fields = extractor.extract(raw_text);
    let receipt = NewReceipt {
        file_name: file_name.to_string(),
        raw_text: Some(raw_text.to_string()),
        merchant: fields.merchant,
        total_amount: fields.total_amount,
        purchase_date: fields.purchase_date,
        confidence: Some(fields.confidence),
        owner_id: owner_id.to_string(),
    };

    let row = store.create(receipt).await?;
    info!(
        "Ingested receipt {} ({}) for owner {}",
        row.id, row.file_name, row.owner_id
    );
    Ok(row)
}
