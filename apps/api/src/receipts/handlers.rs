use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use serde::Deserialize;

use crate::errors::AppError;
use crate::identity::OwnerId;
use crate::models::receipt::{ReceiptRow, ReceiptStats};
use crate::receipts::ingest::ingest_receipt;
use crate::receipts::query::{list_receipts, ReceiptPage};
use crate::recognizer::RecognizerError;
use crate::state::AppState;

/// POST /api/v1/receipts
/// Multipart image upload; recognizes, extracts, and persists one receipt.
pub async fn handle_upload(
    State(state): State<AppState>,
    owner: OwnerId,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ReceiptRow>), AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::Validation(
                "Uploaded file must be an image".into(),
            ));
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Could not read upload: {e}")))?;
        upload = Some((file_name, data));
        break;
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;
    let row = recognize_and_ingest(&state, &owner, &file_name, data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[derive(Debug, Deserialize)]
pub struct IngestFromUrlRequest {
    pub signed_url: String,
    pub file_name: String,
}

/// POST /api/v1/receipts/from-url
/// Ingests an image already sitting in object storage, addressed by a
/// pre-signed URL. Download problems are the caller's input error.
pub async fn handle_ingest_from_url(
    State(state): State<AppState>,
    owner: OwnerId,
    Json(req): Json<IngestFromUrlRequest>,
) -> Result<(StatusCode, Json<ReceiptRow>), AppError> {
    let response = state
        .http
        .get(&req.signed_url)
        .send()
        .await
        .map_err(|e| AppError::Validation(format!("Could not download image: {e}")))?;

    if !response.status().is_success() {
        return Err(AppError::Validation(format!(
            "Image download failed with status {}",
            response.status()
        )));
    }

    let data = response
        .bytes()
        .await
        .map_err(|e| AppError::Validation(format!("Could not read downloaded image: {e}")))?;

    let row = recognize_and_ingest(&state, &owner, &req.file_name, data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Shared tail of both ingestion routes: size gate, recognizer call, and the
/// orchestrator commit.
async fn recognize_and_ingest(
    state: &AppState,
    owner: &OwnerId,
    file_name: &str,
    image: Bytes,
) -> Result<ReceiptRow, AppError> {
    if image.is_empty() {
        return Err(AppError::Validation("Uploaded file is empty".into()));
    }
    if image.len() > state.config.max_upload_bytes {
        return Err(AppError::Validation(format!(
            "Upload exceeds the {} byte limit",
            state.config.max_upload_bytes
        )));
    }

    let text = state
        .recognizer
        .recognize(image, &state.config.ocr_language)
        .await
        .map_err(|e| match e {
            RecognizerError::NotAnImage => {
                AppError::Validation("Uploaded file is not a readable image".into())
            }
            RecognizerError::Service(msg) => AppError::Recognizer(msg),
        })?;

    ingest_receipt(
        state.store.as_ref(),
        &state.extractor,
        &text,
        file_name,
        &owner.0,
    )
    .await
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// GET /api/v1/receipts
pub async fn handle_list(
    State(state): State<AppState>,
    owner: OwnerId,
    Query(params): Query<ListParams>,
) -> Result<Json<ReceiptPage>, AppError> {
    let page = list_receipts(
        state.store.as_ref(),
        state.pages,
        &owner.0,
        params.page,
        params.limit,
    )
    .await?;
    Ok(Json(page))
}

/// GET /api/v1/receipts/stats
pub async fn handle_stats(
    State(state): State<AppState>,
    owner: OwnerId,
) -> Result<Json<ReceiptStats>, AppError> {
    let stats = state.store.stats(&owner.0).await?;
    Ok(Json(stats))
}

/// GET /api/v1/receipts/:id
pub async fn handle_get(
    State(state): State<AppState>,
    owner: OwnerId,
    Path(id): Path<i64>,
) -> Result<Json<ReceiptRow>, AppError> {
    let row = state
        .store
        .get(id, &owner.0)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Receipt {id} not found")))?;
    Ok(Json(row))
}

/// DELETE /api/v1/receipts/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    owner: OwnerId,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    if state.store.delete(id, &owner.0).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Receipt {id} not found")))
    }
}
