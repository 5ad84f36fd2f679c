//! Recognizer — the single point of entry for image-to-text recognition.
//!
//! ARCHITECTURAL RULE: no other module may talk to the OCR service directly.
//! The rest of the system sees only `Arc<dyn Recognizer>` and never learns
//! how the text was produced.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RecognizerError {
    #[error("Uploaded bytes are not a readable image")]
    NotAnImage,

    #[error("Recognition service error: {0}")]
    Service(String),
}

/// Boundary to the external recognition engine: image bytes plus a language
/// hint in, recognized text out. Implementations must not persist anything.
#[async_trait]
pub trait Recognizer: Send + Sync {
    async fn recognize(&self, image: Bytes, language: &str) -> Result<String, RecognizerError>;
}

#[derive(Debug, Deserialize)]
struct RecognizeResponse {
    text: String,
}

#[derive(Debug, Deserialize)]
struct RecognizeErrorBody {
    detail: String,
}

/// HTTP client for the OCR sidecar service. Posts the image as a multipart
/// upload and reads back `{"text": "..."}`. A 4xx from the service means the
/// payload was not a usable image; everything else is a service failure.
#[derive(Clone)]
pub struct HttpRecognizer {
    client: Client,
    url: String,
}

impl HttpRecognizer {
    pub fn new(url: String) -> Self {
        HttpRecognizer {
            client: Client::new(),
            url,
        }
    }
}

#[async_trait]
impl Recognizer for HttpRecognizer {
    async fn recognize(&self, image: Bytes, language: &str) -> Result<String, RecognizerError> {
        let form = Form::new()
            .part("file", Part::bytes(image.to_vec()).file_name("upload"))
            .text("language", language.to_string());

        let response = self
            .client
            .post(&self.url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| RecognizerError::Service(format!("request failed: {e}")))?;

        let status = response.status();
        if status.is_client_error() {
            // The service rejects non-image payloads with a 4xx and a detail
            // message; surface it as an input problem, not an outage.
            let detail = response
                .json::<RecognizeErrorBody>()
                .await
                .map(|b| b.detail)
                .unwrap_or_default();
            debug!("Recognizer rejected payload ({status}): {detail}");
            return Err(RecognizerError::NotAnImage);
        }
        if status != StatusCode::OK {
            return Err(RecognizerError::Service(format!(
                "unexpected status {status}"
            )));
        }

        let body: RecognizeResponse = response
            .json()
            .await
            .map_err(|e| RecognizerError::Service(format!("invalid response body: {e}")))?;

        debug!("Recognized {} bytes of text", body.text.len());
        Ok(body.text)
    }
}
