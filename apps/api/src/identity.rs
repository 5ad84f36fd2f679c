//! Identity boundary. Authentication happens upstream (gateway validates the
//! caller's token); this service only receives the resolved user id in a
//! header and treats it as opaque.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::errors::AppError;

pub const OWNER_HEADER: &str = "x-user-id";

/// The authenticated owner of the request. Every receipt operation is scoped
/// to this value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerId(pub String);

#[async_trait]
impl<S> FromRequestParts<S> for OwnerId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(OWNER_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| OwnerId(value.to_string()))
            .ok_or(AppError::Unauthorized)
    }
}
