//! Custom Axum extractors

use axum::body::Bytes;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;

use super::error::ApiError;
use crate::models::{InsertPayload, TableName, ValidationError};

/// Extract and validate a table name from the path
pub struct ValidTableName(pub TableName);

impl<S> FromRequestParts<S> for ValidTableName
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(name): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                ApiError::Validation(ValidationError::MalformedPath {
                    reason: e.body_text(),
                })
            })?;

        let table = TableName::new(&name)?;
        Ok(Self(table))
    }
}

/// Extract an insert payload from a JSON object body.
///
/// The body is parsed regardless of `Content-Type`.
pub struct InsertBody(pub InsertPayload);

impl<S> FromRequest<S> for InsertBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state).await.map_err(|e| {
            ApiError::Validation(ValidationError::MalformedBody {
                reason: e.body_text(),
            })
        })?;

        let body: serde_json::Value = serde_json::from_slice(&bytes).map_err(|e| {
            ApiError::Validation(ValidationError::MalformedBody {
                reason: e.to_string(),
            })
        })?;

        Ok(Self(InsertPayload::from_json(body)?))
    }
}
