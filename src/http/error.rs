//! API error type and its HTTP mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::schema::ValidationError;
use crate::store::StoreError;

/// Errors an API handler can return
#[derive(Debug, Error)]
pub enum ApiError {
    /// The collection segment does not name a registered record type
    #[error("unknown collection '{0}'")]
    UnknownCollection(String),

    /// The payload failed schema validation
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The document store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::UnknownCollection(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Store(StoreError::Unavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(StoreError::Write(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_status_codes() {
        let unknown = ApiError::UnknownCollection("widget".to_string());
        assert_eq!(unknown.status_code(), StatusCode::NOT_FOUND);

        let invalid = ApiError::Validation(ValidationError {
            type_name: "Risk".to_string(),
            violations: vec!["missing required field 'title'".to_string()],
        });
        assert_eq!(invalid.status_code(), StatusCode::UNPROCESSABLE_ENTITY);

        let unavailable = ApiError::Store(StoreError::Unavailable("offline".to_string()));
        assert_eq!(unavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);

        let write = ApiError::Store(StoreError::Write("disk full".to_string()));
        assert_eq!(write.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_messages_carry_context() {
        let unknown = ApiError::UnknownCollection("widget".to_string());
        assert_eq!(unknown.to_string(), "unknown collection 'widget'");

        let invalid = ApiError::Validation(ValidationError {
            type_name: "Risk".to_string(),
            violations: vec!["missing required field 'title'".to_string()],
        });
        assert_eq!(
            invalid.to_string(),
            "validation failed for Risk: missing required field 'title'"
        );
    }

    #[tokio::test]
    async fn test_response_body_shape() {
        let response = ApiError::UnknownCollection("widget".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "unknown collection 'widget'");
    }
}
