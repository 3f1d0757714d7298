// ABOUTME: Shared API error response type and status mapping
// ABOUTME: Converts storage errors into JSON client/server error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json as ResponseJson},
};
use serde::Serialize;

use vault_storage::StorageError;

/// JSON body for error responses
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Wrapper converting storage errors to HTTP responses
pub struct ApiError(pub StorageError);

impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self.0 {
            StorageError::NotFound(_) => (StatusCode::NOT_FOUND, self.0.to_string()),
            StorageError::Validation(_) => (StatusCode::BAD_REQUEST, self.0.to_string()),
            StorageError::Sqlx(_) | StorageError::Migration(_) | StorageError::Io(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        (status, ResponseJson(ErrorResponse { error: message })).into_response()
    }
}
