use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde_json::json;

use crate::auth::AuthError;
use crate::db::StoreError;

/// Error envelope returned by every failing endpoint.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
}

impl ApiError {
    /// Create a new ApiError with a message and status code
    pub fn new<S: ToString>(message: S, status_code: StatusCode) -> Self {
        Self {
            message: message.to_string(),
            status_code,
        }
    }

    /// Create new Bad Request Error (400) with a message
    pub fn bad_request<S: ToString>(message: S) -> Self {
        Self::new(message, StatusCode::BAD_REQUEST)
    }

    /// Create new Not Found Error (404) with a message
    pub fn not_found<S: ToString>(message: S) -> Self {
        Self::new(message, StatusCode::NOT_FOUND)
    }

    /// Create new Unprocessable Entity Error (422) with a message
    pub fn unprocessable<S: ToString>(message: S) -> Self {
        Self::new(message, StatusCode::UNPROCESSABLE_ENTITY)
    }

    /// Create new Internal Server Error (500) with a message
    pub fn internal<S: ToString>(message: S) -> Self {
        Self::new(message, StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status_code = self.status_code;
        let body = json!({
            "success": false,
            "error": status_code.as_u16(),
            "message": self.message,
        });
        (status_code, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::new(err.to_string(), err.status_code())
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::not_found("drink not found"),
            StoreError::TitleTaken => Self::unprocessable(err),
            StoreError::Pool(_) | StoreError::Database(_) => {
                log::error!("storage failure: {}", err);
                Self::internal("unexpected storage failure")
            }
        }
    }
}
