use crate::application::upstream::ApiError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not logged in")]
    NotLoggedIn,

    #[error("{0}")]
    Validation(String),

    #[error("Upstream request failed")]
    Upstream(#[source] ApiError),

    #[error("Response encoding failed")]
    Encoding,
}

impl From<ApiError> for AppError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => AppError::NotLoggedIn,
            ApiError::Rejected(message) => AppError::Validation(message),
            other => AppError::Upstream(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::NotLoggedIn => StatusCode::UNAUTHORIZED,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Upstream(e) => {
                tracing::error!("Upstream failure: {}", e);
                StatusCode::BAD_GATEWAY
            }
            AppError::Encoding => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(serde_json::json!({ "message": self.to_string() }))).into_response()
    }
}
