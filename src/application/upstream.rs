// Traits for the upstream auth/data API
use crate::domain::account::{Credentials, PasswordChange, ProfileUpdate, UserProfile};
use crate::domain::air_quality::AirRecord;
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, invalid, or expired bearer token
    #[error("unauthorized")]
    Unauthorized,

    /// Upstream refused the request with a user-facing message (HTTP 400)
    #[error("{0}")]
    Rejected(String),

    #[error("upstream returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request to upstream failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected upstream payload: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Read side: the protected data endpoint and the caller's profile
#[async_trait]
pub trait AirDataSource: Send + Sync {
    /// `GET /api/airdata`, in API order
    async fn fetch_records(&self, token: &str) -> ApiResult<Vec<AirRecord>>;

    /// `GET /api/user`; `None` when upstream answers with `null`
    async fn fetch_profile(&self, token: &str) -> ApiResult<Option<UserProfile>>;
}

/// Write side: credential and profile management
#[async_trait]
pub trait AccountApi: Send + Sync {
    /// Returns the issued bearer token
    async fn login(&self, credentials: &Credentials) -> ApiResult<String>;

    /// Returns the upstream confirmation message
    async fn signup(&self, credentials: &Credentials) -> ApiResult<String>;

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> ApiResult<UserProfile>;

    async fn change_password(&self, token: &str, change: &PasswordChange) -> ApiResult<String>;

    fn google_login_url(&self) -> String;
}
