// Account service - Login, signup and profile changes against the upstream API
use crate::application::auth_context::AuthContext;
use crate::application::data_fetcher::{DataFetcher, FetchOutcome};
use crate::application::upstream::{AccountApi, ApiError, ApiResult};
use crate::domain::account::{Credentials, PasswordChange, ProfileUpdate, UserProfile};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInfo {
    pub token: String,
    pub profile: Option<UserProfile>,
}

#[derive(Clone)]
pub struct AccountService {
    api: Arc<dyn AccountApi>,
    fetcher: DataFetcher,
}

impl AccountService {
    pub fn new(api: Arc<dyn AccountApi>, fetcher: DataFetcher) -> Self {
        Self { api, fetcher }
    }

    pub async fn login(&self, credentials: &Credentials) -> ApiResult<SessionInfo> {
        require_credentials(credentials)?;
        let token = self.api.login(credentials).await?;
        tracing::debug!("Login succeeded for {}", credentials.email);
        Ok(SessionInfo {
            token,
            profile: None,
        })
    }

    pub async fn signup(&self, credentials: &Credentials) -> ApiResult<String> {
        require_credentials(credentials)?;
        self.api.signup(credentials).await
    }

    pub async fn update_profile(
        &self,
        auth: &AuthContext,
        update: &ProfileUpdate,
    ) -> ApiResult<UserProfile> {
        let token = auth.token().ok_or(ApiError::Unauthorized)?;
        self.api
            .update_profile(&token, update)
            .await
            .inspect_err(|e| end_session_on_401(auth, e))
    }

    pub async fn change_password(
        &self,
        auth: &AuthContext,
        change: &PasswordChange,
    ) -> ApiResult<String> {
        let token = auth.token().ok_or(ApiError::Unauthorized)?;
        if change.new_password.is_empty() {
            return Err(ApiError::Rejected("New password must not be empty".to_string()));
        }
        self.api
            .change_password(&token, change)
            .await
            .inspect_err(|e| end_session_on_401(auth, e))
    }

    /// Accept a token handed back by the OAuth redirect once upstream
    /// confirms it belongs to a user.
    pub async fn complete_oauth(&self, token: &str) -> FetchOutcome<SessionInfo> {
        let auth = AuthContext::with_token(token);
        match self.fetcher.profile(&auth).await {
            FetchOutcome::Loaded(profile) => match auth.token() {
                Some(token) => FetchOutcome::Loaded(SessionInfo { token, profile }),
                None => FetchOutcome::NotLoggedIn,
            },
            FetchOutcome::NotLoggedIn => FetchOutcome::NotLoggedIn,
        }
    }

    pub fn google_login_url(&self) -> String {
        self.api.google_login_url()
    }
}

fn require_credentials(credentials: &Credentials) -> ApiResult<()> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(ApiError::Rejected(
            "Please enter email and password".to_string(),
        ));
    }
    Ok(())
}

fn end_session_on_401(auth: &AuthContext, error: &ApiError) {
    if error.is_unauthorized() {
        auth.log_out();
    }
}
