// HTTP request handlers
use crate::application::account_service::SessionInfo;
use crate::application::auth_context::AuthContext;
use crate::application::data_fetcher::FetchOutcome;
use crate::domain::account::{Credentials, PasswordChange, ProfileUpdate, UserProfile};
use crate::infrastructure::chunked_json::stream_from_receiver;
use crate::infrastructure::config::MAX_FORECAST_HORIZON;
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use crate::presentation::error::AppError;
use axum::{
    Json,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct HorizonQuery {
    pub horizon: Option<usize>,
}

#[derive(Deserialize)]
pub struct OAuthQuery {
    pub token: Option<String>,
}

fn auth_from(headers: &HeaderMap) -> AuthContext {
    AuthContext::from_authorization(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok()),
    )
}

fn check_horizon(horizon: Option<usize>) -> Result<Option<usize>, AppError> {
    match horizon {
        Some(h) if !(1..=MAX_FORECAST_HORIZON).contains(&h) => Err(AppError::Validation(format!(
            "horizon must be between 1 and {}",
            MAX_FORECAST_HORIZON
        ))),
        other => Ok(other),
    }
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Full dashboard: profile, tiles and trend chart
pub async fn get_dashboard(
    Query(query): Query<HorizonQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let horizon = check_horizon(query.horizon)?;
    let auth = auth_from(&headers);

    match state.dashboard_service.get_dashboard(&auth, horizon).await {
        FetchOutcome::Loaded(dashboard) => json_response(&dashboard, StatusCode::OK, accepts_brotli(&headers))
            .await
            .map_err(|_| AppError::Encoding),
        FetchOutcome::NotLoggedIn => Err(AppError::NotLoggedIn),
    }
}

/// Raw trend report without widget layout
pub async fn get_trend(
    Query(query): Query<HorizonQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let horizon = check_horizon(query.horizon)?;
    let auth = auth_from(&headers);

    match state.dashboard_service.get_trend(&auth, horizon).await {
        FetchOutcome::Loaded(report) => json_response(&report, StatusCode::OK, accepts_brotli(&headers))
            .await
            .map_err(|_| AppError::Encoding),
        FetchOutcome::NotLoggedIn => Err(AppError::NotLoggedIn),
    }
}

/// Stream the dashboard progressively
pub async fn stream_dashboard(
    Query(query): Query<HorizonQuery>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> Result<Response, AppError> {
    let horizon = check_horizon(query.horizon)?;
    let auth = auth_from(&headers);
    if !auth.is_logged_in() {
        return Err(AppError::NotLoggedIn);
    }

    let rx = state.streaming_service.stream_dashboard(auth, horizon).await;
    Ok(stream_from_receiver(rx, accepts_brotli(&headers)).await.into_response())
}

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<SessionInfo>, AppError> {
    Ok(Json(state.account_service.login(&credentials).await?))
}

pub async fn signup(
    State(state): State<Arc<AppState>>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<Value>, AppError> {
    let message = state.account_service.signup(&credentials).await?;
    Ok(Json(json!({ "message": message })))
}

pub async fn update_profile(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<UserProfile>, AppError> {
    let auth = auth_from(&headers);
    Ok(Json(state.account_service.update_profile(&auth, &update).await?))
}

pub async fn change_password(
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    Json(change): Json<PasswordChange>,
) -> Result<Json<Value>, AppError> {
    let auth = auth_from(&headers);
    let message = state.account_service.change_password(&auth, &change).await?;
    Ok(Json(json!({ "message": message })))
}

/// Hand the browser over to the upstream Google login
pub async fn google_login(State(state): State<Arc<AppState>>) -> Redirect {
    Redirect::temporary(&state.account_service.google_login_url())
}

/// Landing point for the OAuth redirect carrying `?token=`
pub async fn oauth_success(
    Query(query): Query<OAuthQuery>,
    State(state): State<Arc<AppState>>,
) -> Result<Json<SessionInfo>, AppError> {
    let token = query.token.unwrap_or_default();
    match state.account_service.complete_oauth(&token).await {
        FetchOutcome::Loaded(session) => Ok(Json(session)),
        FetchOutcome::NotLoggedIn => Err(AppError::NotLoggedIn),
    }
}
