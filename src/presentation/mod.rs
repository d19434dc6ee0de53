// Presentation layer - HTTP routes over the application services
pub mod app_state;
pub mod error;
pub mod handlers;

use crate::presentation::app_state::AppState;
use axum::{
    Router,
    routing::{get, post, put},
};
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health_check))
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/dashboard/stream", get(handlers::stream_dashboard))
        .route("/trend", get(handlers::get_trend))
        .route("/login", post(handlers::login))
        .route("/signup", post(handlers::signup))
        .route("/profile", put(handlers::update_profile))
        .route("/profile/password", put(handlers::change_password))
        .route("/auth/google", get(handlers::google_login))
        .route("/oauth-success", get(handlers::oauth_success))
        .with_state(state)
}
