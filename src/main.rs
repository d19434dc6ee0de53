// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::http::{HeaderValue, Method, header};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::application::account_service::AccountService;
use crate::application::dashboard_service::DashboardService;
use crate::application::data_fetcher::DataFetcher;
use crate::application::streaming_service::StreamingDashboardService;
use crate::infrastructure::api_client::HttpAuthApi;
use crate::infrastructure::config::load_settings;
use crate::presentation::app_state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "air_quality_dashboard=info,tower_http=info".into()),
        )
        .init();

    // Load configuration
    let settings = load_settings()?;

    // Upstream client (infrastructure layer)
    let api = Arc::new(HttpAuthApi::new(
        &settings.api.base_url,
        Duration::from_secs(settings.api.timeout_secs),
    )?);

    // Create services (application layer)
    let fetcher = DataFetcher::new(api.clone(), settings.api.record_limit);
    let horizon = settings.analytics.forecast_horizon;
    let state = Arc::new(AppState {
        dashboard_service: DashboardService::new(fetcher.clone(), horizon),
        streaming_service: StreamingDashboardService::new(fetcher.clone(), horizon),
        account_service: AccountService::new(api, fetcher),
    });

    let cors = CorsLayer::new()
        .allow_origin(
            settings
                .server
                .frontend_url
                .parse::<HeaderValue>()
                .context("server.frontend_url is not a valid origin")?,
        )
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true);

    // Build router (presentation layer)
    // Compression is handled in the response builders, so no CompressionLayer here
    let router = presentation::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = settings
        .server
        .bind_address()
        .parse()
        .context("Invalid server.host/server.port")?;
    tracing::info!(
        "Starting air-quality-dashboard on {} (upstream {})",
        addr,
        settings.api.base_url
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
