// Application layer - Use cases and the seams to the upstream API
pub mod account_service;
pub mod auth_context;
pub mod dashboard_service;
pub mod data_fetcher;
pub mod streaming_service;
pub mod trend_analyzer;
pub mod upstream;

#[cfg(test)]
pub mod fake_source;
