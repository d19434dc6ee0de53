// Infrastructure layer - External dependencies and adapters
pub mod api_client;
pub mod chunked_json;
pub mod config;
pub mod http_response;

#[cfg(test)]
pub mod stub_upstream;
