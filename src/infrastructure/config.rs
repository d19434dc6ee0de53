use crate::application::data_fetcher::DEFAULT_RECORD_LIMIT;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origin allowed by CORS, where the browser dashboard is served from
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_record_limit")]
    pub record_limit: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AnalyticsSettings {
    #[serde(default = "default_forecast_horizon")]
    pub forecast_horizon: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_frontend_url() -> String {
    "http://localhost:3001".to_string()
}

fn default_base_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_record_limit() -> usize {
    DEFAULT_RECORD_LIMIT
}

fn default_forecast_horizon() -> usize {
    3
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_url: default_frontend_url(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            record_limit: default_record_limit(),
        }
    }
}

impl Default for AnalyticsSettings {
    fn default() -> Self {
        Self {
            forecast_horizon: default_forecast_horizon(),
        }
    }
}

impl ServerSettings {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load `config/dashboard.*`, overridden by `AQ_DASHBOARD__SECTION__KEY` variables
pub fn load_settings() -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(environment())
        .build()?;

    validate(settings.try_deserialize()?)
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("AQ_DASHBOARD")
        .separator("__")
        .try_parsing(true)
}

fn validate(settings: Settings) -> anyhow::Result<Settings> {
    if !(1..=DEFAULT_RECORD_LIMIT).contains(&settings.api.record_limit) {
        anyhow::bail!(
            "api.record_limit must be between 1 and {}",
            DEFAULT_RECORD_LIMIT
        );
    }
    if !(1..=MAX_FORECAST_HORIZON).contains(&settings.analytics.forecast_horizon) {
        anyhow::bail!(
            "analytics.forecast_horizon must be between 1 and {}",
            MAX_FORECAST_HORIZON
        );
    }
    Ok(settings)
}

pub const MAX_FORECAST_HORIZON: usize = 10;
