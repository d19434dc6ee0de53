// HTTP client for the upstream auth/data API
use crate::application::upstream::{AccountApi, AirDataSource, ApiError, ApiResult};
use crate::domain::account::{Credentials, PasswordChange, ProfileUpdate, UserProfile};
use crate::domain::air_quality::AirRecord;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    base_url: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenBody {
    token: String,
}

impl HttpAuthApi {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build upstream HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = request.send().await?;
        Self::read_json(response).await
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<MessageBody>(&body)
                .ok()
                .and_then(|b| b.message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());

            if status == StatusCode::BAD_REQUEST {
                return Err(ApiError::Rejected(message));
            }
            return Err(ApiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

#[async_trait]
impl AirDataSource for HttpAuthApi {
    async fn fetch_records(&self, token: &str) -> ApiResult<Vec<AirRecord>> {
        let docs: Vec<serde_json::Value> = self
            .send(self.client.get(self.url("/api/airdata")).bearer_auth(token))
            .await?;

        tracing::debug!("Fetched {} air quality documents", docs.len());
        Ok(docs.iter().map(AirRecord::from_json).collect())
    }

    async fn fetch_profile(&self, token: &str) -> ApiResult<Option<UserProfile>> {
        self.send(self.client.get(self.url("/api/user")).bearer_auth(token))
            .await
    }
}

#[async_trait]
impl AccountApi for HttpAuthApi {
    async fn login(&self, credentials: &Credentials) -> ApiResult<String> {
        let body: TokenBody = self
            .send(self.client.post(self.url("/api/login")).json(credentials))
            .await?;
        Ok(body.token)
    }

    async fn signup(&self, credentials: &Credentials) -> ApiResult<String> {
        let body: MessageBody = self
            .send(self.client.post(self.url("/api/signup")).json(credentials))
            .await?;
        Ok(body.message.unwrap_or_default())
    }

    async fn update_profile(&self, token: &str, update: &ProfileUpdate) -> ApiResult<UserProfile> {
        self.send(
            self.client
                .put(self.url("/api/user/update"))
                .bearer_auth(token)
                .json(update),
        )
        .await
    }

    async fn change_password(&self, token: &str, change: &PasswordChange) -> ApiResult<String> {
        let body: MessageBody = self
            .send(
                self.client
                    .put(self.url("/api/user/change-password"))
                    .bearer_auth(token)
                    .json(change),
            )
            .await?;
        Ok(body.message.unwrap_or_default())
    }

    fn google_login_url(&self) -> String {
        self.url("/auth/google")
    }
}
