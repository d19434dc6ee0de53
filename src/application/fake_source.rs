// In-memory upstream used by unit tests
use crate::application::upstream::{AirDataSource, ApiError, ApiResult};
use crate::domain::account::UserProfile;
use crate::domain::air_quality::AirRecord;
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub struct FakeSource {
    records: Option<Vec<AirRecord>>,
    profile: Option<UserProfile>,
    reject_profile: bool,
    records_delay: Option<Duration>,
    calls: AtomicUsize,
}

impl FakeSource {
    pub fn ok(records: Vec<AirRecord>) -> Self {
        Self {
            records: Some(records),
            profile: Some(UserProfile {
                name: Some("Test User".to_string()),
                email: Some("test@example.com".to_string()),
                ..UserProfile::default()
            }),
            reject_profile: false,
            records_delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn reject_records(mut self) -> Self {
        self.records = None;
        self
    }

    pub fn reject_profile(mut self) -> Self {
        self.reject_profile = true;
        self
    }

    pub fn delay_records(mut self, delay: Duration) -> Self {
        self.records_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AirDataSource for FakeSource {
    async fn fetch_records(&self, _token: &str) -> ApiResult<Vec<AirRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.records_delay {
            tokio::time::sleep(delay).await;
        }
        self.records.clone().ok_or(ApiError::Unauthorized)
    }

    async fn fetch_profile(&self, _token: &str) -> ApiResult<Option<UserProfile>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.reject_profile {
            return Err(ApiError::Unauthorized);
        }
        Ok(self.profile.clone())
    }
}
