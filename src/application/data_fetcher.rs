// Data fetcher - Loads records and profile for an authenticated caller
use crate::application::auth_context::AuthContext;
use crate::application::upstream::{AirDataSource, ApiError};
use crate::domain::account::UserProfile;
use crate::domain::air_quality::AirRecord;
use std::sync::Arc;

pub const DEFAULT_RECORD_LIMIT: usize = 20;

#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome<T> {
    Loaded(T),
    NotLoggedIn,
}

impl<T> FetchOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> FetchOutcome<U> {
        match self {
            FetchOutcome::Loaded(value) => FetchOutcome::Loaded(f(value)),
            FetchOutcome::NotLoggedIn => FetchOutcome::NotLoggedIn,
        }
    }

    #[cfg(test)]
    pub fn loaded(self) -> Option<T> {
        match self {
            FetchOutcome::Loaded(value) => Some(value),
            FetchOutcome::NotLoggedIn => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AirSnapshot {
    pub records: Vec<AirRecord>,
    pub profile: Option<UserProfile>,
}

#[derive(Clone)]
pub struct DataFetcher {
    source: Arc<dyn AirDataSource>,
    record_limit: usize,
}

impl DataFetcher {
    pub fn new(source: Arc<dyn AirDataSource>, record_limit: usize) -> Self {
        Self {
            source,
            record_limit,
        }
    }

    /// Fetch records and profile concurrently.
    ///
    /// A missing token skips both requests. A failure of either request ends
    /// the session: the token is cleared and the caller sees `NotLoggedIn`.
    pub async fn fetch(&self, auth: &AuthContext) -> FetchOutcome<AirSnapshot> {
        let Some(token) = auth.token() else {
            tracing::debug!("No token in auth context, skipping fetch");
            return FetchOutcome::NotLoggedIn;
        };

        let (records, profile) = tokio::join!(
            self.source.fetch_records(&token),
            self.source.fetch_profile(&token)
        );

        match (records, profile) {
            (Ok(records), Ok(profile)) => FetchOutcome::Loaded(AirSnapshot {
                records: self.cap(records),
                profile,
            }),
            (records, profile) => {
                if let Err(e) = records {
                    self.end_session(auth, "records", &e);
                }
                if let Err(e) = profile {
                    self.end_session(auth, "profile", &e);
                }
                FetchOutcome::NotLoggedIn
            }
        }
    }

    pub async fn records(&self, auth: &AuthContext) -> FetchOutcome<Vec<AirRecord>> {
        let Some(token) = auth.token() else {
            return FetchOutcome::NotLoggedIn;
        };

        match self.source.fetch_records(&token).await {
            Ok(records) => FetchOutcome::Loaded(self.cap(records)),
            Err(e) => {
                self.end_session(auth, "records", &e);
                FetchOutcome::NotLoggedIn
            }
        }
    }

    pub async fn profile(&self, auth: &AuthContext) -> FetchOutcome<Option<UserProfile>> {
        let Some(token) = auth.token() else {
            return FetchOutcome::NotLoggedIn;
        };

        match self.source.fetch_profile(&token).await {
            Ok(profile) => FetchOutcome::Loaded(profile),
            Err(e) => {
                self.end_session(auth, "profile", &e);
                FetchOutcome::NotLoggedIn
            }
        }
    }

    fn cap(&self, mut records: Vec<AirRecord>) -> Vec<AirRecord> {
        if records.len() > self.record_limit {
            tracing::debug!(
                "Upstream returned {} records, keeping first {}",
                records.len(),
                self.record_limit
            );
            records.truncate(self.record_limit);
        }
        records
    }

    fn end_session(&self, auth: &AuthContext, what: &str, error: &ApiError) {
        if error.is_unauthorized() {
            tracing::debug!("Upstream rejected token while fetching {}", what);
        } else {
            tracing::warn!("Fetching {} failed: {}", what, error);
        }
        auth.log_out();
    }
}
