// Streaming dashboard service - Progressive loading over framed JSON
use crate::application::auth_context::AuthContext;
use crate::application::dashboard_service::{build_tiles, build_trend_chart, DASHBOARD_TITLE};
use crate::application::data_fetcher::{DataFetcher, FetchOutcome};
use crate::application::trend_analyzer;
use crate::domain::account::UserProfile;
use crate::domain::dashboard::display_name;
use crate::domain::trend::TrendReport;
use crate::domain::widgets::{ChartData, TileData};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileSkeleton {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub precision: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSkeleton {
    pub id: String,
    pub title: String,
    pub forecast_steps: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamMessage {
    Skeleton {
        title: String,
        tiles: Vec<TileSkeleton>,
        charts: Vec<ChartSkeleton>,
    },
    Profile {
        display_name: String,
        profile: Option<UserProfile>,
    },
    Analysis {
        tiles: Vec<TileData>,
        charts: Vec<ChartData>,
    },
    LoggedOut,
    Complete {
        widgets: usize,
        duration_ms: u64,
    },
}

#[derive(Clone)]
pub struct StreamingDashboardService {
    fetcher: DataFetcher,
    default_horizon: usize,
}

impl StreamingDashboardService {
    pub fn new(fetcher: DataFetcher, default_horizon: usize) -> Self {
        Self {
            fetcher,
            default_horizon,
        }
    }

    /// Skeleton first, then profile and analysis in whichever order the
    /// upstream answers, then a single completion message.
    pub async fn stream_dashboard(
        &self,
        auth: AuthContext,
        horizon: Option<usize>,
    ) -> mpsc::Receiver<StreamMessage> {
        let (tx, rx) = mpsc::channel(16);
        let start_time = Instant::now();
        let horizon = horizon.unwrap_or(self.default_horizon);

        // 1. Skeleton goes out before any upstream request
        let skeleton = build_skeleton(horizon);
        let total_widgets = match &skeleton {
            StreamMessage::Skeleton { tiles, charts, .. } => tiles.len() + charts.len(),
            _ => 0,
        };
        let _ = tx.send(skeleton).await;

        let logged_out = Arc::new(AtomicBool::new(false));

        // 2. Profile
        let profile_task = {
            let tx = tx.clone();
            let fetcher = self.fetcher.clone();
            let auth = auth.clone();
            let logged_out = logged_out.clone();
            tokio::spawn(async move {
                let msg = match fetcher.profile(&auth).await {
                    FetchOutcome::Loaded(profile) => StreamMessage::Profile {
                        display_name: display_name(profile.as_ref()),
                        profile,
                    },
                    FetchOutcome::NotLoggedIn => match announce_logout(&logged_out) {
                        Some(msg) => msg,
                        None => return,
                    },
                };
                let _ = tx.send(msg).await;
            })
        };

        // 3. Records and the analysis built on them
        let analysis_task = {
            let tx = tx.clone();
            let fetcher = self.fetcher.clone();
            let logged_out = logged_out.clone();
            tokio::spawn(async move {
                let msg = match fetcher.records(&auth).await {
                    FetchOutcome::Loaded(records) => {
                        let report = trend_analyzer::analyze(&records, horizon);
                        tracing::debug!(
                            "Analyzed {} records into {} yearly points",
                            report.record_count,
                            report.yearly_averages.len()
                        );
                        StreamMessage::Analysis {
                            tiles: build_tiles(&report),
                            charts: vec![build_trend_chart(&report)],
                        }
                    }
                    FetchOutcome::NotLoggedIn => match announce_logout(&logged_out) {
                        Some(msg) => msg,
                        None => return,
                    },
                };
                let _ = tx.send(msg).await;
            })
        };

        // 4. Completion once both fetches are done
        tokio::spawn(async move {
            let (profile_res, analysis_res) = tokio::join!(profile_task, analysis_task);
            if let Err(e) = profile_res.and(analysis_res) {
                tracing::error!("Dashboard stream task failed: {}", e);
            }

            let duration_ms = start_time.elapsed().as_millis() as u64;
            let _ = tx
                .send(StreamMessage::Complete {
                    widgets: total_widgets,
                    duration_ms,
                })
                .await;
        });

        rx
    }
}

fn announce_logout(flag: &AtomicBool) -> Option<StreamMessage> {
    (!flag.swap(true, Ordering::SeqCst)).then_some(StreamMessage::LoggedOut)
}

fn build_skeleton(horizon: usize) -> StreamMessage {
    let placeholder = TrendReport::default();

    let tiles = build_tiles(&placeholder)
        .into_iter()
        .map(|t| TileSkeleton {
            id: t.id,
            title: t.title,
            unit: t.unit,
            precision: t.precision,
        })
        .collect();

    let chart = build_trend_chart(&placeholder);
    let charts = vec![ChartSkeleton {
        id: chart.id,
        title: chart.title,
        forecast_steps: horizon,
    }];

    StreamMessage::Skeleton {
        title: DASHBOARD_TITLE.to_string(),
        tiles,
        charts,
    }
}
