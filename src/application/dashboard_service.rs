// Dashboard service - Use case for building the air quality dashboard
use crate::application::auth_context::AuthContext;
use crate::application::data_fetcher::{DataFetcher, FetchOutcome};
use crate::application::trend_analyzer;
use crate::domain::account::UserProfile;
use crate::domain::dashboard::Dashboard;
use crate::domain::trend::TrendReport;
use crate::domain::widgets::{ChartData, SeriesData, TileData};

pub const DASHBOARD_TITLE: &str = "Air Quality Dashboard";
pub const TREND_CHART_ID: &str = "aqi_trend";

const HISTORY_COLOR: &str = "#f97316";
const REGRESSION_COLOR: &str = "#22c55e";
const FORECAST_COLOR: &str = "#38bdf8";

#[derive(Clone)]
pub struct DashboardService {
    fetcher: DataFetcher,
    default_horizon: usize,
}

impl DashboardService {
    pub fn new(fetcher: DataFetcher, default_horizon: usize) -> Self {
        Self {
            fetcher,
            default_horizon,
        }
    }

    pub async fn get_dashboard(
        &self,
        auth: &AuthContext,
        horizon: Option<usize>,
    ) -> FetchOutcome<Dashboard> {
        let horizon = horizon.unwrap_or(self.default_horizon);
        self.fetcher.fetch(auth).await.map(|snapshot| {
            let report = trend_analyzer::analyze(&snapshot.records, horizon);
            build_dashboard(snapshot.profile, &report)
        })
    }

    pub async fn get_trend(
        &self,
        auth: &AuthContext,
        horizon: Option<usize>,
    ) -> FetchOutcome<TrendReport> {
        let horizon = horizon.unwrap_or(self.default_horizon);
        self.fetcher
            .records(auth)
            .await
            .map(|records| trend_analyzer::analyze(&records, horizon))
    }
}

pub fn build_dashboard(profile: Option<UserProfile>, report: &TrendReport) -> Dashboard {
    Dashboard::new(
        DASHBOARD_TITLE.to_string(),
        profile,
        build_tiles(report),
        vec![build_trend_chart(report)],
    )
}

pub fn build_tiles(report: &TrendReport) -> Vec<TileData> {
    vec![
        TileData::new("avg_aqi", "Average AQI", None, report.average_aqi, 1),
        TileData::new("max_pm25", "Max PM2.5", None, report.max_pm25, 1),
        TileData::new("trend_slope", "Trend Slope (β₁)", None, report.regression.slope, 2),
        TileData::new("r2", "R² Value", None, report.regression.r2, 2),
        TileData::new("growth", "Growth %", Some("%"), report.growth_rate, 2),
        TileData::new(
            "predicted_next",
            "Predicted Next Year AQI",
            None,
            report.predicted_next,
            1,
        ),
    ]
}

/// History, regression line and forecast on one axis of year labels
/// followed by `+1..+h`.
pub fn build_trend_chart(report: &TrendReport) -> ChartData {
    let history_len = report.yearly_averages.len();
    let horizon = report.forecast.len();

    let labels: Vec<String> = report
        .years
        .iter()
        .map(|y| y.to_string())
        .chain(report.forecast.iter().map(|p| p.label.clone()))
        .collect();

    let history: Vec<Option<f64>> = report
        .yearly_averages
        .iter()
        .copied()
        .map(Some)
        .chain(std::iter::repeat_n(None, horizon))
        .collect();

    let regression: Vec<Option<f64>> = report
        .fitted
        .iter()
        .copied()
        .chain(report.forecast.iter().map(|p| p.value))
        .map(Some)
        .collect();

    let forecast: Vec<Option<f64>> = std::iter::repeat_n(None, history_len)
        .chain(report.forecast.iter().map(|p| Some(p.value)))
        .collect();

    ChartData::new(
        TREND_CHART_ID,
        "Pollution Trend + Forecast",
        Some("AQI"),
        labels,
        vec![
            SeriesData::new("history", "Yearly AQI Trend", Some(HISTORY_COLOR), history),
            SeriesData::new("regression", "Regression Line", Some(REGRESSION_COLOR), regression)
                .dashed(),
            SeriesData::new("forecast", "Forecast", Some(FORECAST_COLOR), forecast),
        ],
    )
}
