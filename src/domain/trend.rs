// Trend analysis results
use serde::Serialize;

/// Least-squares line over unit-spaced indices `0..n`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct RegressionResult {
    /// Change in AQI per index step
    pub slope: f64,
    /// Fitted value at index 0
    pub intercept: f64,
    pub r2: f64,
}

impl RegressionResult {
    pub fn new(slope: f64, intercept: f64, r2: f64) -> Self {
        Self {
            slope,
            intercept,
            r2,
        }
    }

    pub fn predict_at(&self, index: f64) -> f64 {
        self.slope * index + self.intercept
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub step: usize,
    pub index: usize,
    pub label: String,
    pub value: f64,
}

impl ForecastPoint {
    pub fn new(step: usize, index: usize, value: f64) -> Self {
        Self {
            step,
            index,
            label: format!("+{}", step),
            value,
        }
    }
}

/// Everything the dashboard displays, derived from one record batch
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub record_count: usize,
    pub average_aqi: f64,
    pub max_pm25: f64,
    pub years: Vec<i32>,
    pub yearly_averages: Vec<f64>,
    pub regression: RegressionResult,
    pub growth_rate: f64,
    pub predicted_next: f64,
    pub fitted: Vec<f64>,
    pub forecast: Vec<ForecastPoint>,
    pub undated_records: usize,
}
