//! Trend analyzer - descriptive statistics and a linear AQI forecast.
//!
//! Every function here is total: empty or degenerate input yields zeros,
//! never an error or NaN.

use crate::domain::air_quality::AirRecord;
use crate::domain::trend::{ForecastPoint, RegressionResult, TrendReport};
use std::collections::BTreeMap;

/// Mean AQI over all records, 0 when there are none
pub fn average_aqi(records: &[AirRecord]) -> f64 {
    let values: Vec<f64> = records.iter().map(|r| r.aqi).collect();
    mean(&values)
}

/// Arithmetic mean, 0 for an empty slice.
///
/// A sum that overflows is redone on values divided by the largest
/// magnitude, so the mean of finite values stays finite.
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f64;
    let total: f64 = values.iter().sum();
    if total.is_finite() {
        return total / n;
    }
    let scale = max_magnitude(values);
    scale * (values.iter().map(|v| v / scale).sum::<f64>() / n)
}

fn max_magnitude(values: &[f64]) -> f64 {
    values.iter().fold(0.0, |acc, v| acc.max(v.abs()))
}

/// Highest PM2.5 reading, 0 when there are none
pub fn max_pm25(records: &[AirRecord]) -> f64 {
    records
        .iter()
        .map(|r| r.pm25)
        .reduce(f64::max)
        .unwrap_or(0.0)
}

/// AQI readings grouped by calendar year, years ascending.
///
/// Records without a parseable date are dropped; `analyze` reports how many.
pub fn year_bucket(records: &[AirRecord]) -> BTreeMap<i32, Vec<f64>> {
    let mut buckets: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for record in records {
        if let Some(year) = record.year() {
            buckets.entry(year).or_default().push(record.aqi);
        }
    }
    buckets
}

/// Mean AQI per year, in ascending year order
pub fn yearly_average(buckets: &BTreeMap<i32, Vec<f64>>) -> Vec<f64> {
    buckets
        .values()
        .map(|values| mean(values))
        .collect()
}

/// Ordinary least squares over `(i, values[i])` for `i = 0..n`.
///
/// The fit runs on values divided by their largest magnitude and is scaled
/// back afterwards, so the squared deviations cannot overflow.
pub fn fit_linear_regression(values: &[f64]) -> RegressionResult {
    match values {
        [] => return RegressionResult::new(0.0, 0.0, 0.0),
        [only] => return RegressionResult::new(0.0, *only, 0.0),
        _ => {}
    }

    let scale = max_magnitude(values);
    if scale == 0.0 {
        return RegressionResult::new(0.0, 0.0, 1.0);
    }
    let values: Vec<f64> = values.iter().map(|v| v / scale).collect();

    let n = values.len() as f64;
    let sum_x: f64 = (0..values.len()).map(|i| i as f64).sum();
    let sum_y: f64 = values.iter().sum();
    let sum_xy: f64 = values.iter().enumerate().map(|(i, &y)| i as f64 * y).sum();
    let sum_x2: f64 = (0..values.len()).map(|i| (i * i) as f64).sum();

    // x is 0..n-1, so for n >= 2 the denominator is n^2(n^2-1)/12 > 0
    let slope = (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x);
    let intercept = (sum_y - slope * sum_x) / n;

    let mean_y = sum_y / n;
    let ss_tot: f64 = values.iter().map(|&y| (y - mean_y).powi(2)).sum();
    let ss_res: f64 = values
        .iter()
        .enumerate()
        .map(|(i, &y)| (y - (slope * i as f64 + intercept)).powi(2))
        .sum();

    let r2 = if ss_tot == 0.0 {
        if ss_res == 0.0 { 1.0 } else { 0.0 }
    } else {
        1.0 - ss_res / ss_tot
    };

    RegressionResult::new(slope * scale, intercept * scale, r2)
}

/// Predictions for the `horizon` indices that follow `base_index` fitted points.
///
/// Step 1 lands on index `base_index`, the first position after the history.
pub fn forecast(regression: &RegressionResult, horizon: usize, base_index: usize) -> Vec<f64> {
    (1..=horizon)
        .map(|step| regression.predict_at((base_index + step - 1) as f64))
        .collect()
}

/// Percent change from the first to the last yearly average
pub fn growth_rate(yearly_averages: &[f64]) -> f64 {
    match yearly_averages {
        [first, .., last] if *first != 0.0 => (last - first) / first * 100.0,
        _ => 0.0,
    }
}

/// Regression line evaluated at each historical index
pub fn fitted_line(regression: &RegressionResult, len: usize) -> Vec<f64> {
    (0..len).map(|i| regression.predict_at(i as f64)).collect()
}

/// Last yearly average carried forward by one slope step
pub fn predicted_next(yearly_averages: &[f64], regression: &RegressionResult) -> f64 {
    yearly_averages
        .last()
        .map(|last| last + regression.slope)
        .unwrap_or(0.0)
}

/// Full analysis of one record batch
pub fn analyze(records: &[AirRecord], horizon: usize) -> TrendReport {
    let buckets = year_bucket(records);
    let undated_records = records.len() - buckets.values().map(Vec::len).sum::<usize>();
    if undated_records > 0 {
        tracing::debug!("Dropped {} records without a readable date", undated_records);
    }

    let years: Vec<i32> = buckets.keys().copied().collect();
    let yearly_averages = yearly_average(&buckets);
    let regression = fit_linear_regression(&yearly_averages);
    let base_index = yearly_averages.len();

    let forecast_points = forecast(&regression, horizon, base_index)
        .into_iter()
        .enumerate()
        .map(|(i, value)| ForecastPoint::new(i + 1, base_index + i, value))
        .collect();

    TrendReport {
        record_count: records.len(),
        average_aqi: average_aqi(records),
        max_pm25: max_pm25(records),
        growth_rate: growth_rate(&yearly_averages),
        predicted_next: predicted_next(&yearly_averages, &regression),
        fitted: fitted_line(&regression, base_index),
        years,
        yearly_averages,
        regression,
        forecast: forecast_points,
        undated_records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const EPS: f64 = 1e-9;

    fn rec(date: &str, aqi: f64, pm25: f64) -> AirRecord {
        AirRecord::new(NaiveDate::parse_from_str(date, "%Y-%m-%d").ok(), aqi, pm25)
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_average_within_bounds() {
        let records = vec![
            rec("2020-01-01", 42.0, 10.0),
            rec("2020-02-01", 97.5, 10.0),
            rec("2020-03-01", 63.0, 10.0),
            rec("2020-04-01", 151.0, 10.0),
        ];
        let avg = average_aqi(&records);
        assert!((42.0..=151.0).contains(&avg));
        assert_close(avg, 88.375);
    }

    #[test]
    fn test_empty_statistics_are_zero() {
        assert_eq!(average_aqi(&[]), 0.0);
        assert_eq!(max_pm25(&[]), 0.0);
        assert!(year_bucket(&[]).is_empty());
        assert!(yearly_average(&BTreeMap::new()).is_empty());
    }

    #[test]
    fn test_max_pm25() {
        let records = vec![
            rec("2020-01-01", 1.0, 12.5),
            rec("2020-01-02", 1.0, 48.0),
            rec("2020-01-03", 1.0, 7.0),
        ];
        assert_eq!(max_pm25(&records), 48.0);
    }

    #[test]
    fn test_year_bucket_drops_undated() {
        let records = vec![
            rec("2021-06-01", 70.0, 0.0),
            rec("2020-01-01", 60.0, 0.0),
            rec("not-a-date", 999.0, 0.0),
            rec("2021-01-01", 90.0, 0.0),
        ];
        let buckets = year_bucket(&records);

        assert_eq!(buckets.keys().copied().collect::<Vec<_>>(), vec![2020, 2021]);
        assert_eq!(buckets[&2021], vec![70.0, 90.0]);
        assert_eq!(yearly_average(&buckets), vec![60.0, 80.0]);
    }

    #[test]
    fn test_regression_degenerate_cases() {
        assert_eq!(fit_linear_regression(&[]), RegressionResult::new(0.0, 0.0, 0.0));

        let single = fit_linear_regression(&[42.0]);
        assert_eq!(single.slope, 0.0);
        assert_eq!(single.intercept, 42.0);
    }

    #[test]
    fn test_regression_perfect_line() {
        let fit = fit_linear_regression(&[10.0, 20.0, 30.0, 40.0]);
        assert_close(fit.slope, 10.0);
        assert_close(fit.intercept, 10.0);
        assert_close(fit.r2, 1.0);

        assert_eq!(forecast(&fit, 1, 4).len(), 1);
        assert_close(forecast(&fit, 1, 4)[0], 50.0);
    }

    #[test]
    fn test_regression_constant_values() {
        let fit = fit_linear_regression(&[55.0, 55.0, 55.0]);
        assert_close(fit.slope, 0.0);
        assert_close(fit.intercept, 55.0);
        assert_eq!(fit.r2, 1.0);
        assert!(!fit.r2.is_nan());
    }

    #[test]
    fn test_regression_noisy_fit() {
        let fit = fit_linear_regression(&[1.0, 3.0, 2.0, 5.0, 4.0]);
        assert_close(fit.slope, 0.8);
        assert_close(fit.intercept, 1.4);
        assert_close(fit.r2, 0.64);
    }

    #[test]
    fn test_huge_readings_stay_finite() {
        let records = vec![rec("2020-01-01", 1e308, 0.0), rec("2021-01-01", 1e308, 0.0)];
        let avg = average_aqi(&records);
        assert!(avg.is_finite());
        assert_eq!(avg, 1e308);
        assert_eq!(yearly_average(&year_bucket(&records)), vec![1e308, 1e308]);

        let mixed = vec![rec("2020-01-01", 1.5e308, 0.0), rec("2020-01-02", 0.5e308, 0.0)];
        let avg = average_aqi(&mixed);
        assert!((0.5e308..=1.5e308).contains(&avg));
    }

    #[test]
    fn test_regression_on_huge_values() {
        let fit = fit_linear_regression(&[1e200, 3e200, 2e200]);
        assert!(fit.r2.is_finite());
        assert_close(fit.r2, 0.25);
        assert!((fit.slope / (1e200 / 6.0) - 1.0).abs() < EPS);
        assert!((fit.intercept / 0.5e200 - 1.0).abs() < EPS);
    }

    #[test]
    fn test_regression_all_zero() {
        assert_eq!(fit_linear_regression(&[0.0, 0.0]), RegressionResult::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn test_growth_rate() {
        assert_close(growth_rate(&[50.0, 55.0]), 10.0);
        assert_eq!(growth_rate(&[50.0]), 0.0);
        assert_eq!(growth_rate(&[]), 0.0);
        assert_eq!(growth_rate(&[0.0, 30.0]), 0.0);
        assert_close(growth_rate(&[80.0, 120.0, 60.0]), -25.0);
    }

    #[test]
    fn test_analyze_empty_is_all_zero() {
        let report = analyze(&[], 3);

        assert_eq!(report.record_count, 0);
        assert_eq!(report.average_aqi, 0.0);
        assert_eq!(report.max_pm25, 0.0);
        assert_eq!(report.growth_rate, 0.0);
        assert_eq!(report.predicted_next, 0.0);
        assert_eq!(report.regression, RegressionResult::default());
        assert!(report.fitted.is_empty());
        assert!(report.forecast.iter().all(|p| p.value == 0.0));
    }

    #[test]
    fn test_analyze_three_years() {
        let records = vec![
            rec("2020-01-01", 80.0, 30.0),
            rec("2021-01-01", 90.0, 40.0),
            rec("2022-01-01", 100.0, 50.0),
        ];
        let report = analyze(&records, 3);

        assert_eq!(report.years, vec![2020, 2021, 2022]);
        assert_eq!(report.yearly_averages, vec![80.0, 90.0, 100.0]);
        assert_close(report.regression.slope, 10.0);
        assert_close(report.regression.intercept, 80.0);
        assert_close(report.average_aqi, 90.0);
        assert_eq!(report.max_pm25, 50.0);
        assert_close(report.growth_rate, 25.0);
        assert_close(report.predicted_next, 110.0);

        let values: Vec<f64> = report.forecast.iter().map(|p| p.value).collect();
        assert_eq!(values.len(), 3);
        assert_close(values[0], 110.0);
        assert_close(values[1], 120.0);
        assert_close(values[2], 130.0);
        assert_eq!(report.forecast[0].label, "+1");
        assert_eq!(report.forecast[2].index, 5);
    }

    #[test]
    fn test_analyze_counts_undated() {
        let records = vec![rec("2020-01-01", 80.0, 30.0), rec("garbage", 10.0, 90.0)];
        let report = analyze(&records, 1);

        assert_eq!(report.undated_records, 1);
        assert_eq!(report.years, vec![2020]);
        // undated records still count towards the overall statistics
        assert_close(report.average_aqi, 45.0);
        assert_eq!(report.max_pm25, 90.0);
    }
}
