// Air quality record domain model
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub struct AirRecord {
    pub date: Option<NaiveDate>,
    pub aqi: f64,
    pub pm25: f64,
}

impl AirRecord {
    pub fn new(date: Option<NaiveDate>, aqi: f64, pm25: f64) -> Self {
        Self { date, aqi, pm25 }
    }

    /// Build a record from an upstream document.
    ///
    /// Numeric fields that are missing or malformed become 0 and an
    /// unreadable date becomes `None`, so a bad document never aborts the
    /// batch it arrived in.
    pub fn from_json(doc: &Value) -> Self {
        Self::new(
            doc.get("date").and_then(parse_date),
            doc.get("aqi").map(coerce_number).unwrap_or(0.0),
            doc.get("pm25").map(coerce_number).unwrap_or(0.0),
        )
    }

    pub fn year(&self) -> Option<i32> {
        self.date.map(|d| d.year())
    }
}

fn coerce_number(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::String(s) => parse_date_str(s.trim()),
        Value::Number(n) => n
            .as_i64()
            .and_then(DateTime::from_timestamp_millis)
            .map(|dt| dt.date_naive()),
        // Mongo extended JSON: {"$date": "..."} or {"$date": {"$numberLong": "..."}}
        Value::Object(map) => match map.get("$date")? {
            Value::Object(inner) => inner
                .get("$numberLong")
                .and_then(Value::as_str)
                .and_then(|s| s.parse::<i64>().ok())
                .and_then(DateTime::from_timestamp_millis)
                .map(|dt| dt.date_naive()),
            other => parse_date(other),
        },
        _ => None,
    }
}

fn parse_date_str(s: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.date())
}
