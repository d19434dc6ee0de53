// Display widget models
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileData {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub value: f64,
    pub precision: i32,
    /// `value` rounded to `precision` with the unit appended
    pub display: String,
}

impl TileData {
    pub fn new(id: &str, title: &str, unit: Option<&str>, value: f64, precision: i32) -> Self {
        let mut tile = Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.map(str::to_string),
            value,
            precision,
            display: String::new(),
        };
        tile.display = tile.formatted();
        tile
    }

    /// Value rounded the way the dashboard prints it
    pub fn formatted(&self) -> String {
        let digits = self.precision.max(0) as usize;
        match &self.unit {
            Some(unit) => format!("{:.*}{}", digits, self.value, unit),
            None => format!("{:.*}", digits, self.value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesData {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub dashed: bool,
    /// One slot per chart label, `None` leaves a gap
    pub values: Vec<Option<f64>>,
}

impl SeriesData {
    pub fn new(id: &str, name: &str, color: Option<&str>, values: Vec<Option<f64>>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.map(str::to_string),
            dashed: false,
            values,
        }
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Line,
    MultiLine,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub id: String,
    pub title: String,
    pub unit: Option<String>,
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub series: Vec<SeriesData>,
}

impl ChartData {
    pub fn new(
        id: &str,
        title: &str,
        unit: Option<&str>,
        labels: Vec<String>,
        series: Vec<SeriesData>,
    ) -> Self {
        let kind = if series.len() > 1 {
            ChartKind::MultiLine
        } else {
            ChartKind::Line
        };
        Self {
            id: id.to_string(),
            title: title.to_string(),
            unit: unit.map(str::to_string),
            kind,
            labels,
            series,
        }
    }
}
