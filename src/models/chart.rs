use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use rocket_okapi::okapi::schemars;
use rocket_okapi::okapi::schemars::JsonSchema;

/// Uniform point shape for both chart widgets.
#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
pub struct ChartPoint {
    pub x: String,
    pub y: u64,
}

/// One day of the registration series.
#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
pub struct DailyRegistration {
    pub day: NaiveDate,
    pub count: u64,
}

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChartType {
    LineChart,
    PieChart,
}

impl ChartType {
    /// 0 selects the line chart; every other index falls back to the pie chart.
    pub fn from_index(index: i64) -> Self {
        if index == 0 {
            ChartType::LineChart
        } else {
            ChartType::PieChart
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub chart_type: ChartType,
    pub data: Vec<ChartPoint>,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChartSwitch {
    Right,
    Left,
}

#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyCount {
    pub month_year: String,
    pub count: u64,
}

#[derive(Debug, Serialize, Clone, PartialEq, JsonSchema)]
pub struct StatusBadge {
    pub status: String,
    pub color: String,
}
