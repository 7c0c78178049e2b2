use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::WaterfallPoint;

/// The closed set of chart kinds the dashboard knows how to render. String
/// dispatch goes through [`ChartKind::from_str`]; an unknown key is a hard
/// error, never a silent fall-through.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    LineChart,
    BarChart,
    Doughnut,
    Waterfall,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown chart kind: {0}")]
pub struct UnknownChartKind(pub String);

impl ChartKind {
    /// Wire key used in the `/analyze` response.
    pub fn key(&self) -> &'static str {
        match self {
            ChartKind::LineChart => "line_chart",
            ChartKind::BarChart => "bar_chart",
            ChartKind::Doughnut => "doughnut",
            ChartKind::Waterfall => "waterfall",
        }
    }
}

impl FromStr for ChartKind {
    type Err = UnknownChartKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "line" | "line_chart" => Ok(ChartKind::LineChart),
            "bar" | "bar_chart" => Ok(ChartKind::BarChart),
            "doughnut" => Ok(ChartKind::Doughnut),
            "waterfall" => Ok(ChartKind::Waterfall),
            other => Err(UnknownChartKind(other.to_string())),
        }
    }
}

/// One chart in the `/analyze` response. For waterfall charts `values` holds
/// the raw signed deltas and `points` the derived running-total bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub title: String,
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<WaterfallPoint>>,
}

/// Big-number KPIs for an uploaded spreadsheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadKpis {
    pub total_revenue: f64,
    pub row_count: usize,
}

/// Deterministic narrative summary attached to an analysis result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    pub short_insights: Vec<String>,
    pub paragraph: String,
}

/// Response body of `POST /analyze`.
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeResponse {
    pub kpis: UploadKpis,
    pub charts: BTreeMap<ChartKind, ChartSeries>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<AiAnalysis>,
}
