use serde::{Deserialize, Serialize};

/// Headline figures derived from the daily sales series.
///
/// `average_transaction`, `peak_day` and `peak_value` are `None` exactly when
/// the input series is empty; they serialize as `null`, never as NaN or
/// infinity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub total_revenue: f64,
    pub total_transactions: usize,
    pub average_transaction: Option<f64>,
    pub peak_day: Option<String>,
    pub peak_value: Option<f64>,
}
