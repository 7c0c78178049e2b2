use serde::{Deserialize, Serialize};

/// Direction of one waterfall step, taken from the sign of the originating
/// delta (zero counts as positive), never from the running totals. The
/// rendering surface uses it to pick a fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepDirection {
    Positive,
    Negative,
}

/// One floating bar of a cumulative cash-flow bridge: the running total
/// before the step and after it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaterfallPoint {
    pub label: String,
    pub start: f64,
    pub end: f64,
    pub direction: StepDirection,
}
