use crate::models::{StepDirection, WaterfallPoint};

/// Convert a sequence of signed deltas into the floating bars of a
/// cumulative cash-flow bridge.
///
/// Strict left-to-right fold carrying the running total: each bar starts
/// where the previous one ended, beginning at 0. Every step depends on the
/// one before it, so there is no parallel formulation. Labels and deltas are
/// zipped pairwise; a length mismatch truncates to the shorter.
pub fn bridge(labels: &[String], deltas: &[f64]) -> Vec<WaterfallPoint> {
    labels
        .iter()
        .zip(deltas.iter())
        .scan(0.0_f64, |total, (label, &delta)| {
            let start = *total;
            let end = start + delta;
            *total = end;
            Some(WaterfallPoint {
                label: label.clone(),
                start,
                end,
                direction: if delta >= 0.0 {
                    StepDirection::Positive
                } else {
                    StepDirection::Negative
                },
            })
        })
        .collect()
}
