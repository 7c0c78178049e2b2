use crate::models::{KpiSummary, LabeledSeries};

/// Derive the headline KPIs from the daily sales series.
///
/// Pure function of its input: calling it twice on the same series yields
/// identical results. An empty series is legal and produces the explicit
/// `None` markers rather than NaN.
pub fn summarize(series: &LabeledSeries) -> KpiSummary {
    let total_revenue = series.sum();
    let total_transactions = series.len();

    let average_transaction = if total_transactions > 0 {
        Some(total_revenue / total_transactions as f64)
    } else {
        None
    };

    let peak = series.peak_index();

    KpiSummary {
        total_revenue,
        total_transactions,
        average_transaction,
        peak_day: peak.map(|i| series.labels[i].clone()),
        peak_value: peak.map(|i| series.values[i]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn week_series() -> LabeledSeries {
        LabeledSeries::new(
            vec!["Mon".into(), "Tue".into(), "Wed".into(), "Thu".into()],
            vec![10.0, 30.0, 30.0, 5.0],
        )
    }

    #[test]
    fn totals_and_average() {
        let summary = summarize(&week_series());
        assert_eq!(summary.total_revenue, 75.0);
        assert_eq!(summary.total_transactions, 4);
        assert!((summary.average_transaction.unwrap() - 18.75).abs() < 1e-9);
    }

    #[test]
    fn first_max_wins_peak_ties() {
        let summary = summarize(&week_series());
        assert_eq!(summary.peak_day.as_deref(), Some("Tue"));
        assert_eq!(summary.peak_value, Some(30.0));
    }

    #[test]
    fn empty_series_yields_explicit_markers() {
        let summary = summarize(&LabeledSeries::default());
        assert_eq!(summary.total_revenue, 0.0);
        assert_eq!(summary.total_transactions, 0);
        assert_eq!(summary.average_transaction, None);
        assert_eq!(summary.peak_day, None);
        assert_eq!(summary.peak_value, None);
    }

    #[test]
    fn summarize_is_idempotent() {
        let series = week_series();
        assert_eq!(summarize(&series), summarize(&series));
    }
}
