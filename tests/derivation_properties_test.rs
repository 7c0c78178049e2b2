/// Derivation contract tests
///
/// Self-contained checks of the arithmetic contracts behind the KPI summary,
/// the waterfall bridge and numeric coercion, stated independently of the
/// service layer so a regression in either shows up as a disagreement.

// ---------------------------------------------------------------------------
// KPI derivation
// ---------------------------------------------------------------------------

#[cfg(test)]
mod kpi_contract {
    /// Sum, count and safe average over a value series.
    fn derive(values: &[f64]) -> (f64, usize, Option<f64>) {
        let total: f64 = values.iter().sum();
        let count = values.len();
        let average = if count > 0 {
            Some(total / count as f64)
        } else {
            None
        };
        (total, count, average)
    }

    /// First occurrence of the maximum value.
    fn peak(values: &[f64]) -> Option<usize> {
        values
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                Some((_, max)) if v <= max => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i)
    }

    #[test]
    fn total_equals_exact_sum_regardless_of_order() {
        let (a, _, _) = derive(&[10.0, 30.0, 30.0, 5.0]);
        let (b, _, _) = derive(&[5.0, 30.0, 10.0, 30.0]);
        assert_eq!(a, 75.0);
        assert_eq!(a, b);
    }

    #[test]
    fn average_is_none_exactly_when_empty() {
        let (_, count, average) = derive(&[]);
        assert_eq!(count, 0);
        assert_eq!(average, None);

        let (total, count, average) = derive(&[12.0, 18.0]);
        assert!((average.unwrap() - total / count as f64).abs() < 1e-12);
    }

    #[test]
    fn first_max_wins_ties() {
        // labels ["Mon","Tue","Wed","Thu"] -> peak is ("Tue", 30)
        assert_eq!(peak(&[10.0, 30.0, 30.0, 5.0]), Some(1));
    }

    #[test]
    fn peak_of_empty_is_none() {
        assert_eq!(peak(&[]), None);
    }

    #[test]
    fn derivation_is_idempotent() {
        let values = [4.0, 9.0, 1.0];
        assert_eq!(derive(&values), derive(&values));
        assert_eq!(peak(&values), peak(&values));
    }
}

// ---------------------------------------------------------------------------
// Waterfall bridge
// ---------------------------------------------------------------------------

#[cfg(test)]
mod waterfall_contract {
    /// Left-to-right fold of signed deltas into (start, end) pairs.
    fn bridge(deltas: &[f64]) -> Vec<(f64, f64)> {
        deltas
            .iter()
            .scan(0.0_f64, |total, &delta| {
                let start = *total;
                *total += delta;
                Some((start, *total))
            })
            .collect()
    }

    #[test]
    fn running_total_example() {
        assert_eq!(
            bridge(&[100.0, -40.0, 20.0]),
            vec![(0.0, 100.0), (100.0, 60.0), (60.0, 80.0)]
        );
    }

    #[test]
    fn each_start_is_previous_end() {
        let points = bridge(&[3.5, -1.25, 10.0, -20.0, 7.75]);
        for pair in points.windows(2) {
            assert_eq!(pair[0].1, pair[1].0);
        }
    }

    #[test]
    fn length_is_preserved() {
        assert_eq!(bridge(&[1.0; 17]).len(), 17);
        assert!(bridge(&[]).is_empty());
    }

    #[test]
    fn final_end_equals_sum_of_deltas() {
        let deltas = [250.0, -80.0, -30.0, 12.5];
        let total: f64 = deltas.iter().sum();
        assert!((bridge(&deltas).last().unwrap().1 - total).abs() < 1e-12);
    }
}

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

#[cfg(test)]
mod coercion_contract {
    /// Spreadsheet-cell number parsing: strip $, comma, percent and spaces.
    fn scrub(s: &str) -> Option<f64> {
        let cleaned: String = s
            .chars()
            .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
            .collect();
        if cleaned.is_empty() {
            return None;
        }
        cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
    }

    #[test]
    fn money_strings_parse() {
        assert_eq!(scrub("$1,234.50"), Some(1234.5));
        assert_eq!(scrub("  42 "), Some(42.0));
        assert_eq!(scrub("-7.5%"), Some(-7.5));
    }

    #[test]
    fn garbage_is_rejected_not_nanified() {
        assert_eq!(scrub("x"), None);
        assert_eq!(scrub(""), None);
        assert_eq!(scrub("NaN"), None);
        assert_eq!(scrub("inf"), None);
    }

    #[test]
    fn filtering_preserves_aggregates_of_valid_entries() {
        let raw = ["10", "x", "20"];
        let values: Vec<f64> = raw.iter().filter_map(|s| scrub(s)).collect();
        assert_eq!(values, vec![10.0, 20.0]);
        assert_eq!(values.iter().sum::<f64>(), 30.0);
    }
}
