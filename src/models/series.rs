use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Chart series as it arrives on the wire. Real payloads carry values either
/// as JSON numbers or as formatted strings ("$1,234.50"), and the two arrays
/// may disagree in length, so this shape is deliberately loose.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSeries {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default)]
    pub values: Vec<Value>,
}

impl RawSeries {
    /// Coerce into the cleaned, index-aligned form.
    pub fn clean(&self) -> LabeledSeries {
        LabeledSeries::from(self)
    }

    /// First non-empty label, if any.
    pub fn first_label(&self) -> Option<&str> {
        self.labels
            .first()
            .map(String::as_str)
            .filter(|l| !l.trim().is_empty())
    }

    /// First value coerced to a number, defaulting to 0 when absent or
    /// non-numeric.
    pub fn first_value_or_zero(&self) -> f64 {
        self.values.first().and_then(coerce_number).unwrap_or(0.0)
    }
}

/// Cleaned chart series: `labels[i]` names `values[i]` and the lengths are
/// equal by construction.
///
/// Deserialization goes through [`RawSeries`], so a mismatched pair of arrays
/// is truncated to the shorter length and any label/value pair whose value
/// fails finite-number coercion is dropped. Invalid entries never poison the
/// aggregates computed downstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawSeries")]
pub struct LabeledSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl LabeledSeries {
    /// Build from already-clean parallel arrays, truncating to the shorter.
    pub fn new(labels: Vec<String>, values: Vec<f64>) -> Self {
        let n = labels.len().min(values.len());
        let mut labels = labels;
        let mut values = values;
        labels.truncate(n);
        values.truncate(n);
        Self { labels, values }
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the first occurrence of the maximum value. Ties are broken by
    /// the lowest index; `None` on an empty series.
    pub fn peak_index(&self) -> Option<usize> {
        self.values
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (i, &v)| match best {
                Some((_, max)) if v <= max => best,
                _ => Some((i, v)),
            })
            .map(|(i, _)| i)
    }

    pub fn sum(&self) -> f64 {
        self.values.iter().sum()
    }
}

impl From<RawSeries> for LabeledSeries {
    fn from(raw: RawSeries) -> Self {
        Self::from(&raw)
    }
}

impl From<&RawSeries> for LabeledSeries {
    fn from(raw: &RawSeries) -> Self {
        let n = raw.labels.len().min(raw.values.len());
        let (labels, values) = raw
            .labels
            .iter()
            .take(n)
            .zip(raw.values.iter().take(n))
            .filter_map(|(label, value)| coerce_number(value).map(|v| (label.clone(), v)))
            .unzip();
        Self { labels, values }
    }
}

impl From<&LabeledSeries> for RawSeries {
    fn from(series: &LabeledSeries) -> Self {
        Self {
            labels: series.labels.clone(),
            values: series.values.iter().map(|&v| Value::from(v)).collect(),
        }
    }
}

/// Explicit numeric coercion for wire values. Accepts JSON numbers and
/// money-formatted strings; anything else, or a non-finite result, is
/// rejected so the caller can filter it out.
pub fn coerce_number(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => scrub_number(s)?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

/// Parse a number out of a spreadsheet-style cell: strips `$`, `,`, `%` and
/// surrounding whitespace before parsing.
pub fn scrub_number(s: &str) -> Option<f64> {
    let cleaned: String = s
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '%' | ' '))
        .collect();
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Dashboard payload served by `GET /api/data`: one cleaned series per chart
/// plus the per-cashier bonus report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SalesPayload {
    pub daily_sales: LabeledSeries,
    pub top_products: LabeledSeries,
    pub cashier_sales: LabeledSeries,
    pub discounts: LabeledSeries,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bonus_report: Vec<crate::models::BonusRecord>,
}

impl SalesPayload {
    /// View of this payload in the wire-side shape the insight ranker
    /// consumes.
    pub fn as_raw(&self) -> RawSalesPayload {
        RawSalesPayload {
            daily_sales: Some(RawSeries::from(&self.daily_sales)),
            top_products: Some(RawSeries::from(&self.top_products)),
            cashier_sales: Some(RawSeries::from(&self.cashier_sales)),
            discounts: Some(RawSeries::from(&self.discounts)),
        }
    }
}

/// Dashboard payload as consumed from the wire. Every series is
/// independently optional: the absence of one source never blocks insights
/// from the others.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSalesPayload {
    pub daily_sales: Option<RawSeries>,
    pub top_products: Option<RawSeries>,
    pub cashier_sales: Option<RawSeries>,
    pub discounts: Option<RawSeries>,
}
