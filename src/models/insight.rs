use serde::Serialize;

/// Numeric facts backing one insight, carried at full precision. Rounding
/// happens only in the rendered `text`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsightFact {
    TotalSales { total: f64 },
    AverageDailySales { average: f64 },
    BestDay { label: String, value: f64 },
    TopProduct { label: String, units: f64 },
    TopCashier { label: String, amount: f64 },
    TotalDiscounts { total: f64 },
    HighestDiscount { label: String, value: f64 },
}

/// One derived insight: the display string plus the structured fact it was
/// rendered from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insight {
    pub text: String,
    #[serde(flatten)]
    pub fact: InsightFact,
}

/// Insights in fixed source order: daily sales, top product, top cashier,
/// discounts. An empty list is the explicit "no insights available" state,
/// not an error and not an absent value.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsightReport {
    pub insights: Vec<Insight>,
}

impl InsightReport {
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty()
    }
}
