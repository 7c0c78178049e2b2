use crate::models::{Insight, InsightFact, InsightReport, RawSalesPayload};
use crate::services::kpis;

/// Derive the ranked insight list from a dashboard payload.
///
/// Each source series is independently optional; a missing or unusable
/// series never blocks insights from the others. Ordering is fixed by
/// source (daily sales, top product, top cashier, discounts), not by
/// magnitude. An entirely empty payload yields the explicit empty report.
pub fn rank(payload: &RawSalesPayload) -> InsightReport {
    let mut insights = Vec::new();

    if let Some(daily) = payload.daily_sales.as_ref().map(|s| s.clean()) {
        if !daily.is_empty() {
            let summary = kpis::summarize(&daily);

            insights.push(Insight {
                text: format!("Total sales: ${}", format_amount(summary.total_revenue)),
                fact: InsightFact::TotalSales {
                    total: summary.total_revenue,
                },
            });

            if let Some(average) = summary.average_transaction {
                insights.push(Insight {
                    text: format!("Average daily sales: ${}", format_amount(average)),
                    fact: InsightFact::AverageDailySales { average },
                });
            }

            if let (Some(label), Some(value)) = (summary.peak_day, summary.peak_value) {
                insights.push(Insight {
                    text: format!("Best sales day: {} (${})", label, format_amount(value)),
                    fact: InsightFact::BestDay { label, value },
                });
            }
        }
    }

    if let Some(products) = &payload.top_products {
        if let Some(label) = products.first_label() {
            let units = products.first_value_or_zero();
            insights.push(Insight {
                text: format!("Top product: {} ({} units)", label, format_amount(units)),
                fact: InsightFact::TopProduct {
                    label: label.to_string(),
                    units,
                },
            });
        }
    }

    if let Some(cashiers) = &payload.cashier_sales {
        if let Some(label) = cashiers.first_label() {
            let amount = cashiers.first_value_or_zero();
            insights.push(Insight {
                text: format!("Top cashier: {} (${})", label, format_amount(amount)),
                fact: InsightFact::TopCashier {
                    label: label.to_string(),
                    amount,
                },
            });
        }
    }

    if let Some(discounts) = payload.discounts.as_ref().map(|s| s.clean()) {
        if !discounts.is_empty() {
            let total = discounts.sum();
            insights.push(Insight {
                text: format!("Total discounts: ${}", format_amount(total)),
                fact: InsightFact::TotalDiscounts { total },
            });

            if let Some(i) = discounts.peak_index() {
                let label = discounts.labels[i].clone();
                let value = discounts.values[i];
                insights.push(Insight {
                    text: format!(
                        "Highest discount by product: {} (${})",
                        label,
                        format_amount(value)
                    ),
                    fact: InsightFact::HighestDiscount { label, value },
                });
            }
        }
    }

    InsightReport { insights }
}

/// Display formatting for monetary and unit amounts: thousands separators,
/// at most two fraction digits, trailing zeros trimmed.
pub(crate) fn format_amount(v: f64) -> String {
    let rounded = (v * 100.0).round() / 100.0;
    let sign = if rounded < 0.0 { "-" } else { "" };
    let cents_total = (rounded.abs() * 100.0).round() as u64;
    let whole = cents_total / 100;
    let cents = cents_total % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if cents == 0 {
        format!("{sign}{grouped}")
    } else if cents % 10 == 0 {
        format!("{sign}{grouped}.{}", cents / 10)
    } else {
        format!("{sign}{grouped}.{cents:02}")
    }
}
