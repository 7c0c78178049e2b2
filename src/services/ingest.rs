use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::warn;

use crate::models::{scrub_number, LabeledSeries, SalesPayload};
use crate::services::bonus;

/// How many products the top-products chart keeps.
const TOP_PRODUCTS_LIMIT: usize = 10;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%d-%m-%Y"];

/// One cleaned sales transaction.
#[derive(Debug, Clone, PartialEq)]
struct SalesRow {
    date: NaiveDate,
    product: String,
    cashier: String,
    quantity: f64,
    amount: f64,
    discount: f64,
}

impl SalesRow {
    fn net_amount(&self) -> f64 {
        self.amount - self.discount
    }

    // Duplicate-detection key; exact duplicates are dropped.
    fn dedup_key(&self) -> String {
        format!(
            "{}|{}|{}|{}|{}|{}",
            self.date, self.product, self.cashier, self.quantity, self.amount, self.discount
        )
    }
}

/// Load the sales CSV and derive the full dashboard payload. Re-derives from
/// scratch on every call; nothing is cached between loads.
pub fn load_dashboard_data(path: &Path) -> Result<SalesPayload> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read sales data file {:?}", path))?;
    let rows = read_rows(&content)?;
    Ok(analyze_rows(&rows))
}

/// Parse and clean the raw CSV into sales rows.
///
/// Header names are matched case-insensitively and common aliases are
/// accepted (`order date`, `sales`, `product`, `customer name`). Rows missing
/// a parseable date, product or amount are dropped; quantity defaults to 1,
/// discount to 0 and cashier to "Unknown". Exact duplicate rows are dropped.
fn read_rows(content: &str) -> Result<Vec<SalesRow>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .context("failed to read CSV headers")?
        .iter()
        .map(|h| h.trim().to_lowercase())
        .collect();

    let date_col = require_column(&headers, &["date", "order date"])?;
    let amount_col = require_column(&headers, &["amount", "sales"])?;
    let product_col = require_column(&headers, &["product_name", "product"])?;
    let cashier_col = find_column(&headers, &["cashier", "customer name"]);
    let quantity_col = find_column(&headers, &["quantity"]);
    let discount_col = find_column(&headers, &["discount"]);

    let mut rows = Vec::new();
    let mut seen = HashSet::new();
    let mut dropped = 0usize;

    for record in reader.records() {
        let record = match record {
            Ok(r) => r,
            Err(_) => {
                dropped += 1;
                continue;
            }
        };

        let field = |col: usize| record.get(col).unwrap_or("").trim();

        let date = parse_date(field(date_col));
        let amount = scrub_number(field(amount_col));
        let product = field(product_col).to_string();

        // date, product and amount are mandatory per row
        let (Some(date), Some(amount)) = (date, amount) else {
            dropped += 1;
            continue;
        };
        if product.is_empty() {
            dropped += 1;
            continue;
        }

        let cashier = cashier_col
            .map(field)
            .filter(|c| !c.is_empty())
            .unwrap_or("Unknown")
            .to_string();
        let quantity = quantity_col.and_then(|c| scrub_number(field(c))).unwrap_or(1.0);
        let discount = discount_col.and_then(|c| scrub_number(field(c))).unwrap_or(0.0);

        let row = SalesRow {
            date,
            product,
            cashier,
            quantity,
            amount,
            discount,
        };

        if seen.insert(row.dedup_key()) {
            rows.push(row);
        }
    }

    if dropped > 0 {
        warn!("Dropped {} unusable rows from sales CSV", dropped);
    }

    Ok(rows)
}

/// Group the cleaned rows into the four dashboard series and attach the
/// bonus report.
fn analyze_rows(rows: &[SalesRow]) -> SalesPayload {
    let mut daily: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    let mut product_units: BTreeMap<String, f64> = BTreeMap::new();
    let mut cashier_net: BTreeMap<String, f64> = BTreeMap::new();
    let mut product_discounts: BTreeMap<String, f64> = BTreeMap::new();

    for row in rows {
        *daily.entry(row.date).or_default() += row.net_amount();
        *product_units.entry(row.product.clone()).or_default() += row.quantity;
        *cashier_net.entry(row.cashier.clone()).or_default() += row.net_amount();
        *product_discounts.entry(row.product.clone()).or_default() += row.discount;
    }

    let daily_sales = LabeledSeries::new(
        daily.keys().map(|d| d.to_string()).collect(),
        daily.values().copied().collect(),
    );

    // top sellers by unit count, descending; alphabetical order breaks ties
    let mut ranked: Vec<(&String, f64)> =
        product_units.iter().map(|(p, &q)| (p, q)).collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(TOP_PRODUCTS_LIMIT);
    let top_products = LabeledSeries::new(
        ranked.iter().map(|(p, _)| (*p).clone()).collect(),
        ranked.iter().map(|(_, q)| *q).collect(),
    );

    let cashier_sales = LabeledSeries::new(
        cashier_net.keys().cloned().collect(),
        cashier_net.values().copied().collect(),
    );

    let discounts = LabeledSeries::new(
        product_discounts.keys().cloned().collect(),
        product_discounts.values().copied().collect(),
    );

    let bonus_report = bonus::bonus_report(&cashier_sales);

    SalesPayload {
        daily_sales,
        top_products,
        cashier_sales,
        discounts,
        bonus_report,
    }
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|a| h == a))
}

fn require_column(headers: &[String], aliases: &[&str]) -> Result<usize> {
    match find_column(headers, aliases) {
        Some(i) => Ok(i),
        None => bail!(
            "CSV must contain a '{}' column",
            aliases.join("' or '")
        ),
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CSV: &str = "\
date,product_name,amount,quantity,discount,cashier
2024-03-01,Espresso,$4.50,2,0.50,Ana
2024-03-01,Latte,6.00,1,,Ben
2024-03-02,Espresso,4.50,3,0,Ana
2024-03-01,Espresso,$4.50,2,0.50,Ana
not-a-date,Espresso,4.50,1,0,Ana
2024-03-02,,9.99,1,0,Ben
";

    #[test]
    fn drops_bad_rows_and_duplicates() {
        let rows = read_rows(CSV).unwrap();
        // 6 data rows: one exact duplicate, one bad date, one missing product
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn defaults_fill_missing_optionals() {
        let rows = read_rows("date,product,amount\n2024-01-05,Mug,12.00\n").unwrap();
        assert_eq!(rows[0].cashier, "Unknown");
        assert_eq!(rows[0].quantity, 1.0);
        assert_eq!(rows[0].discount, 0.0);
    }

    #[test]
    fn header_aliases_are_equivalent() {
        let canonical = read_rows("date,product_name,amount\n2024-01-05,Mug,12.00\n").unwrap();
        let aliased = read_rows(
            "Order Date,Product,Sales,Customer Name\n2024-01-05,Mug,12.00,Ana\n",
        )
        .unwrap();
        assert_eq!(canonical[0].date, aliased[0].date);
        assert_eq!(canonical[0].product, aliased[0].product);
        assert_eq!(canonical[0].amount, aliased[0].amount);
        assert_eq!(aliased[0].cashier, "Ana");
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let err = read_rows("product,amount\nMug,12.00\n").unwrap_err();
        assert!(err.to_string().contains("date"));
    }

    #[test]
    fn aggregation_groups_by_day_product_and_cashier() {
        let rows = read_rows(CSV).unwrap();
        let payload = analyze_rows(&rows);

        // daily net: 03-01 = (4.50 - 0.50) + 6.00 = 10.00; 03-02 = 4.50
        assert_eq!(payload.daily_sales.labels, vec!["2024-03-01", "2024-03-02"]);
        assert!((payload.daily_sales.values[0] - 10.0).abs() < 1e-9);
        assert!((payload.daily_sales.values[1] - 4.5).abs() < 1e-9);

        // Espresso: 2 + 3 units, Latte: 1
        assert_eq!(payload.top_products.labels[0], "Espresso");
        assert_eq!(payload.top_products.values[0], 5.0);

        // bonus report mirrors cashier series
        assert_eq!(
            payload.bonus_report.len(),
            payload.cashier_sales.len()
        );
        let ana = payload
            .bonus_report
            .iter()
            .find(|r| r.name == "Ana")
            .unwrap();
        assert!((ana.bonus - (ana.total_sales * 0.03 * 100.0).round() / 100.0).abs() < 1e-9);
    }
}
