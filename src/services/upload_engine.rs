use std::collections::BTreeMap;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::info;

use crate::errors::AppError;
use crate::models::{
    scrub_number, AiAnalysis, AnalyzeResponse, ChartKind, ChartSeries, LabeledSeries, UploadKpis,
};
use crate::services::insights::format_amount;
use crate::services::{kpis, waterfall};

const TRASH_VALUES: &[&str] = &["n/a", "-", "none", "null"];
const NUMERIC_HINTS: &[&str] = &["price", "sales", "revenue", "quantity", "qty", "amount", "cost", "profit"];
const FINANCIAL_HINTS: &[&str] = &["revenue", "sales", "price", "profit", "amount", "cost"];
const TEMPORAL_HINTS: &[&str] = &["date", "time", "year", "month"];
const IDENTITY_HINTS: &[&str] = &["id", "sku", "code"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%m/%d/%y", "%Y/%m/%d", "%d-%m-%Y"];

/// Maximum number of charts recommended per upload.
const MAX_CHARTS: usize = 3;

/// Analyze an uploaded spreadsheet: standardize it, classify its columns,
/// pick the charts worth drawing and compute the figures behind them.
pub fn analyze_upload(filename: &str, bytes: &[u8]) -> Result<AnalyzeResponse, AppError> {
    check_extension(filename)?;

    let content = String::from_utf8_lossy(bytes);
    let table = read_table(&content)?;
    if table.rows.is_empty() {
        return Err(AppError::Analysis("the file contains no data rows".into()));
    }

    let engine = Engine::build(table);
    info!(
        "Classified upload: {} financial, {} temporal, {} categorical columns over {} rows",
        engine.financial.len(),
        engine.temporal.len(),
        engine.categorical.len(),
        engine.table.rows.len()
    );
    if engine.revenue.is_some() {
        info!("Using '{}' as the revenue column", engine.revenue_name);
    }

    let charts = engine.assemble_charts();
    let total_revenue = engine.revenue.as_ref().map(|r| r.iter().sum()).unwrap_or(0.0);

    Ok(AnalyzeResponse {
        kpis: UploadKpis {
            total_revenue,
            row_count: engine.table.rows.len(),
        },
        ai_analysis: summarize_charts(&charts),
        charts,
    })
}

fn check_extension(filename: &str) -> Result<(), AppError> {
    let lower = filename.to_lowercase();
    if lower.ends_with(".csv") {
        Ok(())
    } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        Err(AppError::UnsupportedFormat(
            "Excel uploads are not supported; export the sheet to CSV first".into(),
        ))
    } else {
        Err(AppError::UnsupportedFormat(
            "only CSV files are supported".into(),
        ))
    }
}

/// A parsed spreadsheet with standardized headers and trash cells blanked.
struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

fn read_table(content: &str) -> Result<Table, AppError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::Analysis(format!("failed to read headers: {e}")))?
        .iter()
        .map(standardize_header)
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| AppError::Analysis(format!("malformed CSV: {e}")))?;
        let mut row: Vec<String> = record.iter().map(clean_cell).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    Ok(Table { headers, rows })
}

fn standardize_header(h: &str) -> String {
    h.trim()
        .to_lowercase()
        .replace(' ', "_")
        .replace(['(', ')'], "")
}

fn clean_cell(cell: &str) -> String {
    let trimmed = cell.trim();
    if TRASH_VALUES.contains(&trimmed.to_lowercase().as_str()) {
        String::new()
    } else {
        trimmed.to_string()
    }
}

fn name_matches(name: &str, hints: &[&str]) -> bool {
    hints.iter().any(|h| name.contains(h))
}

/// Classified view of an upload plus the derived revenue column.
struct Engine {
    table: Table,
    numeric: BTreeMap<usize, Vec<f64>>,
    temporal: Vec<usize>,
    financial: Vec<usize>,
    categorical: Vec<usize>,
    /// Per-row revenue figures and the column name they came from. Derived
    /// as unit price x quantity when both columns exist, otherwise the first
    /// financial column stands in.
    revenue: Option<Vec<f64>>,
    revenue_name: String,
}

impl Engine {
    fn build(table: Table) -> Self {
        // Scrub likely-numeric columns ($ and , stripped, unparseable -> 0)
        let mut numeric: BTreeMap<usize, Vec<f64>> = BTreeMap::new();
        for (i, name) in table.headers.iter().enumerate() {
            if name_matches(name, NUMERIC_HINTS) {
                let values = table
                    .rows
                    .iter()
                    .map(|row| scrub_number(&row[i]).unwrap_or(0.0))
                    .collect();
                numeric.insert(i, values);
            }
        }

        let mut temporal = Vec::new();
        let mut financial = Vec::new();
        let mut categorical = Vec::new();

        for (i, name) in table.headers.iter().enumerate() {
            if name_matches(name, IDENTITY_HINTS) && !name.contains("customer") {
                continue;
            }
            if name_matches(name, TEMPORAL_HINTS) {
                temporal.push(i);
            } else if name_matches(name, FINANCIAL_HINTS) {
                financial.push(i);
            } else if !numeric.contains_key(&i) && is_low_cardinality(&table, i) {
                categorical.push(i);
            }
        }

        let price = table
            .headers
            .iter()
            .position(|n| n.contains("price"))
            .and_then(|i| numeric.get(&i));
        let quantity = table
            .headers
            .iter()
            .position(|n| n.contains("quantity") || n.contains("qty"))
            .and_then(|i| numeric.get(&i));

        let (revenue, revenue_name) = match (price, quantity) {
            (Some(price), Some(qty)) => {
                let derived = price.iter().zip(qty).map(|(p, q)| p * q).collect();
                (Some(derived), "calculated_revenue".to_string())
            }
            _ => financial
                .iter()
                .find_map(|&i| numeric.get(&i).map(|v| (v.clone(), table.headers[i].clone())))
                .map(|(v, name)| (Some(v), name))
                .unwrap_or((None, String::new())),
        };

        Self {
            table,
            numeric,
            temporal,
            financial,
            categorical,
            revenue,
            revenue_name,
        }
    }

    /// Pick the charts worth drawing, most specific first, capped at three.
    fn recommend(&self) -> Vec<ChartKind> {
        let mut kinds = Vec::new();

        let has_profit_bridge = self
            .financial
            .iter()
            .any(|&i| {
                let name = &self.table.headers[i];
                name.contains("profit") || name.contains("cost")
            });
        if self.revenue.is_some() && has_profit_bridge {
            kinds.push(ChartKind::Waterfall);
        }
        if self.revenue.is_some() && !self.temporal.is_empty() {
            kinds.push(ChartKind::LineChart);
        }
        if self.revenue.is_some() && !self.categorical.is_empty() {
            kinds.push(ChartKind::BarChart);
        }

        kinds.truncate(MAX_CHARTS);
        kinds
    }

    fn assemble_charts(&self) -> BTreeMap<ChartKind, ChartSeries> {
        let mut charts = BTreeMap::new();
        for kind in self.recommend() {
            let chart = match kind {
                ChartKind::BarChart => self.bar_chart(),
                ChartKind::LineChart => self.line_chart(),
                ChartKind::Waterfall => self.waterfall_chart(),
                ChartKind::Doughnut => None,
            };
            if let Some(chart) = chart {
                charts.insert(kind, chart);
            }
        }
        charts
    }

    /// Top 10 categories of the leading categorical column by revenue.
    fn bar_chart(&self) -> Option<ChartSeries> {
        let category = *self.categorical.first()?;
        let revenue = self.revenue.as_ref()?;

        let mut totals: BTreeMap<String, f64> = BTreeMap::new();
        for (row, &value) in self.table.rows.iter().zip(revenue) {
            let key = if row[category].is_empty() {
                "Unknown".to_string()
            } else {
                row[category].clone()
            };
            *totals.entry(key).or_default() += value;
        }

        let mut ranked: Vec<(String, f64)> = totals.into_iter().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(10);

        Some(ChartSeries {
            title: format!("Top {} by Sales", title_case(&self.table.headers[category])),
            labels: ranked.iter().map(|(k, _)| k.clone()).collect(),
            values: ranked.iter().map(|(_, v)| *v).collect(),
            points: None,
        })
    }

    /// Monthly revenue trend over the leading temporal column.
    fn line_chart(&self) -> Option<ChartSeries> {
        let temporal = *self.temporal.first()?;
        let revenue = self.revenue.as_ref()?;

        let mut monthly: BTreeMap<String, f64> = BTreeMap::new();
        for (row, &value) in self.table.rows.iter().zip(revenue) {
            let Some(date) = parse_date(&row[temporal]) else {
                continue;
            };
            *monthly.entry(date.format("%Y-%m").to_string()).or_default() += value;
        }
        if monthly.is_empty() {
            return None;
        }

        Some(ChartSeries {
            title: "Revenue Growth Over Time".to_string(),
            labels: monthly.keys().cloned().collect(),
            values: monthly.values().copied().collect(),
            points: None,
        })
    }

    /// Revenue -> operating costs -> net profit bridge, with the derived
    /// running-total bars attached for the floating-bar renderer.
    fn waterfall_chart(&self) -> Option<ChartSeries> {
        let revenue: f64 = self.revenue.as_ref()?.iter().sum();
        let profit: f64 = self
            .financial
            .iter()
            .find(|&&i| self.table.headers[i].contains("profit"))
            .and_then(|i| self.numeric.get(i))
            .map(|v| v.iter().sum())
            .unwrap_or(0.0);

        let labels: Vec<String> = ["Total Revenue", "Operating Costs", "Net Profit"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let values = vec![revenue, -(revenue - profit), profit];
        let points = waterfall::bridge(&labels, &values);

        Some(ChartSeries {
            title: "Profitability Bridge".to_string(),
            labels,
            values,
            points: Some(points),
        })
    }
}

fn is_low_cardinality(table: &Table, col: usize) -> bool {
    let distinct: std::collections::HashSet<&str> = table
        .rows
        .iter()
        .map(|row| row[col].as_str())
        .filter(|v| !v.is_empty())
        .collect();
    !distinct.is_empty() && (distinct.len() as f64) < (table.rows.len() as f64) * 0.2
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Deterministic narrative built from the assembled charts: one bullet per
/// notable figure, joined into a short paragraph.
fn summarize_charts(charts: &BTreeMap<ChartKind, ChartSeries>) -> Option<AiAnalysis> {
    let mut bullets = Vec::new();

    if let Some(line) = charts.get(&ChartKind::LineChart) {
        let series = LabeledSeries::new(line.labels.clone(), line.values.clone());
        let summary = kpis::summarize(&series);
        bullets.push(format!(
            "Revenue across the period totals ${}.",
            format_amount(summary.total_revenue)
        ));
        if let (Some(label), Some(value)) = (summary.peak_day, summary.peak_value) {
            bullets.push(format!(
                "The strongest month was {} at ${}.",
                label,
                format_amount(value)
            ));
        }
    }

    if let Some(bar) = charts.get(&ChartKind::BarChart) {
        if let (Some(label), Some(value)) = (bar.labels.first(), bar.values.first()) {
            bullets.push(format!(
                "{} leads all segments at ${}.",
                label,
                format_amount(*value)
            ));
        }
    }

    if let Some(bridge) = charts.get(&ChartKind::Waterfall) {
        if let Some(profit) = bridge.values.last() {
            bullets.push(format!(
                "Net profit after operating costs comes to ${}.",
                format_amount(*profit)
            ));
        }
    }

    if bullets.is_empty() {
        return None;
    }
    Some(AiAnalysis {
        paragraph: bullets.join(" "),
        short_insights: bullets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // 20 rows, 3 categories over 3 months; revenue = price x quantity
    const RETAIL_CSV: &str = "\
Order Date,Product Category,Unit Price,Quantity,Profit
2024-01-03,Coffee,5.00,10,20.00
2024-01-05,Tea,4.00,5,8.00
2024-01-09,Coffee,5.00,4,8.00
2024-01-14,Pastry,3.00,10,12.00
2024-01-21,Tea,4.00,5,8.00
2024-01-28,Coffee,5.00,2,4.00
2024-02-02,Coffee,5.00,20,40.00
2024-02-06,Tea,4.00,10,16.00
2024-02-09,Pastry,3.00,20,24.00
2024-02-12,Coffee,5.00,6,12.00
2024-02-15,Tea,4.00,5,8.00
2024-02-21,Pastry,3.00,10,12.00
2024-02-26,Coffee,5.00,4,8.00
2024-03-01,Tea,4.00,10,16.00
2024-03-04,Coffee,5.00,10,20.00
2024-03-08,Pastry,3.00,5,6.00
2024-03-13,Coffee,5.00,8,16.00
2024-03-19,Tea,4.00,10,16.00
2024-03-24,Coffee,5.00,1,2.00
2024-03-30,Pastry,3.00,20,24.00
";

    #[test]
    fn rejects_non_csv_uploads() {
        let err = analyze_upload("report.pdf", b"x").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
        let err = analyze_upload("book.xlsx", b"x").unwrap_err();
        assert!(matches!(err, AppError::UnsupportedFormat(_)));
    }

    #[test]
    fn empty_file_is_an_analysis_error() {
        let err = analyze_upload("empty.csv", b"a,b\n").unwrap_err();
        assert!(matches!(err, AppError::Analysis(_)));
    }

    #[test]
    fn revenue_is_derived_from_price_times_quantity() {
        let response = analyze_upload("retail.csv", RETAIL_CSV.as_bytes()).unwrap();
        assert!((response.kpis.total_revenue - 700.0).abs() < 1e-9);
        assert_eq!(response.kpis.row_count, 20);
    }

    #[test]
    fn recommends_all_three_charts_for_rich_data() {
        let response = analyze_upload("retail.csv", RETAIL_CSV.as_bytes()).unwrap();
        assert!(response.charts.contains_key(&ChartKind::Waterfall));
        assert!(response.charts.contains_key(&ChartKind::LineChart));
        assert!(response.charts.contains_key(&ChartKind::BarChart));
    }

    #[test]
    fn line_chart_groups_revenue_by_month() {
        let response = analyze_upload("retail.csv", RETAIL_CSV.as_bytes()).unwrap();
        let line = &response.charts[&ChartKind::LineChart];
        assert_eq!(line.labels, vec!["2024-01", "2024-02", "2024-03"]);
        assert_eq!(line.values, vec![150.0, 300.0, 250.0]);
    }

    #[test]
    fn bar_chart_ranks_categories_by_revenue() {
        let response = analyze_upload("retail.csv", RETAIL_CSV.as_bytes()).unwrap();
        let bar = &response.charts[&ChartKind::BarChart];
        assert_eq!(bar.title, "Top Product Category by Sales");
        assert_eq!(bar.labels[0], "Coffee");
        assert_eq!(bar.values[0], 325.0);
    }

    #[test]
    fn waterfall_carries_running_total_points() {
        let response = analyze_upload("retail.csv", RETAIL_CSV.as_bytes()).unwrap();
        let bridge = &response.charts[&ChartKind::Waterfall];
        let points = bridge.points.as_ref().unwrap();
        assert_eq!(points[0].start, 0.0);
        assert_eq!(points[0].end, 700.0);
        // operating costs step lands on total profit
        assert_eq!(points[1].end, 280.0);
    }

    #[test]
    fn narrative_summary_is_present_and_deterministic() {
        let a = analyze_upload("retail.csv", RETAIL_CSV.as_bytes()).unwrap();
        let b = analyze_upload("retail.csv", RETAIL_CSV.as_bytes()).unwrap();
        let ai = a.ai_analysis.unwrap();
        assert!(!ai.short_insights.is_empty());
        assert_eq!(Some(ai), b.ai_analysis);
    }

    #[test]
    fn identity_columns_are_never_charted() {
        let csv = "\
order_id,sales amount,region
1,100,North
2,200,North
3,50,South
4,80,South
5,120,North
6,90,South
7,30,North
8,60,South
9,40,North
10,70,South
11,55,North
";
        let response = analyze_upload("orders.csv", csv.as_bytes()).unwrap();
        let bar = &response.charts[&ChartKind::BarChart];
        assert_eq!(bar.title, "Top Region by Sales");
        assert!((response.kpis.total_revenue - 895.0).abs() < 1e-9);
    }
}
