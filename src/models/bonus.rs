use serde::{Deserialize, Serialize};

/// Bonus approval toggle for one employee. Wire values match the dashboard's
/// select options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ApprovalStatus {
    Approved,
    #[default]
    NotApproved,
}

/// One row of the HR bonus report: a cashier's net sales and the commission
/// derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BonusRecord {
    pub name: String,
    pub total_sales: f64,
    pub bonus: f64,
}
