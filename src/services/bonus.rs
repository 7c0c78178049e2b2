use std::collections::HashMap;

use crate::models::{ApprovalStatus, BonusRecord, LabeledSeries};

/// Commission rate applied to each cashier's net sales.
const BONUS_RATE: f64 = 0.03;

/// Build the per-cashier bonus report from the cashier sales series.
pub fn bonus_report(cashier_sales: &LabeledSeries) -> Vec<BonusRecord> {
    cashier_sales
        .labels
        .iter()
        .zip(&cashier_sales.values)
        .map(|(name, &total_sales)| BonusRecord {
            name: name.clone(),
            total_sales,
            bonus: (total_sales * BONUS_RATE * 100.0).round() / 100.0,
        })
        .collect()
}

/// Per-employee approval toggles for the bonus table.
///
/// Ephemeral by design: this state lives only for the current session and is
/// never persisted or sent to the API. Callers own an instance and pass it
/// explicitly; there is no ambient global.
#[derive(Debug, Clone, Default)]
pub struct BonusApprovals {
    statuses: HashMap<String, ApprovalStatus>,
}

impl BonusApprovals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an employee's status. Idempotent: setting the same status twice
    /// has no additional effect.
    pub fn set(&mut self, name: &str, status: ApprovalStatus) {
        self.statuses.insert(name.to_string(), status);
    }

    /// Current status for an employee, defaulting to `NotApproved`.
    pub fn status(&self, name: &str) -> ApprovalStatus {
        self.statuses
            .get(name)
            .copied()
            .unwrap_or(ApprovalStatus::NotApproved)
    }
}
