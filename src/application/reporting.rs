use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::Cents;

/// Spending breakdown by category over an inclusive date window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    /// Sorted by total descending; empty when nothing was spent in the window.
    pub categories: Vec<CategorySummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub category: String,
    pub total: Cents,
    /// Share of the window's grand total, 0-100, unrounded.
    pub percentage: f64,
}

/// Month-over-month totals across the entire ledger, year-agnostic:
/// August 2023 and August 2024 land in the same bucket. Callers needing
/// per-year trends must filter the ledger first; that is a documented
/// limitation of this report, not a bug.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyReport {
    /// Ascending by month number; months with no entries are absent.
    pub months: Vec<MonthSummary>,
    pub total: Cents,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthSummary {
    pub month_number: u32,
    pub month_name: String,
    pub total: Cents,
}
