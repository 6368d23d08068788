//! Derived spending figures. Never persisted; always recomputed from expenses.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::budget::BudgetPlan;
use crate::period::BudgetMonth;

/// Spending for one budget month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpendingSnapshot {
    pub month: BudgetMonth,
    pub total: f64,
    pub per_category: BTreeMap<String, f64>,
}

impl SpendingSnapshot {
    pub fn spent_in(&self, category: &str) -> f64 {
        self.per_category.get(category).copied().unwrap_or(0.0)
    }
}

/// Where a dimension's spending sits relative to its budget.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BudgetStatus {
    /// No budget configured (zero or absent).
    Unset,
    OnTrack { percent_used: f64, remaining: f64 },
    /// Spending crossed the warning threshold but not the budget.
    Warning { percent_used: f64, remaining: f64 },
    Exceeded { percent_used: f64, overage: f64 },
}

impl BudgetStatus {
    pub fn percent_used(&self) -> Option<f64> {
        match *self {
            BudgetStatus::Unset => None,
            BudgetStatus::OnTrack { percent_used, .. }
            | BudgetStatus::Warning { percent_used, .. }
            | BudgetStatus::Exceeded { percent_used, .. } => Some(percent_used),
        }
    }

    pub fn is_exceeded(&self) -> bool {
        matches!(self, BudgetStatus::Exceeded { .. })
    }
}

/// Per-category line of a budget overview.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryBudgetLine {
    pub category: String,
    pub budget: f64,
    pub spent: f64,
    pub status: BudgetStatus,
}

/// Budget plan joined with the current month's spending.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetOverview {
    pub plan: BudgetPlan,
    pub spending: SpendingSnapshot,
    pub monthly_status: BudgetStatus,
    pub categories: Vec<CategoryBudgetLine>,
}

/// Comparison of the current month with the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonthlyChange {
    pub current: f64,
    pub previous: f64,
    /// `None` when nothing was spent in the previous month.
    pub percent_change: Option<f64>,
}

/// Headline figures for an expense list.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpenseOverview {
    pub total_all_time: f64,
    pub total_this_month: f64,
    pub item_count: usize,
}
