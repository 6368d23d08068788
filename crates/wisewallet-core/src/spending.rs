//! Spending aggregation over a user's expense list.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use wisewallet_domain::{
    BudgetMonth, BudgetOverview, BudgetPlan, BudgetStatus, CategoryBudgetLine, Expense,
    ExpenseOverview, MonthlyChange, SpendingSnapshot,
};

/// Default share of a budget, in percent, after which spending is flagged.
pub const DEFAULT_WARNING_PERCENT: f64 = 80.0;

/// Stateless aggregation utilities that operate over expense slices.
pub struct SpendingAggregator;

impl SpendingAggregator {
    /// Total and per-category spending for the month containing `today`.
    pub fn snapshot(expenses: &[Expense], today: NaiveDate) -> SpendingSnapshot {
        Self::snapshot_for(expenses, BudgetMonth::containing(today))
    }

    pub fn snapshot_for(expenses: &[Expense], month: BudgetMonth) -> SpendingSnapshot {
        let mut per_category: BTreeMap<String, f64> = BTreeMap::new();
        for expense in expenses.iter().filter(|expense| month.contains(expense.date)) {
            *per_category.entry(expense.category.clone()).or_insert(0.0) += expense.amount;
        }
        let total = per_category.values().sum();
        SpendingSnapshot {
            month,
            total,
            per_category,
        }
    }

    pub fn month_total(expenses: &[Expense], month: BudgetMonth) -> f64 {
        expenses
            .iter()
            .filter(|expense| month.contains(expense.date))
            .map(|expense| expense.amount)
            .sum()
    }

    /// Current month against the previous one.
    pub fn monthly_change(expenses: &[Expense], today: NaiveDate) -> MonthlyChange {
        let month = BudgetMonth::containing(today);
        let current = Self::month_total(expenses, month);
        let previous = Self::month_total(expenses, month.previous());
        let percent_change = if previous > 0.0 {
            Some((current - previous) / previous * 100.0)
        } else {
            None
        };
        MonthlyChange {
            current,
            previous,
            percent_change,
        }
    }

    pub fn overview(expenses: &[Expense], today: NaiveDate) -> ExpenseOverview {
        ExpenseOverview {
            total_all_time: expenses.iter().map(|expense| expense.amount).sum(),
            total_this_month: Self::month_total(expenses, BudgetMonth::containing(today)),
            item_count: expenses.len(),
        }
    }

    /// Classifies `spent` against `budget`. A budget of zero is untracked.
    pub fn budget_status(spent: f64, budget: f64, warning_percent: f64) -> BudgetStatus {
        if budget <= 0.0 {
            return BudgetStatus::Unset;
        }
        let percent_used = spent / budget * 100.0;
        if percent_used >= 100.0 {
            BudgetStatus::Exceeded {
                percent_used,
                overage: spent - budget,
            }
        } else if percent_used >= warning_percent {
            BudgetStatus::Warning {
                percent_used,
                remaining: budget - spent,
            }
        } else {
            BudgetStatus::OnTrack {
                percent_used,
                remaining: budget - spent,
            }
        }
    }

    /// Joins a plan with a snapshot into displayable budget lines.
    pub fn budget_overview(
        plan: &BudgetPlan,
        spending: SpendingSnapshot,
        warning_percent: f64,
    ) -> BudgetOverview {
        let monthly_status =
            Self::budget_status(spending.total, plan.monthly_budget, warning_percent);
        let categories = plan
            .category_budgets
            .iter()
            .map(|(category, budget)| {
                let spent = spending.spent_in(category);
                CategoryBudgetLine {
                    category: category.clone(),
                    budget: *budget,
                    spent,
                    status: Self::budget_status(spent, *budget, warning_percent),
                }
            })
            .collect();
        BudgetOverview {
            plan: plan.clone(),
            spending,
            monthly_status,
            categories,
        }
    }
}
