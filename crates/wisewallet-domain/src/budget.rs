use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A user's spending limits. Zero means "not tracked".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BudgetPlan {
    #[serde(default)]
    pub monthly_budget: f64,
    #[serde(default)]
    pub category_budgets: BTreeMap<String, f64>,
}

impl BudgetPlan {
    pub fn new(monthly_budget: f64, category_budgets: BTreeMap<String, f64>) -> Self {
        Self {
            monthly_budget,
            category_budgets,
        }
    }

    pub fn has_monthly_budget(&self) -> bool {
        self.monthly_budget > 0.0
    }
}
