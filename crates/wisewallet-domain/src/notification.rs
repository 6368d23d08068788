use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::period::BudgetMonth;

/// Tracks which budget dimensions already raised an alert this period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationState {
    #[serde(default)]
    pub monthly_notified: bool,
    #[serde(default)]
    pub category_notified: BTreeMap<String, bool>,
    /// Month the flags were last evaluated in; `None` until the first check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<BudgetMonth>,
}

impl NotificationState {
    pub fn is_category_notified(&self, category: &str) -> bool {
        self.category_notified
            .get(category)
            .copied()
            .unwrap_or(false)
    }

    pub fn mark_monthly_notified(&mut self) {
        self.monthly_notified = true;
    }

    pub fn mark_category_notified(&mut self, category: impl Into<String>) {
        self.category_notified.insert(category.into(), true);
    }

    pub fn reset_monthly(&mut self) {
        self.monthly_notified = false;
    }

    pub fn reset_category(&mut self, category: &str) {
        self.category_notified.remove(category);
    }

    /// Clears every flag, as done when a new budget month starts.
    pub fn reset_all(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        !self.monthly_notified && self.category_notified.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_flags_default_to_not_notified() {
        let mut state = NotificationState::default();
        assert!(!state.is_category_notified("Food"));
        state.mark_category_notified("Food");
        assert!(state.is_category_notified("Food"));
        state.reset_category("Food");
        assert!(!state.is_category_notified("Food"));
    }

    #[test]
    fn reset_all_clears_period_and_flags() {
        let mut state = NotificationState {
            monthly_notified: true,
            category_notified: BTreeMap::from([("Rent".to_string(), true)]),
            period: Some(BudgetMonth {
                year: 2026,
                month: 9,
            }),
        };
        state.reset_all();
        assert!(state.is_empty());
        assert!(state.period.is_none());
    }
}
