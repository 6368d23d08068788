//! Expense records and the draft form they are created from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::common::{Field, ValidationError};
use crate::user::Username;

/// Identifier unique within one user's expense list.
pub type ExpenseId = u64;

/// A single recorded expense owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub title: String,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
    pub username: Username,
}

/// User-entered expense fields prior to id assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseDraft {
    pub title: String,
    pub category: String,
    pub amount: f64,
    pub date: NaiveDate,
}

impl ExpenseDraft {
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        date: NaiveDate,
    ) -> Self {
        Self {
            title: title.into(),
            category: category.into(),
            amount,
            date,
        }
    }

    /// Checks the form and returns a trimmed copy ready for storage.
    pub fn validate(&self) -> Result<ExpenseDraft, ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::new(Field::Title, "Title cannot be empty"));
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err(ValidationError::new(
                Field::Category,
                "Please select a category",
            ));
        }
        if !self.amount.is_finite() {
            return Err(ValidationError::new(Field::Amount, "Invalid amount"));
        }
        if self.amount <= 0.0 {
            return Err(ValidationError::new(
                Field::Amount,
                "Amount must be greater than 0",
            ));
        }
        Ok(ExpenseDraft {
            title: title.to_string(),
            category: category.to_string(),
            amount: self.amount,
            date: self.date,
        })
    }

    pub fn into_expense(self, id: ExpenseId, username: Username) -> Expense {
        Expense {
            id,
            title: self.title,
            category: self.category,
            amount: self.amount,
            date: self.date,
            username,
        }
    }
}
