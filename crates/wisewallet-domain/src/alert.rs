use std::fmt;

use serde::{Deserialize, Serialize};

/// Budget dimension an alert refers to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertDimension {
    Monthly,
    Category(String),
}

impl fmt::Display for AlertDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertDimension::Monthly => f.write_str("monthly"),
            AlertDimension::Category(name) => write!(f, "category `{name}`"),
        }
    }
}

/// Outbound exceedance message. `id` is stable per dimension so a repeated
/// alert replaces the previous one in a notification tray.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAlert {
    pub id: i32,
    pub dimension: AlertDimension,
    pub title: String,
    pub body: String,
    /// Amount by which spending exceeds the budget.
    pub overage: f64,
}
