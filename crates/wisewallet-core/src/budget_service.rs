use std::collections::BTreeMap;

use tracing::info;
use wisewallet_domain::{validate_budget_amount, BudgetPlan, Field, Username, ValidationError};

use crate::storage::{keys, load_or_default, store_value, Domain, KeyValueStore, Namespace};
use crate::CoreError;

/// Per-user budget persistence: one monthly limit plus a category map.
pub struct BudgetService;

impl BudgetService {
    fn namespace(user: &Username) -> Namespace {
        Namespace::user(user, Domain::Budget)
    }

    pub fn monthly_budget<S>(store: &S, user: &Username) -> Result<f64, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        load_or_default(store, &Self::namespace(user), keys::MONTHLY_BUDGET)
    }

    pub fn set_monthly_budget<S>(store: &S, user: &Username, amount: f64) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let amount = validate_budget_amount(amount)?;
        store_value(store, &Self::namespace(user), keys::MONTHLY_BUDGET, &amount)?;
        info!(user = %user, amount, "monthly budget saved");
        Ok(())
    }

    pub fn category_budgets<S>(
        store: &S,
        user: &Username,
    ) -> Result<BTreeMap<String, f64>, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        load_or_default(store, &Self::namespace(user), keys::CATEGORY_BUDGETS)
    }

    /// Sets the limit for one category, keeping the others as they are.
    pub fn set_category_budget<S>(
        store: &S,
        user: &Username,
        category: &str,
        amount: f64,
    ) -> Result<String, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let category = category.trim();
        if category.is_empty() {
            return Err(ValidationError::new(Field::Category, "Please select a category").into());
        }
        let amount = validate_budget_amount(amount)?;
        let mut budgets = Self::category_budgets(store, user)?;
        budgets.insert(category.to_string(), amount);
        store_value(store, &Self::namespace(user), keys::CATEGORY_BUDGETS, &budgets)?;
        info!(user = %user, category, amount, "category budget saved");
        Ok(category.to_string())
    }

    pub fn plan<S>(store: &S, user: &Username) -> Result<BudgetPlan, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        Ok(BudgetPlan::new(
            Self::monthly_budget(store, user)?,
            Self::category_budgets(store, user)?,
        ))
    }
}
