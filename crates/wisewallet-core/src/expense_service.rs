//! Per-user expense list persistence.
//!
//! Every mutation loads the full list, edits it in memory, and stores it back.

use tracing::{debug, info};
use wisewallet_domain::{Expense, ExpenseDraft, ExpenseId, Username};

use crate::storage::{keys, load_or_default, store_value, Domain, KeyValueStore, Namespace};
use crate::CoreError;

pub struct ExpenseService;

impl ExpenseService {
    fn namespace(user: &Username) -> Namespace {
        Namespace::user(user, Domain::Expenses)
    }

    /// Returns the user's expenses in insertion order; empty when none were saved.
    pub fn list<S>(store: &S, user: &Username) -> Result<Vec<Expense>, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        load_or_default(store, &Self::namespace(user), keys::EXPENSES)
    }

    /// Replaces the stored list wholesale.
    pub fn save_all<S>(store: &S, user: &Username, expenses: &[Expense]) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        store_value(store, &Self::namespace(user), keys::EXPENSES, expenses)
    }

    pub fn add<S>(store: &S, user: &Username, draft: ExpenseDraft) -> Result<Expense, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let draft = draft.validate()?;
        let mut expenses = Self::list(store, user)?;
        let expense = draft.into_expense(next_id_for(&expenses), user.clone());
        expenses.push(expense.clone());
        Self::save_all(store, user, &expenses)?;
        info!(user = %user, id = expense.id, category = %expense.category, "expense added");
        Ok(expense)
    }

    /// Overwrites the fields of expense `id`. Returns `false` and leaves the
    /// list untouched when no such expense exists.
    pub fn update<S>(
        store: &S,
        user: &Username,
        id: ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<bool, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let draft = draft.validate()?;
        let mut expenses = Self::list(store, user)?;
        let Some(slot) = expenses.iter_mut().find(|expense| expense.id == id) else {
            debug!(user = %user, id, "update ignored, expense not found");
            return Ok(false);
        };
        *slot = draft.into_expense(id, user.clone());
        Self::save_all(store, user, &expenses)?;
        info!(user = %user, id, "expense updated");
        Ok(true)
    }

    /// Removes expense `id`. A missing id is a silent no-op returning `false`.
    pub fn delete<S>(store: &S, user: &Username, id: ExpenseId) -> Result<bool, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let mut expenses = Self::list(store, user)?;
        let before = expenses.len();
        expenses.retain(|expense| expense.id != id);
        if expenses.len() == before {
            debug!(user = %user, id, "delete ignored, expense not found");
            return Ok(false);
        }
        Self::save_all(store, user, &expenses)?;
        info!(user = %user, id, "expense deleted");
        Ok(true)
    }

    pub fn find<S>(store: &S, user: &Username, id: ExpenseId) -> Result<Option<Expense>, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        Ok(Self::list(store, user)?
            .into_iter()
            .find(|expense| expense.id == id))
    }
}

/// One past the current maximum; ids are never reused while higher ones exist.
fn next_id_for(expenses: &[Expense]) -> ExpenseId {
    expenses.iter().map(|expense| expense.id).max().unwrap_or(0) + 1
}

/// Keeps only expenses in `category`; `None` keeps everything.
pub fn filter_by_category<'a>(expenses: &'a [Expense], category: Option<&str>) -> Vec<&'a Expense> {
    match category {
        None => expenses.iter().collect(),
        Some(category) => expenses
            .iter()
            .filter(|expense| expense.category == category)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use chrono::NaiveDate;

    fn draft(title: &str, category: &str, amount: f64) -> ExpenseDraft {
        ExpenseDraft::new(
            title,
            category,
            amount,
            NaiveDate::from_ymd_opt(2026, 10, 2).unwrap(),
        )
    }

    #[test]
    fn ids_increase_and_are_not_reused() {
        let store = MemoryStore::new();
        let user = Username::new("ida");
        let ids: Vec<_> = ["a", "b", "c"]
            .iter()
            .map(|title| ExpenseService::add(&store, &user, draft(title, "Food", 5.0)).unwrap().id)
            .collect();
        assert_eq!(ids, vec![1, 2, 3]);

        assert!(ExpenseService::delete(&store, &user, 2).unwrap());
        let next = ExpenseService::add(&store, &user, draft("d", "Food", 5.0)).unwrap();
        assert_eq!(next.id, 4);
    }

    #[test]
    fn deleting_missing_id_is_noop() {
        let store = MemoryStore::new();
        let user = Username::new("jo");
        ExpenseService::add(&store, &user, draft("Taxi", "Transport", 18.0)).unwrap();
        let before = ExpenseService::list(&store, &user).unwrap();

        assert!(!ExpenseService::delete(&store, &user, 99).unwrap());
        assert_eq!(ExpenseService::list(&store, &user).unwrap(), before);
    }

    #[test]
    fn update_replaces_fields_and_ignores_unknown_ids() {
        let store = MemoryStore::new();
        let user = Username::new("kim");
        let added =
            ExpenseService::add(&store, &user, draft("Cinema", "Entertainment", 12.0)).unwrap();

        let concert = draft("Concert", "Entertainment", 40.0);
        assert!(ExpenseService::update(&store, &user, added.id, concert).unwrap());
        let stored = ExpenseService::find(&store, &user, added.id).unwrap().unwrap();
        assert_eq!(stored.title, "Concert");
        assert_eq!(stored.amount, 40.0);

        assert!(!ExpenseService::update(&store, &user, 42, draft("Ghost", "Food", 1.0)).unwrap());
        assert_eq!(ExpenseService::list(&store, &user).unwrap().len(), 1);
    }

    #[test]
    fn invalid_draft_is_rejected_without_writing() {
        let store = MemoryStore::new();
        let user = Username::new("lee");
        let err = ExpenseService::add(&store, &user, draft("Oops", "Food", 0.0)).unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(ExpenseService::list(&store, &user).unwrap().is_empty());
    }

    #[test]
    fn filter_by_category_matches_exact_name() {
        let store = MemoryStore::new();
        let user = Username::new("max");
        ExpenseService::add(&store, &user, draft("Bread", "Food", 3.0)).unwrap();
        ExpenseService::add(&store, &user, draft("Bus", "Transport", 2.0)).unwrap();
        let expenses = ExpenseService::list(&store, &user).unwrap();

        assert_eq!(filter_by_category(&expenses, None).len(), 2);
        let food = filter_by_category(&expenses, Some("Food"));
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].title, "Bread");
    }
}
