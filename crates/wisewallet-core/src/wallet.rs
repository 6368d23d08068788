//! Facade tying the stores, the aggregator, and the notifier together.
//!
//! Every data operation names the user explicitly. Mutations persist first,
//! then publish a [`WalletEvent`], then re-check budgets and deliver whatever
//! alerts fire to the configured [`AlertSink`].

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use wisewallet_domain::{
    BudgetAlert, BudgetMonth, BudgetOverview, BudgetPlan, Expense, ExpenseDraft, ExpenseId,
    ExpenseOverview, MonthlyChange, NotificationState, SpendingSnapshot, User, Username,
};

use crate::account_service::{AccountService, ProfileOutcome, ProfileUpdate, SignUpForm};
use crate::budget_service::BudgetService;
use crate::events::{ChangeFeed, WalletEvent};
use crate::expense_service::{filter_by_category, ExpenseService};
use crate::format::CurrencyFormatter;
use crate::notifier::{AlertSink, ExceedanceNotifier, LogSink, NotificationStore};
use crate::session::SessionService;
use crate::spending::{SpendingAggregator, DEFAULT_WARNING_PERCENT};
use crate::storage::KeyValueStore;
use crate::time::{Clock, SystemClock};
use crate::CoreError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WalletSettings {
    /// Percentage of a budget at which spending is shown as a warning.
    pub warning_percent: f64,
    /// Clear notification flags automatically when a check happens in a new
    /// budget month.
    pub auto_month_rollover: bool,
}

impl Default for WalletSettings {
    fn default() -> Self {
        Self {
            warning_percent: DEFAULT_WARNING_PERCENT,
            auto_month_rollover: true,
        }
    }
}

/// Result of a mutation together with the alerts it triggered.
#[derive(Debug, Clone, PartialEq)]
pub struct WalletUpdate<T> {
    pub value: T,
    pub alerts: Vec<BudgetAlert>,
}

pub struct Wallet<S: KeyValueStore> {
    store: S,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn AlertSink>,
    notifier: ExceedanceNotifier,
    feed: ChangeFeed,
    settings: WalletSettings,
}

impl<S: KeyValueStore> Wallet<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            sink: Arc::new(LogSink),
            notifier: ExceedanceNotifier::default(),
            feed: ChangeFeed::new(),
            settings: WalletSettings::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_alert_sink(mut self, sink: Arc<dyn AlertSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_settings(mut self, settings: WalletSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_formatter(mut self, formatter: Box<dyn CurrencyFormatter>) -> Self {
        self.notifier = ExceedanceNotifier::new(formatter);
        self
    }

    pub fn set_clock(&mut self, clock: Arc<dyn Clock>) {
        self.clock = clock;
    }

    pub fn set_settings(&mut self, settings: WalletSettings) {
        self.settings = settings;
    }

    pub fn set_formatter(&mut self, formatter: Box<dyn CurrencyFormatter>) {
        self.notifier = ExceedanceNotifier::new(formatter);
    }

    pub fn settings(&self) -> WalletSettings {
        self.settings
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn feed(&self) -> &ChangeFeed {
        &self.feed
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn local_hour(&self) -> u32 {
        self.clock.local_hour()
    }

    pub fn current_month(&self) -> BudgetMonth {
        BudgetMonth::containing(self.today())
    }

    // Session and accounts

    pub fn current_user(&self) -> Result<Option<User>, CoreError> {
        SessionService::current_user(&self.store)
    }

    pub fn current_username(&self) -> Result<Username, CoreError> {
        SessionService::current_username(&self.store)
    }

    pub fn require_user(&self) -> Result<User, CoreError> {
        SessionService::require_user(&self.store)
    }

    pub fn registered_users(&self) -> Result<Vec<User>, CoreError> {
        SessionService::registered_users(&self.store)
    }

    pub fn sign_up(&self, form: SignUpForm) -> Result<User, CoreError> {
        let user = AccountService::sign_up(&self.store, form)?;
        self.feed.publish(&WalletEvent::SessionChanged(Some(user.username.clone())));
        Ok(user)
    }

    pub fn log_in(&self, email: &str, password: &str) -> Result<User, CoreError> {
        let user = AccountService::log_in(&self.store, email, password)?;
        self.feed.publish(&WalletEvent::SessionChanged(Some(user.username.clone())));
        Ok(user)
    }

    pub fn switch_user(&self, user: &User) -> Result<(), CoreError> {
        SessionService::switch_user(&self.store, user)?;
        self.feed.publish(&WalletEvent::SessionChanged(Some(user.username.clone())));
        Ok(())
    }

    pub fn log_out(&self) -> Result<(), CoreError> {
        SessionService::log_out(&self.store)?;
        self.feed.publish(&WalletEvent::SessionChanged(None));
        Ok(())
    }

    pub fn update_profile(
        &self,
        current: &User,
        update: ProfileUpdate,
    ) -> Result<ProfileOutcome, CoreError> {
        let outcome = AccountService::update_profile(&self.store, current, update)?;
        if outcome.username_changed {
            let renamed = outcome.user.username.clone();
            self.feed.publish(&WalletEvent::ExpensesChanged(renamed.clone()));
            self.feed.publish(&WalletEvent::BudgetChanged(renamed));
        }
        let session = (!outcome.requires_relogin()).then(|| outcome.user.username.clone());
        self.feed.publish(&WalletEvent::SessionChanged(session));
        Ok(outcome)
    }

    pub fn clear_user_data(&self, user: &Username) -> Result<(), CoreError> {
        AccountService::clear_user_data(&self.store, user)?;
        self.feed.publish(&WalletEvent::ExpensesChanged(user.clone()));
        self.feed.publish(&WalletEvent::BudgetChanged(user.clone()));
        self.feed.publish(&WalletEvent::NotificationsReset(user.clone()));
        Ok(())
    }

    // Expenses

    pub fn expenses(&self, user: &Username) -> Result<Vec<Expense>, CoreError> {
        ExpenseService::list(&self.store, user)
    }

    pub fn expenses_in(
        &self,
        user: &Username,
        category: Option<&str>,
    ) -> Result<Vec<Expense>, CoreError> {
        let expenses = self.expenses(user)?;
        Ok(filter_by_category(&expenses, category)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn find_expense(
        &self,
        user: &Username,
        id: ExpenseId,
    ) -> Result<Option<Expense>, CoreError> {
        ExpenseService::find(&self.store, user, id)
    }

    pub fn add_expense(
        &self,
        user: &Username,
        draft: ExpenseDraft,
    ) -> Result<WalletUpdate<Expense>, CoreError> {
        let expense = ExpenseService::add(&self.store, user, draft)?;
        self.feed.publish(&WalletEvent::ExpensesChanged(user.clone()));
        let alerts = self.check_budget_exceedances(user)?;
        Ok(WalletUpdate {
            value: expense,
            alerts,
        })
    }

    /// `value` is `false` when no expense has that id; nothing changes then.
    pub fn update_expense(
        &self,
        user: &Username,
        id: ExpenseId,
        draft: ExpenseDraft,
    ) -> Result<WalletUpdate<bool>, CoreError> {
        let updated = ExpenseService::update(&self.store, user, id, draft)?;
        self.after_expense_write(user, updated)
    }

    pub fn delete_expense(
        &self,
        user: &Username,
        id: ExpenseId,
    ) -> Result<WalletUpdate<bool>, CoreError> {
        let deleted = ExpenseService::delete(&self.store, user, id)?;
        self.after_expense_write(user, deleted)
    }

    fn after_expense_write(
        &self,
        user: &Username,
        changed: bool,
    ) -> Result<WalletUpdate<bool>, CoreError> {
        if !changed {
            return Ok(WalletUpdate {
                value: false,
                alerts: Vec::new(),
            });
        }
        self.feed.publish(&WalletEvent::ExpensesChanged(user.clone()));
        let alerts = self.check_budget_exceedances(user)?;
        Ok(WalletUpdate {
            value: true,
            alerts,
        })
    }

    // Budgets

    pub fn budget_plan(&self, user: &Username) -> Result<BudgetPlan, CoreError> {
        BudgetService::plan(&self.store, user)
    }

    pub fn monthly_budget(&self, user: &Username) -> Result<f64, CoreError> {
        BudgetService::monthly_budget(&self.store, user)
    }

    pub fn category_budgets(&self, user: &Username) -> Result<BTreeMap<String, f64>, CoreError> {
        BudgetService::category_budgets(&self.store, user)
    }

    /// Saves the monthly limit and re-arms the monthly alert before
    /// re-checking, so a budget that is still exceeded alerts again.
    pub fn save_monthly_budget(
        &self,
        user: &Username,
        amount: f64,
    ) -> Result<Vec<BudgetAlert>, CoreError> {
        BudgetService::set_monthly_budget(&self.store, user, amount)?;
        NotificationStore::reset_monthly(&self.store, user)?;
        self.feed.publish(&WalletEvent::BudgetChanged(user.clone()));
        self.check_budget_exceedances(user)
    }

    pub fn save_category_budget(
        &self,
        user: &Username,
        category: &str,
        amount: f64,
    ) -> Result<Vec<BudgetAlert>, CoreError> {
        let category = BudgetService::set_category_budget(&self.store, user, category, amount)?;
        NotificationStore::reset_category(&self.store, user, &category)?;
        self.feed.publish(&WalletEvent::BudgetChanged(user.clone()));
        self.check_budget_exceedances(user)
    }

    // Notifications

    pub fn notification_state(&self, user: &Username) -> Result<NotificationState, CoreError> {
        NotificationStore::load(&self.store, user)
    }

    /// Clears every notification flag so alerts may fire again.
    pub fn reset_monthly_notifications(&self, user: &Username) -> Result<(), CoreError> {
        NotificationStore::reset_all(&self.store, user)?;
        info!(user = %user, "notification flags reset");
        self.feed.publish(&WalletEvent::NotificationsReset(user.clone()));
        Ok(())
    }

    /// Compares this month's spending with the user's budgets, records which
    /// dimensions have now been notified, and delivers new alerts.
    pub fn check_budget_exceedances(&self, user: &Username) -> Result<Vec<BudgetAlert>, CoreError> {
        let month = self.current_month();
        let original = NotificationStore::load(&self.store, user)?;
        let mut state = original.clone();

        if self.settings.auto_month_rollover {
            if let Some(period) = state.period.filter(|period| *period != month) {
                debug!(user = %user, from = %period, to = %month, "budget month rolled over");
                state.reset_all();
            }
        }
        state.period = Some(month);

        let plan = BudgetService::plan(&self.store, user)?;
        let expenses = ExpenseService::list(&self.store, user)?;
        let spending = SpendingAggregator::snapshot_for(&expenses, month);
        let alerts = self.notifier.evaluate(&plan, &spending, &mut state);

        if state != original {
            NotificationStore::save(&self.store, user, &state)?;
        }
        for alert in &alerts {
            info!(user = %user, id = alert.id, overage = alert.overage, "budget exceeded");
            self.sink.deliver(alert);
        }
        Ok(alerts)
    }

    // Read side

    pub fn spending(&self, user: &Username) -> Result<SpendingSnapshot, CoreError> {
        let expenses = self.expenses(user)?;
        Ok(SpendingAggregator::snapshot(&expenses, self.today()))
    }

    pub fn budget_overview(&self, user: &Username) -> Result<BudgetOverview, CoreError> {
        let plan = self.budget_plan(user)?;
        let spending = self.spending(user)?;
        Ok(SpendingAggregator::budget_overview(
            &plan,
            spending,
            self.settings.warning_percent,
        ))
    }

    pub fn monthly_change(&self, user: &Username) -> Result<MonthlyChange, CoreError> {
        let expenses = self.expenses(user)?;
        Ok(SpendingAggregator::monthly_change(&expenses, self.today()))
    }

    pub fn overview(&self, user: &Username) -> Result<ExpenseOverview, CoreError> {
        let expenses = self.expenses(user)?;
        Ok(SpendingAggregator::overview(&expenses, self.today()))
    }
}
