//! Budget exceedance detection with once-per-period deduplication.

use std::collections::BTreeMap;
use std::sync::Mutex;

use tracing::info;
use wisewallet_domain::{
    AlertDimension, BudgetAlert, BudgetMonth, BudgetPlan, NotificationState, SpendingSnapshot,
    Username,
};

use crate::format::{CurrencyFormatter, SymbolCurrencyFormatter};
use crate::storage::{
    keys, load_optional, load_or_default, store_value, Domain, KeyValueStore, Namespace,
};
use crate::CoreError;

/// Fixed identifier of the monthly-budget alert.
pub const MONTHLY_NOTIFICATION_ID: i32 = 1001;
/// Base from which category alert identifiers are derived.
pub const CATEGORY_NOTIFICATION_BASE_ID: i32 = 2000;

/// Polynomial (base 31) hash over UTF-16 code units with wrapping `i32`
/// arithmetic, so identifiers are stable across runs and platforms.
pub fn category_hash(category: &str) -> i32 {
    category
        .encode_utf16()
        .fold(0i32, |hash, unit| hash.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

pub fn category_notification_id(category: &str) -> i32 {
    CATEGORY_NOTIFICATION_BASE_ID.wrapping_add(category_hash(category))
}

/// Receives fired alerts. Delivery is fire-and-forget: the notifier never
/// learns whether it succeeded.
pub trait AlertSink: Send + Sync {
    fn deliver(&self, alert: &BudgetAlert);
}

/// Emits alerts to the tracing log only.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AlertSink for LogSink {
    fn deliver(&self, alert: &BudgetAlert) {
        info!(id = alert.id, title = %alert.title, body = %alert.body, "budget alert");
    }
}

/// Keeps every delivered alert in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    alerts: Mutex<Vec<BudgetAlert>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<BudgetAlert> {
        self.alerts
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    pub fn clear(&self) {
        if let Ok(mut guard) = self.alerts.lock() {
            guard.clear();
        }
    }
}

impl AlertSink for RecordingSink {
    fn deliver(&self, alert: &BudgetAlert) {
        if let Ok(mut guard) = self.alerts.lock() {
            guard.push(alert.clone());
        }
    }
}

/// Compares budgets with spending and decides which alerts to raise.
pub struct ExceedanceNotifier {
    formatter: Box<dyn CurrencyFormatter>,
}

impl Default for ExceedanceNotifier {
    fn default() -> Self {
        Self::new(Box::new(SymbolCurrencyFormatter::default()))
    }
}

impl ExceedanceNotifier {
    pub fn new(formatter: Box<dyn CurrencyFormatter>) -> Self {
        Self { formatter }
    }

    /// Evaluates every budget dimension independently. Each dimension that is
    /// over budget and not yet notified yields one alert and is marked
    /// notified in `state`.
    pub fn evaluate(
        &self,
        plan: &BudgetPlan,
        spending: &SpendingSnapshot,
        state: &mut NotificationState,
    ) -> Vec<BudgetAlert> {
        let mut alerts = Vec::new();

        let total_spent = spending.total;
        if plan.monthly_budget > 0.0 && total_spent > plan.monthly_budget && !state.monthly_notified
        {
            let overage = total_spent - plan.monthly_budget;
            alerts.push(BudgetAlert {
                id: MONTHLY_NOTIFICATION_ID,
                dimension: AlertDimension::Monthly,
                title: "Monthly Budget Exceeded".to_string(),
                body: format!(
                    "You've exceeded your monthly budget by {}",
                    self.formatter.format_amount(overage)
                ),
                overage,
            });
            state.mark_monthly_notified();
        }

        for (category, budget) in &plan.category_budgets {
            let spent = spending.spent_in(category);
            if *budget > 0.0 && spent > *budget && !state.is_category_notified(category) {
                let overage = spent - budget;
                alerts.push(BudgetAlert {
                    id: category_notification_id(category),
                    dimension: AlertDimension::Category(category.clone()),
                    title: format!("{category} Budget Exceeded"),
                    body: format!(
                        "You've exceeded your {category} budget by {}",
                        self.formatter.format_amount(overage)
                    ),
                    overage,
                });
                state.mark_category_notified(category.clone());
            }
        }

        alerts
    }
}

/// Per-user persistence of [`NotificationState`].
pub struct NotificationStore;

impl NotificationStore {
    fn namespace(user: &Username) -> Namespace {
        Namespace::user(user, Domain::Notifications)
    }

    pub fn load<S>(store: &S, user: &Username) -> Result<NotificationState, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let ns = Self::namespace(user);
        Ok(NotificationState {
            monthly_notified: load_or_default(store, &ns, keys::MONTHLY_NOTIFIED)?,
            category_notified: load_or_default::<BTreeMap<String, bool>, _>(
                store,
                &ns,
                keys::CATEGORY_NOTIFIED,
            )?,
            period: load_optional::<BudgetMonth, _>(store, &ns, keys::NOTIFIED_PERIOD)?,
        })
    }

    pub fn save<S>(store: &S, user: &Username, state: &NotificationState) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let ns = Self::namespace(user);
        store_value(store, &ns, keys::MONTHLY_NOTIFIED, &state.monthly_notified)?;
        store_value(store, &ns, keys::CATEGORY_NOTIFIED, &state.category_notified)?;
        match &state.period {
            Some(period) => store_value(store, &ns, keys::NOTIFIED_PERIOD, period)?,
            None => store.remove(&ns, keys::NOTIFIED_PERIOD)?,
        }
        Ok(())
    }

    pub fn reset_monthly<S>(store: &S, user: &Username) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        store.remove(&Self::namespace(user), keys::MONTHLY_NOTIFIED)
    }

    pub fn reset_category<S>(store: &S, user: &Username, category: &str) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let ns = Self::namespace(user);
        let mut flags: BTreeMap<String, bool> =
            load_or_default(store, &ns, keys::CATEGORY_NOTIFIED)?;
        flags.remove(category);
        store_value(store, &ns, keys::CATEGORY_NOTIFIED, &flags)
    }

    pub fn reset_all<S>(store: &S, user: &Username) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        store.clear(&Self::namespace(user))
    }
}
