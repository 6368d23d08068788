//! Push-on-write change notifications.
//!
//! Listeners receive the event synchronously after the write that caused it
//! and re-query whatever they display, so the newest state always wins.

use std::sync::{Arc, Mutex};

use tracing::debug;
use wisewallet_domain::Username;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    ExpensesChanged(Username),
    BudgetChanged(Username),
    NotificationsReset(Username),
    SessionChanged(Option<Username>),
}

impl WalletEvent {
    pub fn username(&self) -> Option<&Username> {
        match self {
            WalletEvent::ExpensesChanged(user)
            | WalletEvent::BudgetChanged(user)
            | WalletEvent::NotificationsReset(user) => Some(user),
            WalletEvent::SessionChanged(user) => user.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Listener = Arc<dyn Fn(&WalletEvent) + Send + Sync>;

#[derive(Default)]
struct Subscribers {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

#[derive(Default)]
pub struct ChangeFeed {
    subscribers: Mutex<Subscribers>,
}

impl ChangeFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&WalletEvent) + Send + Sync + 'static,
    {
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        subscribers.next_id += 1;
        let id = SubscriptionId(subscribers.next_id);
        subscribers.listeners.push((id, Arc::new(listener)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = match self.subscribers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = subscribers.listeners.len();
        subscribers.listeners.retain(|(existing, _)| *existing != id);
        subscribers.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.subscribers
            .lock()
            .map(|subscribers| subscribers.listeners.len())
            .unwrap_or_default()
    }

    /// Delivers `event` to every listener in subscription order. Listeners
    /// run outside the lock and may subscribe or unsubscribe.
    pub fn publish(&self, event: &WalletEvent) {
        let listeners: Vec<Listener> = match self.subscribers.lock() {
            Ok(subscribers) => subscribers
                .listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect(),
            Err(_) => return,
        };
        debug!(?event, listeners = listeners.len(), "publishing wallet event");
        for listener in listeners {
            listener(event);
        }
    }
}
