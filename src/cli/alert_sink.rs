use std::collections::BTreeMap;
use std::sync::Mutex;

use tracing::info;
use wisewallet_core::AlertSink;
use wisewallet_domain::BudgetAlert;

use crate::cli::output;

/// Prints alerts as they fire and keeps the latest one per notification id,
/// so a repeated alert for the same budget replaces the earlier entry.
#[derive(Debug, Default)]
pub struct TerminalAlertSink {
    tray: Mutex<BTreeMap<i32, BudgetAlert>>,
}

impl TerminalAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tray(&self) -> Vec<BudgetAlert> {
        self.tray
            .lock()
            .map(|guard| guard.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Alerts waiting in the tray.
    pub fn pending(&self) -> usize {
        self.tray.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn dismiss_all(&self) -> usize {
        self.tray
            .lock()
            .map(|mut guard| {
                let count = guard.len();
                guard.clear();
                count
            })
            .unwrap_or(0)
    }
}

impl AlertSink for TerminalAlertSink {
    fn deliver(&self, alert: &BudgetAlert) {
        info!(id = alert.id, dimension = %alert.dimension, "budget alert delivered");
        output::alert(format!("{}: {}", alert.title, alert.body));
        if let Ok(mut guard) = self.tray.lock() {
            guard.insert(alert.id, alert.clone());
        }
    }
}
