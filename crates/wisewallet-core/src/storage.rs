//! Keyed persistence abstraction shared by every store in the wallet.
//!
//! Values live under a structured [`Namespace`] (global, or one user's data
//! domain) and a field key inside it. Values are JSON documents so any backend
//! that can persist `serde_json::Value` can host a wallet.

use std::{collections::BTreeMap, fmt};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::warn;
use wisewallet_domain::Username;

use crate::CoreError;

/// Field keys used inside each namespace.
pub mod keys {
    pub const EXPENSES: &str = "expenses";
    pub const MONTHLY_BUDGET: &str = "monthly_budget";
    pub const CATEGORY_BUDGETS: &str = "category_budgets";
    pub const MONTHLY_NOTIFIED: &str = "monthly_notified";
    pub const CATEGORY_NOTIFIED: &str = "category_notified";
    pub const NOTIFIED_PERIOD: &str = "notified_period";
    pub const CURRENT_USER: &str = "CURRENT_USER";
    pub const ALL_USERS: &str = "ALL_USERS";
}

/// Per-user data partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Domain {
    Expenses,
    Budget,
    Notifications,
}

impl Domain {
    pub const ALL: [Domain; 3] = [Domain::Expenses, Domain::Budget, Domain::Notifications];

    pub fn as_str(&self) -> &'static str {
        match self {
            Domain::Expenses => "expenses",
            Domain::Budget => "budget",
            Domain::Notifications => "notifications",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured store partition: either shared application state or one
/// domain of one user's data.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Namespace {
    Global,
    User { username: Username, domain: Domain },
}

impl Namespace {
    pub fn user(username: &Username, domain: Domain) -> Self {
        Namespace::User {
            username: username.clone(),
            domain,
        }
    }

    pub fn username(&self) -> Option<&Username> {
        match self {
            Namespace::Global => None,
            Namespace::User { username, .. } => Some(username),
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Namespace::Global => f.write_str("global"),
            Namespace::User { username, domain } => write!(f, "{username}/{domain}"),
        }
    }
}

/// Abstraction over durable key-value backends.
///
/// A write must be observable by any subsequent read on the same store.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, namespace: &Namespace, key: &str) -> Result<Option<Value>, CoreError>;
    fn put(&self, namespace: &Namespace, key: &str, value: Value) -> Result<(), CoreError>;
    fn remove(&self, namespace: &Namespace, key: &str) -> Result<(), CoreError>;
    fn entries(&self, namespace: &Namespace) -> Result<BTreeMap<String, Value>, CoreError>;
    fn clear(&self, namespace: &Namespace) -> Result<(), CoreError>;

    /// Replaces the whole namespace with `entries`. Backends that can write a
    /// namespace in one step should override this.
    fn replace_all(
        &self,
        namespace: &Namespace,
        entries: BTreeMap<String, Value>,
    ) -> Result<(), CoreError> {
        self.clear(namespace)?;
        for (key, value) in entries {
            self.put(namespace, &key, value)?;
        }
        Ok(())
    }
}

/// Reads `key` and decodes it, falling back to `T::default()` when the value
/// is absent or cannot be decoded.
pub fn load_or_default<T, S>(store: &S, namespace: &Namespace, key: &str) -> Result<T, CoreError>
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(value) = store.get(namespace, key)? else {
        return Ok(T::default());
    };
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(decoded),
        Err(err) => {
            warn!(%namespace, key, error = %err, "malformed stored value, using default");
            Ok(T::default())
        }
    }
}

/// Like [`load_or_default`] but keeps absence distinct from a default value.
pub fn load_optional<T, S>(
    store: &S,
    namespace: &Namespace,
    key: &str,
) -> Result<Option<T>, CoreError>
where
    T: DeserializeOwned,
    S: KeyValueStore + ?Sized,
{
    let Some(value) = store.get(namespace, key)? else {
        return Ok(None);
    };
    match serde_json::from_value(value) {
        Ok(decoded) => Ok(Some(decoded)),
        Err(err) => {
            warn!(%namespace, key, error = %err, "malformed stored value, ignoring");
            Ok(None)
        }
    }
}

/// Encodes `value` and writes it under `key`.
pub fn store_value<T, S>(
    store: &S,
    namespace: &Namespace,
    key: &str,
    value: &T,
) -> Result<(), CoreError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let encoded = serde_json::to_value(value)?;
    store.put(namespace, key, encoded)
}

/// Copies every entry of `from` into `to`, replacing what `to` held.
pub fn copy_namespace<S>(store: &S, from: &Namespace, to: &Namespace) -> Result<(), CoreError>
where
    S: KeyValueStore + ?Sized,
{
    let entries = store.entries(from)?;
    store.replace_all(to, entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use serde_json::json;

    #[test]
    fn malformed_value_degrades_to_default() {
        let store = MemoryStore::new();
        let ns = Namespace::user(&Username::new("dana"), Domain::Budget);
        store
            .put(&ns, keys::CATEGORY_BUDGETS, json!("not a map"))
            .unwrap();
        let budgets: BTreeMap<String, f64> =
            load_or_default(&store, &ns, keys::CATEGORY_BUDGETS).unwrap();
        assert!(budgets.is_empty());
    }

    #[test]
    fn copy_namespace_replaces_destination() {
        let store = MemoryStore::new();
        let from = Namespace::user(&Username::new("old"), Domain::Budget);
        let to = Namespace::user(&Username::new("new"), Domain::Budget);
        store.put(&from, keys::MONTHLY_BUDGET, json!(400.0)).unwrap();
        store.put(&to, "stale", json!(true)).unwrap();

        copy_namespace(&store, &from, &to).unwrap();

        let copied = store.entries(&to).unwrap();
        assert_eq!(copied.len(), 1);
        assert_eq!(copied.get(keys::MONTHLY_BUDGET), Some(&json!(400.0)));
    }

    #[test]
    fn namespaces_display_user_and_domain() {
        let ns = Namespace::user(&Username::new("erin"), Domain::Notifications);
        assert_eq!(ns.to_string(), "erin/notifications");
        assert_eq!(Namespace::Global.to_string(), "global");
    }
}
