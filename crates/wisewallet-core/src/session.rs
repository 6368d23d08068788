//! Who is logged in, and who is registered.
//!
//! Both live in the global namespace. Logging out forgets the session only;
//! the user's data stays where it was.

use tracing::info;
use wisewallet_domain::{User, Username};

use crate::storage::{keys, load_optional, load_or_default, store_value, KeyValueStore, Namespace};
use crate::CoreError;

/// Username used for data access when nobody is logged in.
pub const DEFAULT_USERNAME: &str = "DefaultUser";

pub struct SessionService;

impl SessionService {
    pub fn current_user<S>(store: &S) -> Result<Option<User>, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        load_optional(store, &Namespace::Global, keys::CURRENT_USER)
    }

    /// The active username, or [`DEFAULT_USERNAME`] without a session.
    pub fn current_username<S>(store: &S) -> Result<Username, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        Ok(Self::current_user(store)?
            .map(|user| user.username)
            .unwrap_or_else(|| Username::new(DEFAULT_USERNAME)))
    }

    pub fn require_user<S>(store: &S) -> Result<User, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        Self::current_user(store)?.ok_or(CoreError::NoActiveSession)
    }

    pub fn switch_user<S>(store: &S, user: &User) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        store_value(store, &Namespace::Global, keys::CURRENT_USER, user)?;
        info!(user = %user.username, "session started");
        Ok(())
    }

    pub fn log_out<S>(store: &S) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        store.remove(&Namespace::Global, keys::CURRENT_USER)?;
        info!("session ended");
        Ok(())
    }

    pub fn registered_users<S>(store: &S) -> Result<Vec<User>, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        load_or_default(store, &Namespace::Global, keys::ALL_USERS)
    }

    pub fn save_registered_users<S>(store: &S, users: &[User]) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        store_value(store, &Namespace::Global, keys::ALL_USERS, users)
    }
}
