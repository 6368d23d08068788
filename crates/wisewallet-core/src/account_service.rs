//! Sign-up, log-in, profile edits, and per-user data housekeeping.

use tracing::{info, warn};
use wisewallet_domain::{User, Username};

use crate::session::SessionService;
use crate::storage::{copy_namespace, Domain, KeyValueStore, Namespace};
use crate::validation::{
    validate_email, validate_login, validate_new_password, validate_phone, validate_username,
};
use crate::CoreError;

/// Input collected by the sign-up form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

/// Editable profile fields. The password is never changed here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileOutcome {
    pub user: User,
    pub username_changed: bool,
    pub email_changed: bool,
}

impl ProfileOutcome {
    /// A changed username or email ends the session.
    pub fn requires_relogin(&self) -> bool {
        self.username_changed || self.email_changed
    }
}

pub struct AccountService;

impl AccountService {
    /// Registers a new user and logs them in.
    pub fn sign_up<S>(store: &S, form: SignUpForm) -> Result<User, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let username = form.username.trim();
        let email = form.email.trim();
        let phone = form.phone.trim();
        validate_username(username)?;
        validate_email(email)?;
        validate_phone(phone)?;
        validate_new_password(&form.password, &form.confirm_password)?;

        let mut users = SessionService::registered_users(store)?;
        if users.iter().any(|user| user.username.as_str() == username) {
            return Err(CoreError::UsernameTaken(username.to_string()));
        }
        if users.iter().any(|user| user.email == email) {
            return Err(CoreError::EmailTaken(email.to_string()));
        }

        let user = User::new(username, email, form.password, phone);
        users.push(user.clone());
        SessionService::save_registered_users(store, &users)?;
        SessionService::switch_user(store, &user)?;
        info!(user = %user.username, "account registered");
        Ok(user)
    }

    /// Checks the credentials against every registered account.
    pub fn log_in<S>(store: &S, email: &str, password: &str) -> Result<User, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let email = email.trim();
        validate_login(email, password)?;
        let users = SessionService::registered_users(store)?;
        if users.is_empty() {
            return Err(CoreError::NoRegisteredUsers);
        }
        let Some(user) = users
            .into_iter()
            .find(|user| user.matches_credentials(email, password))
        else {
            warn!(email, "login rejected");
            return Err(CoreError::InvalidCredentials);
        };
        SessionService::switch_user(store, &user)?;
        Ok(user)
    }

    pub fn update_profile<S>(
        store: &S,
        current: &User,
        update: ProfileUpdate,
    ) -> Result<ProfileOutcome, CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        let username = update.username.trim();
        let email = update.email.trim();
        let phone = update.phone.trim();
        validate_username(username)?;
        validate_email(email)?;
        validate_phone(phone)?;

        let mut users = SessionService::registered_users(store)?;
        let is_current =
            |user: &User| user.username == current.username && user.email == current.email;
        if users
            .iter()
            .any(|user| !is_current(user) && user.username.as_str() == username)
        {
            return Err(CoreError::UsernameTaken(username.to_string()));
        }
        if users
            .iter()
            .any(|user| !is_current(user) && user.email == email)
        {
            return Err(CoreError::EmailTaken(email.to_string()));
        }

        let updated = User::new(username, email, current.password.clone(), phone);
        let outcome = ProfileOutcome {
            username_changed: updated.username != current.username,
            email_changed: updated.email != current.email,
            user: updated.clone(),
        };
        // Data moves before the account does; a failed move leaves the
        // account on the old name.
        if outcome.username_changed {
            Self::migrate_user_data(store, &current.username, &updated.username)?;
        }
        match users.iter().position(is_current) {
            Some(index) => users[index] = updated.clone(),
            None => users.push(updated.clone()),
        }
        if let Err(err) = Self::commit_profile(store, &users, &updated) {
            if outcome.username_changed {
                if let Err(undo) =
                    Self::migrate_user_data(store, &updated.username, &current.username)
                {
                    warn!(user = %current.username, error = %undo, "profile rollback failed");
                }
            }
            return Err(err);
        }
        if outcome.requires_relogin() {
            SessionService::log_out(store)?;
        }
        info!(
            user = %outcome.user.username,
            relogin = outcome.requires_relogin(),
            "profile updated"
        );
        Ok(outcome)
    }

    fn commit_profile<S>(store: &S, users: &[User], updated: &User) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        SessionService::save_registered_users(store, users)?;
        SessionService::switch_user(store, updated)
    }

    /// Moves every data domain from `from` to `to`, leaving `from` empty.
    pub fn migrate_user_data<S>(store: &S, from: &Username, to: &Username) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        if from == to {
            return Ok(());
        }
        // Every domain is copied before any source is cleared, so a failed
        // copy leaves `from` whole.
        for domain in Domain::ALL {
            copy_namespace(store, &Namespace::user(from, domain), &Namespace::user(to, domain))?;
        }
        for domain in Domain::ALL {
            store.clear(&Namespace::user(from, domain))?;
        }
        info!(from = %from, to = %to, "user data migrated");
        Ok(())
    }

    /// Drops the user's expenses, budgets, and notification flags. Ends the
    /// session too when it belongs to that user.
    pub fn clear_user_data<S>(store: &S, username: &Username) -> Result<(), CoreError>
    where
        S: KeyValueStore + ?Sized,
    {
        for domain in Domain::ALL {
            store.clear(&Namespace::user(username, domain))?;
        }
        let owns_session = SessionService::current_user(store)?
            .is_some_and(|user| &user.username == username);
        if owns_session {
            SessionService::log_out(store)?;
        }
        info!(user = %username, "user data cleared");
        Ok(())
    }
}
