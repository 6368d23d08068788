//! Registered users and the identifier that partitions their data.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Username that namespaces every per-user store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Username {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Username {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A locally registered account. The password is stored as entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: Username,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
}

impl User {
    pub fn new(
        username: impl Into<Username>,
        email: impl Into<String>,
        password: impl Into<String>,
        phone: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            phone: phone.into(),
        }
    }

    /// Returns `true` when the supplied credentials match exactly.
    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_serializes_as_plain_string() {
        let user = User::new("alice", "alice@example.com", "secret1", "");
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["username"], "alice");
    }

    #[test]
    fn credentials_compare_email_and_password() {
        let user = User::new("bob", "bob@example.com", "hunter22", "555-0100");
        assert!(user.matches_credentials("bob@example.com", "hunter22"));
        assert!(!user.matches_credentials("bob@example.com", "hunter2"));
        assert!(!user.matches_credentials("bob", "hunter22"));
    }
}
