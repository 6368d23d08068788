use thiserror::Error;
use wisewallet_domain::ValidationError;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Username already taken: {0}")]
    UsernameTaken(String),
    #[error("Email already in use: {0}")]
    EmailTaken(String),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("No user found. Please sign up first")]
    NoRegisteredUsers,
    #[error("No user is logged in")]
    NoActiveSession,
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Serialization error: {0}")]
    Serde(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serde(err.to_string())
    }
}
