use thiserror::Error;

use skillswap_shared::{CredentialError, PasswordError};
use skillswap_store::StoreError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Access token required")]
    MissingCredential,

    /// Unknown email and wrong password share this variant and message.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken(#[source] CredentialError),
}

/// Every failure a marketplace operation can report.
#[derive(Error, Debug)]
pub enum MarketError {
    /// Missing or malformed input; the client must fix the request.
    #[error("{0}")]
    Validation(String),

    /// Duplicate email or an illegal state transition.
    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Unknown user or request. For requests this also covers "exists but
    /// you are not the recipient".
    #[error("{0}")]
    NotFound(String),

    #[error("Store error: {0}")]
    Store(#[source] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}

impl From<StoreError> for MarketError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound("Record not found".to_string()),
            StoreError::Conflict(msg) => Self::Conflict(msg),
            other => Self::Store(other),
        }
    }
}

impl From<PasswordError> for MarketError {
    fn from(err: PasswordError) -> Self {
        Self::Internal(err.to_string())
    }
}

impl From<CredentialError> for MarketError {
    fn from(err: CredentialError) -> Self {
        Self::Internal(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
