use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Malformed credential")]
    Malformed,

    #[error("Credential signature does not verify")]
    BadSignature,

    #[error("Credential expired")]
    Expired,

    #[error("Credential encoding failed: {0}")]
    Encoding(String),

    #[error("Invalid signing key: {0}")]
    InvalidKey(String),
}

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashFailed(String),

    #[error("Stored password hash is not a valid PHC string")]
    CorruptHash,
}
