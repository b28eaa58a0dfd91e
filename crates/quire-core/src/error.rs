use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Password too short: {0} characters (min 6)")]
    PasswordTooShort(usize),

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Invalid blog id: {0:?}")]
    InvalidBlogId(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PersistenceError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Storage write failed for {key}: {reason}")]
    Write { key: String, reason: String },

    #[error("Storage read failed for {key}: {reason}")]
    Read { key: String, reason: String },

    #[error("Serialization error: {0}")]
    Serialization(String),
}
