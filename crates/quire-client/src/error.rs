use thiserror::Error;

use quire_core::{PersistenceError, ValidationError};

/// Failure of a client operation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Missing or rejected credentials, or an action that needs a session.
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Transport failure or an unreadable response body.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Any other non-success status from the API.
    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
}

impl ClientError {
    pub fn not_logged_in() -> Self {
        ClientError::Auth("not logged in".to_string())
    }

    /// Login and register report every failure as an authentication error.
    pub(crate) fn into_auth(self) -> Self {
        match self {
            ClientError::Auth(_) | ClientError::Validation(_) => self,
            ClientError::Rejected { message, .. } => ClientError::Auth(message),
            other => ClientError::Auth(other.to_string()),
        }
    }
}
