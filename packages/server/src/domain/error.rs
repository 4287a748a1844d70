//! Domain error types.

use thiserror::Error;

/// Value object validation failures (surface as validation errors to the sender).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("client id must not be empty")]
    EmptyClientId,

    #[error("username is too short")]
    EmptyDisplayName,

    #[error("username is too large. Max {max} characters allowed.")]
    DisplayNameTooLong { max: usize },

    #[error("Message cannot be empty")]
    EmptyMessage,

    #[error("Message is too long. Max {max} characters allowed.")]
    MessageTooLong { max: usize },
}

/// Lobby repository failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("too many connections from address '{0}'")]
    AdmissionRejected(String),

    #[error("client '{0}' is not connected")]
    ClientNotFound(String),
}

/// Failures while pushing an event to a client
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),

    #[error("failed to encode message: {0}")]
    EncodeFailed(String),
}

/// Persistence store failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("message store I/O failed: {0}")]
    Io(String),

    #[error("message store record is malformed: {0}")]
    Malformed(String),
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
