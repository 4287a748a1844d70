//! UseCase layer error types.

use thiserror::Error;

use crate::domain::{RepositoryError, ValueObjectError};

/// Connection could not be admitted (admission error, closes the connection)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConnectError {
    #[error("too many connections from address '{0}'")]
    AdmissionRejected(String),

    #[error(transparent)]
    Repository(RepositoryError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetDisplayNameError {
    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    #[error("client '{0}' is not connected")]
    ClientNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error(transparent)]
    Validation(#[from] ValueObjectError),

    /// The sender has not chosen a display name yet
    #[error("User not found. Please set a username before sending messages.")]
    NotJoined,

    /// Rejected by the content filter
    #[error("Your message contains inappropriate content and cannot be sent.")]
    Flagged,
}
