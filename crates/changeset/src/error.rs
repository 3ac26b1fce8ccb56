use thiserror::Error;

use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum ChangesetError {
    #[error("invalid changeset input: {0}")]
    Validation(#[from] ValidationError),
    #[error("changeset config parse failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl ChangesetError {
    /// The underlying validation failure, if this is one.
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            ChangesetError::Validation(err) => Some(err),
            ChangesetError::Json(_) => None,
        }
    }
}

/// Error type returned by change listeners.
pub type ListenerError = Box<dyn std::error::Error + 'static>;
