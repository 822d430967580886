use thiserror::Error;

use crate::infra::error::InfraError;

use super::books::BookError;
use super::repos::RepoError;
use super::reviews::ReviewError;

/// Top-level error for bootstrap and CLI paths. Request handling uses the
/// HTTP error type in `infra::http` instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl AppError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

impl From<BookError> for AppError {
    fn from(error: BookError) -> Self {
        match error {
            BookError::Repo(err) => Self::Repo(err),
            other => Self::Validation(other.to_string()),
        }
    }
}

impl From<ReviewError> for AppError {
    fn from(error: ReviewError) -> Self {
        match error {
            ReviewError::Repo(err) => Self::Repo(err),
            other => Self::Validation(other.to_string()),
        }
    }
}
