use sns_database::constraint;
use thiserror::Error;

/// Failures of the domain services. The API layer maps each variant to a status code.
#[derive(Debug, Error)]
pub enum SnsError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Unauthenticated(String),

    #[error("database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for SnsError {
    fn from(err: sqlx::Error) -> Self {
        if constraint::is_unique_violation(&err)
            || constraint::is_value_violation(&err)
            || constraint::is_foreign_key_violation(&err)
        {
            SnsError::Validation(err.to_string())
        } else {
            SnsError::Database(err)
        }
    }
}

impl From<validator::ValidationErrors> for SnsError {
    fn from(err: validator::ValidationErrors) -> Self {
        SnsError::Validation(err.to_string())
    }
}
