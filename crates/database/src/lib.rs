mod postgres_connect;
mod sqlx_postgres;

pub use sqlx_postgres::*;
pub use sns_db_macros::SqlxObject;

/// Maps a sqlx error to the constraint class it violated, if any.
pub mod constraint {
    use sqlx::Error as SqlxError;

    const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

    pub fn is_unique_violation(err: &SqlxError) -> bool {
        matches!(err, SqlxError::Database(db_err) if db_err.is_unique_violation())
    }

    pub fn is_foreign_key_violation(err: &SqlxError) -> bool {
        matches!(err, SqlxError::Database(db_err) if db_err.is_foreign_key_violation())
    }

    /// CHECK constraints and values too long for their VARCHAR column.
    pub fn is_value_violation(err: &SqlxError) -> bool {
        match err {
            SqlxError::Database(db_err) => {
                db_err.is_check_violation()
                    || db_err.code().as_deref() == Some(STRING_DATA_RIGHT_TRUNCATION)
            }
            _ => false,
        }
    }
}

#[doc(hidden)]
pub mod __private {
    pub use anyhow;
    pub use sqlx;
    pub use tokio;
    pub use tracing;
}
