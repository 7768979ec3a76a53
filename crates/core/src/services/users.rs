use sqlx::PgConnection;
use sns_database::{constraint, QueryCriteria, SqlxCrud, SqlxFilterQuery};

use crate::{SnsError, User};

pub async fn find_user(conn: &mut PgConnection, username: &str) -> Result<Option<User>, SnsError> {
    let criteria = QueryCriteria::new()
        .add_valued_filter("username", "=", username.to_string());
    Ok(User::find_one_by_criteria(criteria, &mut *conn).await?)
}

pub async fn require_user(conn: &mut PgConnection, username: &str) -> Result<User, SnsError> {
    find_user(conn, username).await?
        .ok_or_else(|| SnsError::NotFound(format!("User:{} not found.", username)))
}

/// Resolves a verified username to its row, creating the row on first sign-in.
///
/// Must run outside a transaction: losing the insert race to a concurrent
/// first sign-in is answered by reading the winner's row.
pub async fn get_or_save_user(conn: &mut PgConnection, username: &str) -> Result<User, SnsError> {
    if let Some(user) = find_user(conn, username).await? {
        return Ok(user);
    }

    match User::new(username).create(&mut *conn).await {
        Ok(user) => {
            tracing::info!(user_id = user.id, username, "registered user on first sign-in");
            Ok(user)
        }
        Err(err) if constraint::is_unique_violation(&err) => require_user(conn, username).await,
        Err(err) => Err(err.into()),
    }
}

/// Profile text of `username`, `""` when never set.
pub async fn get_profile(conn: &mut PgConnection, username: &str) -> Result<String, SnsError> {
    Ok(require_user(conn, username).await?.profile_text())
}

pub async fn update_profile(conn: &mut PgConnection, username: &str, profile: String) -> Result<String, SnsError> {
    let mut user = require_user(conn, username).await?;
    user.profile = Some(profile);
    let user = user.update(&mut *conn).await?;
    Ok(user.profile_text())
}
