use sqlx::PgConnection;
use sns_database::{QueryCriteria, SqlxCrud, SqlxFilterQuery};

use crate::services::posts::find_post;
use crate::{Like, SnsError, User};

pub async fn count_likes(conn: &mut PgConnection, post_id: i32) -> Result<i64, SnsError> {
    let criteria = QueryCriteria::new()
        .add_valued_filter("postsId", "=", post_id);
    Ok(Like::count_by_criteria(criteria, &mut *conn).await?)
}

pub async fn has_liked(conn: &mut PgConnection, post_id: i32, user_id: i32) -> Result<bool, SnsError> {
    let criteria = QueryCriteria::new()
        .add_valued_filter("postsId", "=", post_id)
        .add_valued_filter("usersId", "=", user_id);
    Ok(Like::find_one_by_criteria(criteria, &mut *conn).await?.is_some())
}

/// Records `user`'s like of the post and returns the post's new like count.
pub async fn like_post(conn: &mut PgConnection, user: &User, post_id: i32) -> Result<i64, SnsError> {
    let post = find_post(conn, post_id).await?;

    if has_liked(conn, post.id, user.id).await? {
        return Err(SnsError::Validation(format!(
            "User:{} has already liked Post:{}.",
            user.username, post.id
        )));
    }

    Like::new(post.id, user.id).create(&mut *conn).await?;
    count_likes(conn, post.id).await
}

/// Removes `user`'s like of the post and returns the post's new like count.
pub async fn unlike_post(conn: &mut PgConnection, user: &User, post_id: i32) -> Result<i64, SnsError> {
    let post = find_post(conn, post_id).await?;

    let removed = Like::new(post.id, user.id).delete(&mut *conn).await?;
    if removed == 0 {
        return Err(SnsError::Validation(format!(
            "User:{} has not liked Post:{}.",
            user.username, post.id
        )));
    }

    count_likes(conn, post.id).await
}
