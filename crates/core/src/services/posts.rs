use std::collections::{HashMap, HashSet};

use anyhow::anyhow;
use futures::future::try_join_all;
use sqlx::PgConnection;
use sns_database::{OrderDirection, QueryCriteria, SqlxCrud, SqlxFilterQuery};

use crate::services::users::find_user;
use crate::{IconStore, Like, ListQuery, Post, PostDto, PostUserDto, SnsError, User};

pub async fn find_post(conn: &mut PgConnection, post_id: i32) -> Result<Post, SnsError> {
    let criteria = QueryCriteria::new()
        .add_valued_filter("id", "=", post_id);
    Post::find_one_by_criteria(criteria, &mut *conn).await?
        .ok_or_else(|| SnsError::NotFound(format!("Post:{} not found.", post_id)))
}

/// Newest posts first, optionally only those of `owner`. An unknown owner has no posts.
pub async fn find_posts(
    conn: &mut PgConnection,
    icons: &dyn IconStore,
    viewer: &User,
    owner: Option<&str>,
    query: &ListQuery,
) -> Result<Vec<PostDto>, SnsError> {
    let mut criteria = QueryCriteria::new();
    if let Some(owner) = owner {
        let Some(owner) = find_user(conn, owner).await? else {
            return Ok(Vec::new());
        };
        criteria = criteria.add_valued_filter("userId", "=", owner.id);
    }

    let criteria = criteria
        .order_by("posted_at", OrderDirection::Desc)
        .order_by("id", OrderDirection::Desc)
        .limit(query.limit())
        .offset(query.offset());

    let posts = Post::find_by_criteria(criteria, &mut *conn).await?;
    to_dtos(conn, icons, posts, viewer.id).await
}

pub async fn create_post(
    conn: &mut PgConnection,
    icons: &dyn IconStore,
    user: &User,
    content: String,
) -> Result<PostDto, SnsError> {
    let post = Post::new(content, user.id).create(&mut *conn).await?;
    tracing::debug!(post_id = post.id, user_id = user.id, "created post");

    Ok(PostDto {
        id: post.id,
        post_type: post.post_type,
        content: post.content,
        user: PostUserDto {
            username: user.username.clone(),
            icon_image: icons.get_icon(&user.username).await?,
        },
        posted_at: post.posted_at,
        like_count: 0,
        is_liked: false,
    })
}

pub async fn update_post(
    conn: &mut PgConnection,
    icons: &dyn IconStore,
    user: &User,
    post_id: i32,
    content: String,
) -> Result<PostDto, SnsError> {
    let mut post = find_post(conn, post_id).await?;
    if !post.is_owned_by(user) {
        return Err(SnsError::Forbidden(format!(
            "User:{} cannot update Post:{}.",
            user.username, post.id
        )));
    }

    post.content = content;
    let post = post.update(&mut *conn).await?;

    to_dtos(conn, icons, vec![post], user.id).await?
        .pop()
        .ok_or_else(|| SnsError::Internal(anyhow!("Post:{} vanished during update", post_id)))
}

/// Deletes the post; its likes go with it.
pub async fn delete_post(conn: &mut PgConnection, user: &User, post_id: i32) -> Result<(), SnsError> {
    let post = find_post(conn, post_id).await?;
    if !post.is_owned_by(user) {
        return Err(SnsError::Forbidden(format!(
            "User:{} cannot delete Post:{}.",
            user.username, post.id
        )));
    }

    post.delete(&mut *conn).await?;
    Ok(())
}

async fn to_dtos(
    conn: &mut PgConnection,
    icons: &dyn IconStore,
    posts: Vec<Post>,
    viewer_id: i32,
) -> Result<Vec<PostDto>, SnsError> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }

    let post_ids: Vec<i32> = posts.iter().map(|p| p.id).collect();
    let mut author_ids: Vec<i32> = posts.iter().map(|p| p.user_id).collect();
    author_ids.sort_unstable();
    author_ids.dedup();

    let authors: HashMap<i32, User> = User::find_by_criteria(
        QueryCriteria::new().add_valued_filter("id", "= ANY", author_ids),
        &mut *conn,
    ).await?
        .into_iter()
        .map(|user| (user.id, user))
        .collect();

    let likes = Like::find_by_criteria(
        QueryCriteria::new().add_valued_filter("postsId", "= ANY", post_ids),
        &mut *conn,
    ).await?;

    let mut like_counts: HashMap<i32, i64> = HashMap::new();
    let mut liked_by_viewer: HashSet<i32> = HashSet::new();
    for like in &likes {
        *like_counts.entry(like.post_id).or_default() += 1;
        if like.user_id == viewer_id {
            liked_by_viewer.insert(like.post_id);
        }
    }

    let usernames: Vec<&str> = authors.values().map(|user| user.username.as_str()).collect();
    let icon_images = try_join_all(usernames.iter().map(|username| icons.get_icon(username))).await?;
    let icon_by_username: HashMap<&str, String> = usernames.into_iter().zip(icon_images).collect();

    posts.into_iter().map(|post| {
        let author = authors.get(&post.user_id)
            .ok_or_else(|| SnsError::Internal(anyhow!("Post:{} has no author", post.id)))?;

        Ok(PostDto {
            id: post.id,
            post_type: post.post_type,
            user: PostUserDto {
                username: author.username.clone(),
                icon_image: icon_by_username.get(author.username.as_str()).cloned().unwrap_or_default(),
            },
            content: post.content,
            posted_at: post.posted_at,
            like_count: like_counts.get(&post.id).copied().unwrap_or(0),
            is_liked: liked_by_viewer.contains(&post.id),
        })
    }).collect()
}
