use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Extension, Path, Query, State};
use axum::routing::get;
use axum::{middleware, Json, Router};
use validator::Validate;

use sns_common::ModuleClient;
use sns_core::services::posts;
use sns_core::{ListQuery, PostContentRequest, PostDto, PostList, User};

use crate::middleware::authenticate;
use crate::response::{AppError, AppSuccess};
use crate::routes::parse_post_id;
use crate::GlobalState;

pub fn post_routes(state: GlobalState) -> Router<GlobalState> {
    Router::new()
        .route("/api/posts",
            get(list_posts)
            .post(create_post)
        )

        // `{target}` is an owner's username for GET and a post id otherwise.
        .route("/api/posts/{target}",
            get(list_owner_posts)
            .put(update_post)
            .delete(delete_post)
        )

        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

async fn list_posts(
    State(state): State<GlobalState>,
    Extension(user): Extension<User>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<AppSuccess<PostList>, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let mut tx = state.db.get_client().begin().await?;
    let items = posts::find_posts(&mut tx, state.icons.as_ref(), &user, None, &query).await?;
    tx.commit().await?;

    Ok(AppSuccess::ok(PostList { items }))
}

async fn list_owner_posts(
    State(state): State<GlobalState>,
    Extension(user): Extension<User>,
    Path(owner): Path<String>,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> Result<AppSuccess<PostList>, AppError> {
    let Query(query) = query?;
    query.validate()?;

    let mut tx = state.db.get_client().begin().await?;
    let items = posts::find_posts(&mut tx, state.icons.as_ref(), &user, Some(&owner), &query).await?;
    tx.commit().await?;

    Ok(AppSuccess::ok(PostList { items }))
}

async fn create_post(
    State(state): State<GlobalState>,
    Extension(user): Extension<User>,
    payload: Result<Json<PostContentRequest>, JsonRejection>,
) -> Result<AppSuccess<PostDto>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let mut tx = state.db.get_client().begin().await?;
    let post = posts::create_post(&mut tx, state.icons.as_ref(), &user, payload.content).await?;
    tx.commit().await?;

    tracing::info!(post_id = post.id, username = %user.username, "created post");
    Ok(AppSuccess::created(post))
}

async fn update_post(
    State(state): State<GlobalState>,
    Extension(user): Extension<User>,
    Path(post_id): Path<String>,
    payload: Result<Json<PostContentRequest>, JsonRejection>,
) -> Result<AppSuccess<PostDto>, AppError> {
    let post_id = parse_post_id(&post_id)?;
    let Json(payload) = payload?;
    payload.validate()?;

    let mut tx = state.db.get_client().begin().await?;
    let post = posts::update_post(&mut tx, state.icons.as_ref(), &user, post_id, payload.content).await?;
    tx.commit().await?;

    Ok(AppSuccess::ok(post))
}

async fn delete_post(
    State(state): State<GlobalState>,
    Extension(user): Extension<User>,
    Path(post_id): Path<String>,
) -> Result<AppSuccess<()>, AppError> {
    let post_id = parse_post_id(&post_id)?;

    let mut tx = state.db.get_client().begin().await?;
    posts::delete_post(&mut tx, &user, post_id).await?;
    tx.commit().await?;

    tracing::info!(post_id, username = %user.username, "deleted post");
    Ok(AppSuccess::no_content())
}
