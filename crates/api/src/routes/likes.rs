use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::routing::{delete, post};
use axum::{middleware, Json, Router};
use validator::Validate;

use sns_common::ModuleClient;
use sns_core::services::likes;
use sns_core::{LikeRequest, LikeResult, User};

use crate::middleware::authenticate;
use crate::response::{AppError, AppSuccess};
use crate::routes::parse_post_id;
use crate::GlobalState;

pub fn like_routes(state: GlobalState) -> Router<GlobalState> {
    Router::new()
        .route("/api/likes", post(like))
        .route("/api/likes/{postid}", delete(unlike))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

async fn like(
    State(state): State<GlobalState>,
    Extension(user): Extension<User>,
    payload: Result<Json<LikeRequest>, JsonRejection>,
) -> Result<AppSuccess<LikeResult>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let mut tx = state.db.get_client().begin().await?;
    let like_count = likes::like_post(&mut tx, &user, payload.postid).await?;
    tx.commit().await?;

    Ok(AppSuccess::created(LikeResult { like_count, is_liked: true }))
}

async fn unlike(
    State(state): State<GlobalState>,
    Extension(user): Extension<User>,
    Path(post_id): Path<String>,
) -> Result<AppSuccess<LikeResult>, AppError> {
    let post_id = parse_post_id(&post_id)?;

    let mut tx = state.db.get_client().begin().await?;
    let like_count = likes::unlike_post(&mut tx, &user, post_id).await?;
    tx.commit().await?;

    Ok(AppSuccess::ok(LikeResult { like_count, is_liked: false }))
}
