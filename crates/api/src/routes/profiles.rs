use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::routing::{get, put};
use axum::{middleware, Json, Router};
use validator::Validate;

use sns_common::ModuleClient;
use sns_core::services::users;
use sns_core::{ProfileBody, User};

use crate::middleware::authenticate;
use crate::response::{AppError, AppSuccess};
use crate::GlobalState;

pub fn profile_routes(state: GlobalState) -> Router<GlobalState> {
    Router::new()
        .route("/api/profiles", put(update_profile))
        .route("/api/profiles/{owner}", get(get_profile))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

async fn get_profile(
    State(state): State<GlobalState>,
    Path(owner): Path<String>,
) -> Result<AppSuccess<ProfileBody>, AppError> {
    let mut tx = state.db.get_client().begin().await?;
    let profile = users::get_profile(&mut tx, &owner).await?;
    tx.commit().await?;

    Ok(AppSuccess::ok(ProfileBody { profile }))
}

/// Only the caller's own profile can be written.
async fn update_profile(
    State(state): State<GlobalState>,
    Extension(user): Extension<User>,
    payload: Result<Json<ProfileBody>, JsonRejection>,
) -> Result<AppSuccess<ProfileBody>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let mut tx = state.db.get_client().begin().await?;
    let profile = users::update_profile(&mut tx, &user.username, payload.profile).await?;
    tx.commit().await?;

    Ok(AppSuccess::ok(ProfileBody { profile }))
}
