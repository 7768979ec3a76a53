use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path, State};
use axum::routing::{get, put};
use axum::{middleware, Json, Router};

use sns_core::services::icons;
use sns_core::{IconBody, User};

use crate::middleware::authenticate;
use crate::response::{AppError, AppSuccess};
use crate::GlobalState;

pub fn icon_routes(state: GlobalState) -> Router<GlobalState> {
    Router::new()
        .route("/api/icons", put(update_icon))
        .route("/api/icons/{owner}", get(get_icon))
        .route_layer(middleware::from_fn_with_state(state, authenticate))
}

async fn get_icon(
    State(state): State<GlobalState>,
    Path(owner): Path<String>,
) -> Result<AppSuccess<IconBody>, AppError> {
    let icon_image = icons::get_icon(state.icons.as_ref(), &owner).await?;
    Ok(AppSuccess::ok(IconBody { icon_image }))
}

async fn update_icon(
    State(state): State<GlobalState>,
    Extension(user): Extension<User>,
    payload: Result<Json<IconBody>, JsonRejection>,
) -> Result<AppSuccess<IconBody>, AppError> {
    let Json(payload) = payload?;
    let icon_image = icons::update_icon(state.icons.as_ref(), &user.username, payload.icon_image).await?;
    Ok(AppSuccess::ok(IconBody { icon_image }))
}
