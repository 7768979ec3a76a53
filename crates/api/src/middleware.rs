use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use sns_common::ModuleClient;
use sns_core::services::users;
use tracing::Instrument;

use crate::response::AppError;
use crate::utils::extract_id_token;
use crate::GlobalState;

/// Runs the request inside a `request` span carrying `method` and `uri`, so every
/// log line of the request has them. Error level keeps the span enabled
/// whenever error logs are.
pub async fn request_span(req: Request, next: Next) -> Response {
    let span = tracing::error_span!("request", method = %req.method(), uri = %req.uri());
    next.run(req).instrument(span).await
}

fn reject_token(reason: &str) -> Response {
    tracing::warn!(event = "authn_token_invalid", reason, "rejected request");
    (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Unauthorized" }))).into_response()
}

/// Verifies the caller's ID token and attaches their `User` row to the request,
/// registering the user on first sign-in. Rejected requests never reach the database.
pub async fn authenticate(
    State(state): State<GlobalState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = extract_id_token(req.headers()) else {
        return Ok(reject_token("missing authorization header"));
    };

    let claims = match state.verifier.verify(token) {
        Ok(claims) => claims,
        Err(e) => return Ok(reject_token(&e.to_string())),
    };

    let mut conn = state.db.get_client().acquire().await
        .map_err(|e| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, e.into()))?;
    let user = users::get_or_save_user(&mut conn, &claims.username).await
        .map_err(|e| AppError::new(StatusCode::INTERNAL_SERVER_ERROR, e.into()))?;
    drop(conn);

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
