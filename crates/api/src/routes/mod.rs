mod icons;
mod likes;
mod posts;
mod profiles;

use anyhow::anyhow;
use axum::http::StatusCode;
use axum::{middleware, Router};

use crate::middleware::request_span;
use crate::response::AppError;
use crate::GlobalState;

pub use icons::icon_routes;
pub use likes::like_routes;
pub use posts::post_routes;
pub use profiles::profile_routes;

/// Every route of the API. All of them require an ID token, and all of them
/// log under a `request` span.
pub fn api_routes(state: GlobalState) -> Router<GlobalState> {
    Router::new()
        .merge(post_routes(state.clone()))
        .merge(like_routes(state.clone()))
        .merge(profile_routes(state.clone()))
        .merge(icon_routes(state))
        .layer(middleware::from_fn(request_span))
}

pub(crate) fn parse_post_id(raw: &str) -> Result<i32, AppError> {
    raw.parse::<i32>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| AppError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            anyhow!("Post id must be a positive integer, got '{}'", raw),
        ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_id() {
        assert_eq!(parse_post_id("42").unwrap(), 42);
        assert_eq!(parse_post_id("abc").unwrap_err().0, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(parse_post_id("0").unwrap_err().0, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(parse_post_id("-3").unwrap_err().0, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
