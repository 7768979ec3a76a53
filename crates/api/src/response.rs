use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;
use sns_common::optional_env_var;
use sns_core::SnsError;

use crate::env::DEFAULT_APP_ID;

/// A successful response: a status and an optional JSON body.
#[derive(Debug)]
pub struct AppSuccess<T> {
    pub status: StatusCode,
    pub body: Option<T>,
}

impl<T: Serialize> AppSuccess<T> {
    pub fn new(status: StatusCode, body: T) -> Self {
        Self { status, body: Some(body) }
    }

    pub fn ok(body: T) -> Self {
        Self::new(StatusCode::OK, body)
    }

    pub fn created(body: T) -> Self {
        Self::new(StatusCode::CREATED, body)
    }
}

impl AppSuccess<()> {
    pub fn no_content() -> Self {
        Self { status: StatusCode::NO_CONTENT, body: None }
    }
}

impl<T: Serialize> IntoResponse for AppSuccess<T> {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

/// An error response. The body only carries the reason phrase of the status;
/// the wrapped error is logged with the event name of its class.
#[derive(Debug)]
pub struct AppError(pub StatusCode, pub anyhow::Error);

impl AppError {
    pub fn new(status: StatusCode, err: anyhow::Error) -> Self {
        Self(status, err)
    }

    pub fn event(&self) -> &'static str {
        match self.0 {
            StatusCode::NOT_FOUND => "not_found_resource",
            StatusCode::FORBIDDEN => "authz_fail",
            StatusCode::UNPROCESSABLE_ENTITY => "input_validation_fail",
            StatusCode::UNAUTHORIZED => "authn_login_fail",
            _ => "sys_crash",
        }
    }

    pub fn message(&self) -> &'static str {
        self.0.canonical_reason().unwrap_or("Internal Server Error")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let app_id = optional_env_var("APP_ID").unwrap_or_else(|| DEFAULT_APP_ID.to_string());
        let event = self.event();
        let description = format!("{:#}", self.1);

        match self.0 {
            StatusCode::NOT_FOUND => tracing::info!(app_id, event, description, "request failed"),
            StatusCode::UNPROCESSABLE_ENTITY | StatusCode::UNAUTHORIZED => {
                tracing::warn!(app_id, event, description, "request failed")
            }
            _ => tracing::error!(app_id, event, description, "request failed"),
        }

        (self.0, Json(json!({ "message": self.message() }))).into_response()
    }
}

impl From<SnsError> for AppError {
    fn from(err: SnsError) -> Self {
        let status = match &err {
            SnsError::NotFound(_) => StatusCode::NOT_FOUND,
            SnsError::Forbidden(_) => StatusCode::FORBIDDEN,
            SnsError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            SnsError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            SnsError::Database(_) | SnsError::Storage(_) | SnsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self(status, err.into())
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        SnsError::from(err).into()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self(StatusCode::INTERNAL_SERVER_ERROR, err)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        SnsError::from(err).into()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self(StatusCode::UNPROCESSABLE_ENTITY, anyhow::anyhow!(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self(StatusCode::UNPROCESSABLE_ENTITY, anyhow::anyhow!(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self(StatusCode::UNPROCESSABLE_ENTITY, anyhow::anyhow!(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_map_to_status() {
        let cases = [
            (SnsError::NotFound("Post:1 not found.".into()), StatusCode::NOT_FOUND, "Not Found", "not_found_resource"),
            (SnsError::Forbidden("no".into()), StatusCode::FORBIDDEN, "Forbidden", "authz_fail"),
            (SnsError::Validation("bad".into()), StatusCode::UNPROCESSABLE_ENTITY, "Unprocessable Entity", "input_validation_fail"),
            (SnsError::Unauthenticated("who".into()), StatusCode::UNAUTHORIZED, "Unauthorized", "authn_login_fail"),
            (SnsError::Storage("down".into()), StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error", "sys_crash"),
        ];

        for (err, status, message, event) in cases {
            let app_error = AppError::from(err);
            assert_eq!(app_error.0, status);
            assert_eq!(app_error.message(), message);
            assert_eq!(app_error.event(), event);
        }
    }

    #[test]
    fn test_no_content_has_no_body() {
        let response = AppSuccess::no_content().into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
