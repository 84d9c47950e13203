use axum::extract::rejection::JsonRejection;
use axum::{response::IntoResponse, response::Response};
use serde::Serialize;
use uuid::Uuid;

use crate::utils::error::{AppError, AppResult};
use crate::utils::response::success;

pub mod auth;
pub mod events;
pub mod notifications;
pub mod teams;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "league-portal",
    };

    success(payload, "Health check successful").into_response()
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

/// Parse a path segment as an id, reporting garbage as a validation failure.
pub(crate) fn parse_id(raw: &str, what: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| AppError::ValidationError(format!("'{}' is not a valid {} id", raw, what)))
}
