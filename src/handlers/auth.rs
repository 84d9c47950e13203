use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, State};
use axum::http::header::SET_COOKIE;
use axum::http::HeaderValue;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::middleware::auth::{expired_session_cookie, session_cookie};
use crate::models::{LoginRequest, Session};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{empty_success, success};

#[derive(Serialize)]
struct LoginPayload {
    username: String,
    expires_at: DateTime<Utc>,
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = payload?;
    let session = state.sessions.login(request).await?;

    let cookie = session_cookie(&session.token.to_string(), state.sessions.ttl());
    let body = LoginPayload {
        username: session.username,
        expires_at: session.expires_at,
    };

    with_cookie(success(body, "Logged in").into_response(), &cookie)
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
) -> AppResult<Response> {
    state.sessions.logout(&session).await?;
    with_cookie(
        empty_success("Logged out").into_response(),
        &expired_session_cookie(),
    )
}

fn with_cookie(mut response: Response, cookie: &str) -> AppResult<Response> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|e| AppError::InternalServerError(format!("invalid cookie header: {}", e)))?;
    response.headers_mut().insert(SET_COOKIE, value);
    Ok(response)
}
