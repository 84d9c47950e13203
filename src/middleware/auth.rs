//! Session cookie authentication.
//!
//! [`require_session`] guards the whole admin router. Anything that must be
//! reachable without a session goes on the public router in
//! [`crate::routes`] instead.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Duration;

use crate::state::AppState;
use crate::utils::error::AppError;

pub const SESSION_COOKIE: &str = "session";

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(header::COOKIE)
        .and_then(|hv| hv.to_str().ok())
        .and_then(|cookies| cookie_value(cookies, SESSION_COOKIE))
        .map(str::to_string);

    let session = state.sessions.authenticate(token.as_deref()).await?;
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

fn cookie_value<'a>(cookies: &'a str, name: &str) -> Option<&'a str> {
    cookies
        .split(';')
        .map(str::trim)
        .find_map(|c| c.strip_prefix(name).and_then(|rest| rest.strip_prefix('=')))
}

pub fn session_cookie(token: &str, ttl: Duration) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        ttl.num_seconds()
    )
}

pub fn expired_session_cookie() -> String {
    format!("{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0", SESSION_COOKIE)
}
