//! Cookie session lifecycle for the admin surface.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{LoginRequest, Session};
use crate::store::SessionStore;
use crate::utils::error::{AppError, AppResult};

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
    admin_username: String,
    admin_password: String,
    ttl: Duration,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>, config: &Config) -> Self {
        Self {
            store,
            admin_username: config.admin_username.clone(),
            admin_password: config.admin_password.clone(),
            ttl: Duration::hours(config.session_ttl_hours),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<Session> {
        if request.username != self.admin_username || request.password != self.admin_password {
            tracing::info!(username = %request.username, "rejected login");
            return Err(AppError::AuthError(
                "Invalid username or password".to_string(),
            ));
        }

        let now = Utc::now();
        let session = self
            .store
            .insert_session(Session {
                token: Uuid::new_v4(),
                username: request.username,
                created_at: now,
                expires_at: now + self.ttl,
            })
            .await?;

        tracing::info!(username = %session.username, "session started");
        Ok(session)
    }

    /// Resolve a cookie value to a live session.
    pub async fn authenticate(&self, token: Option<&str>) -> AppResult<Session> {
        let token = token
            .and_then(|t| Uuid::parse_str(t.trim()).ok())
            .ok_or_else(|| AppError::AuthError("Login required".to_string()))?;

        let session = self
            .store
            .get_session(token)
            .await?
            .ok_or_else(|| AppError::AuthError("Session not found".to_string()))?;

        if session.is_expired(Utc::now()) {
            self.store.delete_session(token).await?;
            return Err(AppError::AuthError("Session expired".to_string()));
        }

        Ok(session)
    }

    pub async fn logout(&self, session: &Session) -> AppResult<()> {
        self.store.delete_session(session.token).await?;
        tracing::info!(username = %session.username, "session ended");
        Ok(())
    }
}
