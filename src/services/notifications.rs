//! Read/unread tracking for notifications.

use std::sync::Arc;

use chrono::{Duration, Utc};
use uuid::Uuid;

use crate::config::Config;
use crate::models::{MarkAllResult, NewNotification, Notification};
use crate::store::NotificationStore;
use crate::utils::error::{AppError, AppResult};

#[derive(Clone)]
pub struct NotificationTracker {
    store: Arc<dyn NotificationStore>,
    recent_window: Duration,
    page_size: i64,
}

impl NotificationTracker {
    pub fn new(store: Arc<dyn NotificationStore>, config: &Config) -> Self {
        Self {
            store,
            recent_window: Duration::hours(config.notification_recent_hours),
            page_size: config.notification_page_size,
        }
    }

    /// Unread notifications plus anything created inside the recent window,
    /// newest first and capped at one page.
    ///
    /// Read items linger for the window so a feed being scanned does not
    /// shift under the reader.
    pub async fn list_relevant(&self) -> AppResult<Vec<Notification>> {
        let since = Utc::now() - self.recent_window;
        self.store.list_relevant(since, self.page_size).await
    }

    /// Mark one notification as read. Marking an already-read notification
    /// succeeds without changing anything; an unknown id is `NotFound`.
    pub async fn mark_read(&self, id: &str) -> AppResult<Notification> {
        let id = parse_id(id)?;

        match self.store.mark_read(id).await? {
            Some(notification) => {
                tracing::debug!(notification_id = %id, "notification marked as read");
                Ok(notification)
            }
            None => Err(AppError::NotFound(format!(
                "Notification '{}' was not found",
                id
            ))),
        }
    }

    pub async fn mark_all_read(&self) -> AppResult<MarkAllResult> {
        let updated = self.store.mark_all_read().await?;
        tracing::info!(updated, "marked all notifications as read");
        Ok(MarkAllResult { updated })
    }

    pub async fn notify(&self, notification: NewNotification) -> AppResult<Notification> {
        self.store.insert_notification(notification).await
    }
}

fn parse_id(raw: &str) -> AppResult<Uuid> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(AppError::ValidationError(
            "Notification id is required".to_string(),
        ));
    }
    Uuid::parse_str(raw)
        .map_err(|_| AppError::ValidationError(format!("'{}' is not a valid notification id", raw)))
}
