use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub const KIND_REGISTRATION: &str = "registration";
pub const STATUS_PENDING: &str = "pending";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub kind: String,
    pub recipient: String,
    pub message: String,
    pub event_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

#[derive(Debug, Clone)]
pub struct NewNotification {
    pub kind: String,
    pub recipient: String,
    pub message: String,
    pub event_id: Option<Uuid>,
    pub status: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkAllResult {
    pub updated: u64,
}
