use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: DateTime<Utc>,
    pub is_public: bool,
    pub slug: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// True when the event still needs a slug assigned.
    pub fn missing_slug(&self) -> bool {
        self.slug.as_deref().map_or(true, str::is_empty)
    }
}

/// Editor form payload, used for both create and update.
#[derive(Debug, Clone, Deserialize)]
pub struct EventInput {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub is_public: bool,
}

/// A fully validated row ready for insertion.
#[derive(Debug, Clone)]
pub struct NewEvent {
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub date: DateTime<Utc>,
    pub is_public: bool,
    pub slug: Option<String>,
}

/// One row written by the slug backfill.
#[derive(Debug, Clone, Serialize)]
pub struct SluggedEvent {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlugFailure {
    pub id: Uuid,
    pub title: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BackfillReport {
    pub candidates: usize,
    pub updated: Vec<SluggedEvent>,
    pub skipped: Vec<Uuid>,
    pub failed: Vec<SlugFailure>,
}
