//! Persistence seams.
//!
//! Every service receives the store it needs at construction time. The
//! server wires in [`PgStore`]; tests use [`MemoryStore`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    Event, EventRegistration, NewEvent, NewNotification, Notification, RegistrationInput,
    Session, Team, TeamInput, TeamMember, TeamMemberInput,
};
use crate::utils::error::AppResult;

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events, earliest date first.
    async fn list_events(&self) -> AppResult<Vec<Event>>;

    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>>;

    async fn get_event_by_slug(&self, slug: &str) -> AppResult<Option<Event>>;

    async fn insert_event(&self, event: NewEvent) -> AppResult<Event>;

    /// Overwrite the editable fields of an event, returning the new row.
    async fn update_event(&self, id: Uuid, event: NewEvent) -> AppResult<Option<Event>>;

    /// Events whose slug is null or empty.
    async fn list_events_missing_slug(&self) -> AppResult<Vec<Event>>;

    /// Every non-empty slug in use.
    async fn list_slugs(&self) -> AppResult<Vec<String>>;

    /// Slugs starting with `prefix`.
    async fn slugs_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>>;

    /// Set the slug only if the event still has none. Returns the updated
    /// row, or `None` when the id is unknown or a slug was already present.
    async fn assign_slug(&self, id: Uuid, slug: &str) -> AppResult<Option<Event>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Unread notifications plus anything created at or after `since`,
    /// newest first.
    async fn list_relevant(&self, since: DateTime<Utc>, limit: i64)
        -> AppResult<Vec<Notification>>;

    /// Set `read = true` on one record. `None` when the id is unknown.
    async fn mark_read(&self, id: Uuid) -> AppResult<Option<Notification>>;

    /// Set `read = true` on every unread record, returning how many changed.
    async fn mark_all_read(&self) -> AppResult<u64>;

    async fn insert_notification(&self, notification: NewNotification)
        -> AppResult<Notification>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    async fn insert_registration(
        &self,
        event_id: Uuid,
        input: RegistrationInput,
    ) -> AppResult<EventRegistration>;

    async fn list_registrations(&self, event_id: Uuid) -> AppResult<Vec<EventRegistration>>;
}

#[async_trait]
pub trait TeamStore: Send + Sync {
    async fn list_teams(&self) -> AppResult<Vec<Team>>;

    async fn get_team(&self, id: Uuid) -> AppResult<Option<Team>>;

    async fn insert_team(&self, input: TeamInput) -> AppResult<Team>;

    async fn list_members(&self, team_id: Uuid) -> AppResult<Vec<TeamMember>>;

    async fn insert_member(&self, team_id: Uuid, input: TeamMemberInput)
        -> AppResult<TeamMember>;

    /// Returns false when no such member exists on that team.
    async fn delete_member(&self, team_id: Uuid, member_id: Uuid) -> AppResult<bool>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, session: Session) -> AppResult<Session>;

    async fn get_session(&self, token: Uuid) -> AppResult<Option<Session>>;

    async fn delete_session(&self, token: Uuid) -> AppResult<bool>;
}
