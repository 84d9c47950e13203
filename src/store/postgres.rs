use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{EventStore, NotificationStore, RegistrationStore, SessionStore, TeamStore};
use crate::models::{
    Event, EventRegistration, NewEvent, NewNotification, Notification, RegistrationInput,
    Session, Team, TeamInput, TeamMember, TeamMemberInput,
};
use crate::utils::error::{AppError, AppResult};

#[cfg(test)]
const EVENT_COLUMNS: &str =
    "id, title, description, location, date, is_public, slug, created_at, updated_at";

const SQL_LIST_EVENTS: &str = r#"
SELECT id, title, description, location, date, is_public, slug, created_at, updated_at
FROM events
ORDER BY date ASC
"#;

const SQL_GET_EVENT: &str = r#"
SELECT id, title, description, location, date, is_public, slug, created_at, updated_at
FROM events
WHERE id = $1
"#;

const SQL_GET_EVENT_BY_SLUG: &str = r#"
SELECT id, title, description, location, date, is_public, slug, created_at, updated_at
FROM events
WHERE slug = $1
"#;

const SQL_INSERT_EVENT: &str = r#"
INSERT INTO events (id, title, description, location, date, is_public, slug)
VALUES ($1, $2, $3, $4, $5, $6, $7)
RETURNING id, title, description, location, date, is_public, slug, created_at, updated_at
"#;

const SQL_UPDATE_EVENT: &str = r#"
UPDATE events
SET title = $2,
    description = $3,
    location = $4,
    date = $5,
    is_public = $6,
    slug = $7,
    updated_at = NOW()
WHERE id = $1
RETURNING id, title, description, location, date, is_public, slug, created_at, updated_at
"#;

const SQL_LIST_EVENTS_MISSING_SLUG: &str = r#"
SELECT id, title, description, location, date, is_public, slug, created_at, updated_at
FROM events
WHERE slug IS NULL OR slug = ''
ORDER BY created_at ASC
"#;

const SQL_LIST_SLUGS: &str = r#"
SELECT slug
FROM events
WHERE slug IS NOT NULL AND slug <> ''
"#;

const SQL_SLUGS_WITH_PREFIX: &str = r#"
SELECT slug
FROM events
WHERE slug LIKE $1 ESCAPE '\'
"#;

const SQL_ASSIGN_SLUG: &str = r#"
UPDATE events
SET slug = $2, updated_at = NOW()
WHERE id = $1 AND (slug IS NULL OR slug = '')
RETURNING id, title, description, location, date, is_public, slug, created_at, updated_at
"#;

const SQL_LIST_RELEVANT_NOTIFICATIONS: &str = r#"
SELECT id, kind, recipient, message, event_id, status, created_at, read
FROM notifications
WHERE read = FALSE OR created_at >= $1
ORDER BY created_at DESC
LIMIT $2
"#;

const SQL_MARK_NOTIFICATION_READ: &str = r#"
UPDATE notifications
SET read = TRUE
WHERE id = $1
RETURNING id, kind, recipient, message, event_id, status, created_at, read
"#;

const SQL_MARK_ALL_NOTIFICATIONS_READ: &str = r#"
UPDATE notifications
SET read = TRUE
WHERE read = FALSE
"#;

const SQL_INSERT_NOTIFICATION: &str = r#"
INSERT INTO notifications (id, kind, recipient, message, event_id, status)
VALUES ($1, $2, $3, $4, $5, $6)
RETURNING id, kind, recipient, message, event_id, status, created_at, read
"#;

const SQL_INSERT_REGISTRATION: &str = r#"
INSERT INTO event_registrations (id, event_id, name, email, phone, notes)
VALUES ($1, $2, $3, $4, $5, $6)
RETURNING id, event_id, name, email, phone, notes, created_at
"#;

const SQL_LIST_REGISTRATIONS: &str = r#"
SELECT id, event_id, name, email, phone, notes, created_at
FROM event_registrations
WHERE event_id = $1
ORDER BY created_at ASC
"#;

const SQL_LIST_TEAMS: &str = r#"
SELECT id, name, division, created_at
FROM teams
ORDER BY name ASC
"#;

const SQL_GET_TEAM: &str = r#"
SELECT id, name, division, created_at
FROM teams
WHERE id = $1
"#;

const SQL_INSERT_TEAM: &str = r#"
INSERT INTO teams (id, name, division)
VALUES ($1, $2, $3)
RETURNING id, name, division, created_at
"#;

const SQL_LIST_MEMBERS: &str = r#"
SELECT id, team_id, name, email, position, jersey_number, created_at
FROM team_members
WHERE team_id = $1
ORDER BY name ASC
"#;

const SQL_INSERT_MEMBER: &str = r#"
INSERT INTO team_members (id, team_id, name, email, position, jersey_number)
VALUES ($1, $2, $3, $4, $5, $6)
RETURNING id, team_id, name, email, position, jersey_number, created_at
"#;

const SQL_DELETE_MEMBER: &str = r#"
DELETE FROM team_members
WHERE id = $1 AND team_id = $2
"#;

const SQL_INSERT_SESSION: &str = r#"
INSERT INTO sessions (token, username, created_at, expires_at)
VALUES ($1, $2, $3, $4)
RETURNING token, username, created_at, expires_at
"#;

const SQL_GET_SESSION: &str = r#"
SELECT token, username, created_at, expires_at
FROM sessions
WHERE token = $1
"#;

const SQL_DELETE_SESSION: &str = r#"
DELETE FROM sessions
WHERE token = $1
"#;

/// Postgres-backed implementation of every store trait.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape `LIKE` wildcards; slugs may legitimately contain `_`.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[async_trait]
impl EventStore for PgStore {
    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(SQL_LIST_EVENTS)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(SQL_GET_EVENT)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn get_event_by_slug(&self, slug: &str) -> AppResult<Option<Event>> {
        let event = sqlx::query_as::<_, Event>(SQL_GET_EVENT_BY_SLUG)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(event)
    }

    async fn insert_event(&self, event: NewEvent) -> AppResult<Event> {
        sqlx::query_as::<_, Event>(SQL_INSERT_EVENT)
            .bind(Uuid::new_v4())
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.date)
            .bind(event.is_public)
            .bind(&event.slug)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "An event with this slug"))
    }

    async fn update_event(&self, id: Uuid, event: NewEvent) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>(SQL_UPDATE_EVENT)
            .bind(id)
            .bind(&event.title)
            .bind(&event.description)
            .bind(&event.location)
            .bind(event.date)
            .bind(event.is_public)
            .bind(&event.slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "An event with this slug"))
    }

    async fn list_events_missing_slug(&self) -> AppResult<Vec<Event>> {
        let events = sqlx::query_as::<_, Event>(SQL_LIST_EVENTS_MISSING_SLUG)
            .fetch_all(&self.pool)
            .await?;
        Ok(events)
    }

    async fn list_slugs(&self) -> AppResult<Vec<String>> {
        let slugs = sqlx::query_scalar::<_, String>(SQL_LIST_SLUGS)
            .fetch_all(&self.pool)
            .await?;
        Ok(slugs)
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        let pattern = format!("{}%", escape_like(prefix));
        let slugs = sqlx::query_scalar::<_, String>(SQL_SLUGS_WITH_PREFIX)
            .bind(pattern)
            .fetch_all(&self.pool)
            .await?;
        Ok(slugs)
    }

    async fn assign_slug(&self, id: Uuid, slug: &str) -> AppResult<Option<Event>> {
        sqlx::query_as::<_, Event>(SQL_ASSIGN_SLUG)
            .bind(id)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::from_write(e, "An event with this slug"))
    }
}

#[async_trait]
impl NotificationStore for PgStore {
    async fn list_relevant(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Notification>> {
        let notifications = sqlx::query_as::<_, Notification>(SQL_LIST_RELEVANT_NOTIFICATIONS)
            .bind(since)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;
        Ok(notifications)
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<Option<Notification>> {
        let notification = sqlx::query_as::<_, Notification>(SQL_MARK_NOTIFICATION_READ)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(notification)
    }

    async fn mark_all_read(&self) -> AppResult<u64> {
        let res = sqlx::query(SQL_MARK_ALL_NOTIFICATIONS_READ)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }

    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> AppResult<Notification> {
        let row = sqlx::query_as::<_, Notification>(SQL_INSERT_NOTIFICATION)
            .bind(Uuid::new_v4())
            .bind(&notification.kind)
            .bind(&notification.recipient)
            .bind(&notification.message)
            .bind(notification.event_id)
            .bind(&notification.status)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }
}

#[async_trait]
impl RegistrationStore for PgStore {
    async fn insert_registration(
        &self,
        event_id: Uuid,
        input: RegistrationInput,
    ) -> AppResult<EventRegistration> {
        let row = sqlx::query_as::<_, EventRegistration>(SQL_INSERT_REGISTRATION)
            .bind(Uuid::new_v4())
            .bind(event_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.notes)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list_registrations(&self, event_id: Uuid) -> AppResult<Vec<EventRegistration>> {
        let rows = sqlx::query_as::<_, EventRegistration>(SQL_LIST_REGISTRATIONS)
            .bind(event_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl TeamStore for PgStore {
    async fn list_teams(&self) -> AppResult<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(SQL_LIST_TEAMS)
            .fetch_all(&self.pool)
            .await?;
        Ok(teams)
    }

    async fn get_team(&self, id: Uuid) -> AppResult<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(SQL_GET_TEAM)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(team)
    }

    async fn insert_team(&self, input: TeamInput) -> AppResult<Team> {
        let team = sqlx::query_as::<_, Team>(SQL_INSERT_TEAM)
            .bind(Uuid::new_v4())
            .bind(&input.name)
            .bind(&input.division)
            .fetch_one(&self.pool)
            .await?;
        Ok(team)
    }

    async fn list_members(&self, team_id: Uuid) -> AppResult<Vec<TeamMember>> {
        let members = sqlx::query_as::<_, TeamMember>(SQL_LIST_MEMBERS)
            .bind(team_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(members)
    }

    async fn insert_member(
        &self,
        team_id: Uuid,
        input: TeamMemberInput,
    ) -> AppResult<TeamMember> {
        let member = sqlx::query_as::<_, TeamMember>(SQL_INSERT_MEMBER)
            .bind(Uuid::new_v4())
            .bind(team_id)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.position)
            .bind(input.jersey_number)
            .fetch_one(&self.pool)
            .await?;
        Ok(member)
    }

    async fn delete_member(&self, team_id: Uuid, member_id: Uuid) -> AppResult<bool> {
        let res = sqlx::query(SQL_DELETE_MEMBER)
            .bind(member_id)
            .bind(team_id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert_session(&self, session: Session) -> AppResult<Session> {
        let row = sqlx::query_as::<_, Session>(SQL_INSERT_SESSION)
            .bind(session.token)
            .bind(&session.username)
            .bind(session.created_at)
            .bind(session.expires_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_session(&self, token: Uuid) -> AppResult<Option<Session>> {
        let row = sqlx::query_as::<_, Session>(SQL_GET_SESSION)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_session(&self, token: Uuid) -> AppResult<bool> {
        let res = sqlx::query(SQL_DELETE_SESSION)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("summer-cup"), "summer-cup");
        assert_eq!(escape_like("u_18"), "u\\_18");
        assert_eq!(escape_like("50%"), "50\\%");
    }

    #[test]
    fn test_event_queries_select_every_column() {
        for sql in [
            SQL_LIST_EVENTS,
            SQL_GET_EVENT,
            SQL_GET_EVENT_BY_SLUG,
            SQL_INSERT_EVENT,
            SQL_UPDATE_EVENT,
            SQL_LIST_EVENTS_MISSING_SLUG,
            SQL_ASSIGN_SLUG,
        ] {
            assert!(sql.contains(EVENT_COLUMNS), "missing columns in: {}", sql);
        }
    }
}
