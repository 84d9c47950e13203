use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::lock::Mutex;
use uuid::Uuid;

use super::{EventStore, NotificationStore, RegistrationStore, SessionStore, TeamStore};
use crate::models::{
    Event, EventRegistration, NewEvent, NewNotification, Notification, RegistrationInput,
    Session, Team, TeamInput, TeamMember, TeamMemberInput,
};
use crate::utils::error::{AppError, AppResult};

/// In-memory reference implementation
#[derive(Clone, Default)]
pub struct MemoryStore {
    events: Arc<Mutex<HashMap<Uuid, Event>>>,
    notifications: Arc<Mutex<HashMap<Uuid, Notification>>>,
    registrations: Arc<Mutex<HashMap<Uuid, EventRegistration>>>,
    teams: Arc<Mutex<HashMap<Uuid, Team>>>,
    members: Arc<Mutex<HashMap<Uuid, TeamMember>>>,
    sessions: Arc<Mutex<HashMap<Uuid, Session>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a row as-is, bypassing slug checks and timestamps.
    pub async fn put_event(&self, event: Event) {
        self.events.lock().await.insert(event.id, event);
    }

    /// Insert a row as-is, keeping its `created_at` and `read` flag.
    pub async fn put_notification(&self, notification: Notification) {
        self.notifications
            .lock()
            .await
            .insert(notification.id, notification);
    }

    pub async fn notification(&self, id: Uuid) -> Option<Notification> {
        self.notifications.lock().await.get(&id).cloned()
    }

    pub async fn all_notifications(&self) -> Vec<Notification> {
        let mut all: Vec<Notification> =
            self.notifications.lock().await.values().cloned().collect();
        all.sort_by_key(|n| n.id);
        all
    }
}

fn slug_taken(events: &HashMap<Uuid, Event>, slug: &Option<String>, except: Option<Uuid>) -> bool {
    match slug.as_deref() {
        None | Some("") => false,
        Some(slug) => events
            .values()
            .any(|e| Some(e.id) != except && e.slug.as_deref() == Some(slug)),
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(&self) -> AppResult<Vec<Event>> {
        let mut events: Vec<Event> = self.events.lock().await.values().cloned().collect();
        events.sort_by_key(|e| e.date);
        Ok(events)
    }

    async fn get_event(&self, id: Uuid) -> AppResult<Option<Event>> {
        Ok(self.events.lock().await.get(&id).cloned())
    }

    async fn get_event_by_slug(&self, slug: &str) -> AppResult<Option<Event>> {
        let events = self.events.lock().await;
        Ok(events
            .values()
            .find(|e| e.slug.as_deref() == Some(slug))
            .cloned())
    }

    async fn insert_event(&self, event: NewEvent) -> AppResult<Event> {
        let mut events = self.events.lock().await;
        if slug_taken(&events, &event.slug, None) {
            return Err(AppError::Conflict(
                "An event with this slug already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let row = Event {
            id: Uuid::new_v4(),
            title: event.title,
            description: event.description,
            location: event.location,
            date: event.date,
            is_public: event.is_public,
            slug: event.slug,
            created_at: now,
            updated_at: now,
        };
        events.insert(row.id, row.clone());
        Ok(row)
    }

    async fn update_event(&self, id: Uuid, event: NewEvent) -> AppResult<Option<Event>> {
        let mut events = self.events.lock().await;
        if slug_taken(&events, &event.slug, Some(id)) {
            return Err(AppError::Conflict(
                "An event with this slug already exists".to_string(),
            ));
        }

        let Some(row) = events.get_mut(&id) else {
            return Ok(None);
        };
        row.title = event.title;
        row.description = event.description;
        row.location = event.location;
        row.date = event.date;
        row.is_public = event.is_public;
        row.slug = event.slug;
        row.updated_at = Utc::now();
        Ok(Some(row.clone()))
    }

    async fn list_events_missing_slug(&self) -> AppResult<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .lock()
            .await
            .values()
            .filter(|e| e.missing_slug())
            .cloned()
            .collect();
        events.sort_by_key(|e| e.created_at);
        Ok(events)
    }

    async fn list_slugs(&self) -> AppResult<Vec<String>> {
        let events = self.events.lock().await;
        Ok(events
            .values()
            .filter_map(|e| e.slug.clone())
            .filter(|slug| !slug.is_empty())
            .collect())
    }

    async fn slugs_with_prefix(&self, prefix: &str) -> AppResult<Vec<String>> {
        let events = self.events.lock().await;
        Ok(events
            .values()
            .filter_map(|e| e.slug.clone())
            .filter(|slug| !slug.is_empty() && slug.starts_with(prefix))
            .collect())
    }

    async fn assign_slug(&self, id: Uuid, slug: &str) -> AppResult<Option<Event>> {
        let mut events = self.events.lock().await;
        if slug_taken(&events, &Some(slug.to_string()), Some(id)) {
            return Err(AppError::Conflict(
                "An event with this slug already exists".to_string(),
            ));
        }

        match events.get_mut(&id) {
            Some(row) if row.missing_slug() => {
                row.slug = Some(slug.to_string());
                row.updated_at = Utc::now();
                Ok(Some(row.clone()))
            }
            _ => Ok(None),
        }
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn list_relevant(
        &self,
        since: DateTime<Utc>,
        limit: i64,
    ) -> AppResult<Vec<Notification>> {
        let mut relevant: Vec<Notification> = self
            .notifications
            .lock()
            .await
            .values()
            .filter(|n| !n.read || n.created_at >= since)
            .cloned()
            .collect();
        relevant.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        relevant.truncate(usize::try_from(limit).unwrap_or(0));
        Ok(relevant)
    }

    async fn mark_read(&self, id: Uuid) -> AppResult<Option<Notification>> {
        let mut notifications = self.notifications.lock().await;
        Ok(notifications.get_mut(&id).map(|n| {
            n.read = true;
            n.clone()
        }))
    }

    async fn mark_all_read(&self) -> AppResult<u64> {
        let mut notifications = self.notifications.lock().await;
        let mut updated = 0;
        for n in notifications.values_mut().filter(|n| !n.read) {
            n.read = true;
            updated += 1;
        }
        Ok(updated)
    }

    async fn insert_notification(
        &self,
        notification: NewNotification,
    ) -> AppResult<Notification> {
        let row = Notification {
            id: Uuid::new_v4(),
            kind: notification.kind,
            recipient: notification.recipient,
            message: notification.message,
            event_id: notification.event_id,
            status: notification.status,
            created_at: Utc::now(),
            read: false,
        };
        self.put_notification(row.clone()).await;
        Ok(row)
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn insert_registration(
        &self,
        event_id: Uuid,
        input: RegistrationInput,
    ) -> AppResult<EventRegistration> {
        let row = EventRegistration {
            id: Uuid::new_v4(),
            event_id,
            name: input.name,
            email: input.email,
            phone: input.phone,
            notes: input.notes,
            created_at: Utc::now(),
        };
        self.registrations.lock().await.insert(row.id, row.clone());
        Ok(row)
    }

    async fn list_registrations(&self, event_id: Uuid) -> AppResult<Vec<EventRegistration>> {
        let mut rows: Vec<EventRegistration> = self
            .registrations
            .lock()
            .await
            .values()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.created_at);
        Ok(rows)
    }
}

#[async_trait]
impl TeamStore for MemoryStore {
    async fn list_teams(&self) -> AppResult<Vec<Team>> {
        let mut teams: Vec<Team> = self.teams.lock().await.values().cloned().collect();
        teams.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(teams)
    }

    async fn get_team(&self, id: Uuid) -> AppResult<Option<Team>> {
        Ok(self.teams.lock().await.get(&id).cloned())
    }

    async fn insert_team(&self, input: TeamInput) -> AppResult<Team> {
        let team = Team {
            id: Uuid::new_v4(),
            name: input.name,
            division: input.division,
            created_at: Utc::now(),
        };
        self.teams.lock().await.insert(team.id, team.clone());
        Ok(team)
    }

    async fn list_members(&self, team_id: Uuid) -> AppResult<Vec<TeamMember>> {
        let mut members: Vec<TeamMember> = self
            .members
            .lock()
            .await
            .values()
            .filter(|m| m.team_id == team_id)
            .cloned()
            .collect();
        members.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(members)
    }

    async fn insert_member(
        &self,
        team_id: Uuid,
        input: TeamMemberInput,
    ) -> AppResult<TeamMember> {
        let member = TeamMember {
            id: Uuid::new_v4(),
            team_id,
            name: input.name,
            email: input.email,
            position: input.position,
            jersey_number: input.jersey_number,
            created_at: Utc::now(),
        };
        self.members.lock().await.insert(member.id, member.clone());
        Ok(member)
    }

    async fn delete_member(&self, team_id: Uuid, member_id: Uuid) -> AppResult<bool> {
        let mut members = self.members.lock().await;
        match members.get(&member_id) {
            Some(m) if m.team_id == team_id => {
                members.remove(&member_id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(&self, session: Session) -> AppResult<Session> {
        self.sessions
            .lock()
            .await
            .insert(session.token, session.clone());
        Ok(session)
    }

    async fn get_session(&self, token: Uuid) -> AppResult<Option<Session>> {
        Ok(self.sessions.lock().await.get(&token).cloned())
    }

    async fn delete_session(&self, token: Uuid) -> AppResult<bool> {
        Ok(self.sessions.lock().await.remove(&token).is_some())
    }
}
