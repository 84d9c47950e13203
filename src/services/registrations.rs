use std::sync::Arc;

use uuid::Uuid;

use crate::models::notification::{KIND_REGISTRATION, STATUS_PENDING};
use crate::models::{EventRegistration, NewNotification, RegistrationInput};
use crate::services::{non_blank, NotificationTracker};
use crate::store::{EventStore, RegistrationStore};
use crate::utils::error::{AppError, AppResult};

const ORGANIZER_RECIPIENT: &str = "organizers";

#[derive(Clone)]
pub struct RegistrationService {
    events: Arc<dyn EventStore>,
    registrations: Arc<dyn RegistrationStore>,
    notifications: NotificationTracker,
}

impl RegistrationService {
    pub fn new(
        events: Arc<dyn EventStore>,
        registrations: Arc<dyn RegistrationStore>,
        notifications: NotificationTracker,
    ) -> Self {
        Self {
            events,
            registrations,
            notifications,
        }
    }

    /// Register an attendee and let organizers know about it.
    pub async fn register(
        &self,
        event_id: Uuid,
        input: RegistrationInput,
    ) -> AppResult<EventRegistration> {
        let input = validate(input)?;
        let event = self
            .events
            .get_event(event_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Event '{}' was not found", event_id)))?;

        let registration = self
            .registrations
            .insert_registration(event.id, input)
            .await?;

        tracing::info!(
            event_id = %event.id,
            registration_id = %registration.id,
            "registration received"
        );

        // The sign-up is already stored; a lost notification is only logged.
        let notice = NewNotification {
            kind: KIND_REGISTRATION.to_string(),
            recipient: ORGANIZER_RECIPIENT.to_string(),
            message: format!("{} registered for {}", registration.name, event.title),
            event_id: Some(event.id),
            status: STATUS_PENDING.to_string(),
        };
        if let Err(e) = self.notifications.notify(notice).await {
            tracing::warn!(registration_id = %registration.id, error = ?e, "failed to record registration notification");
        }

        Ok(registration)
    }

    pub async fn list_for_event(&self, event_id: Uuid) -> AppResult<Vec<EventRegistration>> {
        if self.events.get_event(event_id).await?.is_none() {
            return Err(AppError::NotFound(format!(
                "Event '{}' was not found",
                event_id
            )));
        }
        self.registrations.list_registrations(event_id).await
    }
}

fn validate(input: RegistrationInput) -> AppResult<RegistrationInput> {
    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::ValidationError("Name is required".to_string()));
    }

    let email = input.email.trim().to_string();
    if !looks_like_email(&email) {
        return Err(AppError::ValidationError(
            "A valid email address is required".to_string(),
        ));
    }

    Ok(RegistrationInput {
        name,
        email,
        phone: non_blank(input.phone),
        notes: non_blank(input.notes),
    })
}

fn looks_like_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.contains('@'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::models::Event;
    use crate::store::MemoryStore;
    use chrono::Utc;

    fn service(store: &MemoryStore) -> RegistrationService {
        let store = Arc::new(store.clone());
        RegistrationService::new(
            store.clone(),
            store.clone(),
            NotificationTracker::new(store, &Config::default()),
        )
    }

    async fn seed_event(store: &MemoryStore) -> Event {
        let now = Utc::now();
        let event = Event {
            id: Uuid::new_v4(),
            title: "Spring Cup".to_string(),
            description: None,
            location: None,
            date: now,
            is_public: true,
            slug: Some("spring-cup".to_string()),
            created_at: now,
            updated_at: now,
        };
        store.put_event(event.clone()).await;
        event
    }

    fn input(name: &str, email: &str) -> RegistrationInput {
        RegistrationInput {
            name: name.to_string(),
            email: email.to_string(),
            phone: Some("  ".to_string()),
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_register_creates_notification() {
        let store = MemoryStore::new();
        let event = seed_event(&store).await;

        let registration = service(&store)
            .register(event.id, input(" Ana Rivera ", "ana@example.com"))
            .await
            .unwrap();
        assert_eq!(registration.name, "Ana Rivera");
        assert!(registration.phone.is_none());

        let notifications = store.all_notifications().await;
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].event_id, Some(event.id));
        assert_eq!(notifications[0].kind, KIND_REGISTRATION);
        assert!(!notifications[0].read);
    }

    #[tokio::test]
    async fn test_register_unknown_event() {
        let store = MemoryStore::new();
        let err = service(&store)
            .register(Uuid::new_v4(), input("Ana", "ana@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert!(store.all_notifications().await.is_empty());
    }

    #[tokio::test]
    async fn test_register_validates_contact_fields() {
        let store = MemoryStore::new();
        let event = seed_event(&store).await;
        let service = service(&store);

        let err = service
            .register(event.id, input("", "ana@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        let err = service
            .register(event.id, input("Ana", "not-an-email"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_list_for_event() {
        let store = MemoryStore::new();
        let event = seed_event(&store).await;
        let service = service(&store);
        service
            .register(event.id, input("Ana", "ana@example.com"))
            .await
            .unwrap();
        service
            .register(event.id, input("Luis", "luis@example.com"))
            .await
            .unwrap();

        let rows = service.list_for_event(event.id).await.unwrap();
        assert_eq!(rows.len(), 2);

        let err = service.list_for_event(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_looks_like_email() {
        assert!(looks_like_email("a@b.co"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("a@b@c.co"));
    }
}
