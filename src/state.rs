//! Shared application state handed to every request handler.

use std::sync::Arc;

use crate::config::Config;
use crate::services::{
    EventService, NotificationTracker, RegistrationService, SessionService, TeamService,
};
use crate::store::{EventStore, NotificationStore, RegistrationStore, SessionStore, TeamStore};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub events: EventService,
    pub notifications: NotificationTracker,
    pub registrations: RegistrationService,
    pub teams: TeamService,
    pub sessions: SessionService,
}

impl AppState {
    /// Wire every service to the given store.
    pub fn new<S>(store: Arc<S>, config: Config) -> Self
    where
        S: EventStore + NotificationStore + RegistrationStore + TeamStore + SessionStore + 'static,
    {
        let notifications = NotificationTracker::new(store.clone(), &config);

        Self {
            events: EventService::new(store.clone(), &config),
            registrations: RegistrationService::new(
                store.clone(),
                store.clone(),
                notifications.clone(),
            ),
            teams: TeamService::new(store.clone()),
            sessions: SessionService::new(store, &config),
            notifications,
            config: Arc::new(config),
        }
    }
}
