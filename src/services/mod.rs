pub mod events;
pub mod notifications;
pub mod registrations;
pub mod sessions;
pub mod slug;
pub mod teams;

pub use events::EventService;
pub use notifications::NotificationTracker;
pub use registrations::RegistrationService;
pub use sessions::SessionService;
pub use slug::generate_slug;
pub use teams::TeamService;

/// Trim an optional form field, treating blank input as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
