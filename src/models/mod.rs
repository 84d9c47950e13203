pub mod event;
pub mod notification;
pub mod registration;
pub mod session;
pub mod team;

pub use event::{BackfillReport, Event, EventInput, NewEvent, SlugFailure, SluggedEvent};
pub use notification::{MarkAllResult, NewNotification, Notification};
pub use registration::{EventRegistration, RegistrationInput};
pub use session::{LoginRequest, Session};
pub use team::{Team, TeamInput, TeamMember, TeamMemberInput};
