pub mod admin;
pub mod event;
pub mod registration;
pub mod session;

pub use admin::Admin;
pub use event::{Event, NewEvent};
pub use registration::{NewRegistration, Registration, RegistrationWithEvent};
pub use session::Session;
