//! Storage seams used by the application actions.
//!
//! Every method returns storage failures as [`AppError`]; the actions
//! decide whether to degrade or report them.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{Admin, Event, NewEvent, NewRegistration, Registration, RegistrationWithEvent, Session};
use crate::utils::error::AppError;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Newest first by creation time.
    async fn list_events(&self) -> Result<Vec<Event>, AppError>;

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError>;

    async fn insert_event(&self, event: NewEvent) -> Result<Event, AppError>;

    /// Returns `false` when no event had this id.
    async fn delete_event(&self, id: Uuid) -> Result<bool, AppError>;

    async fn count_events(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait RegistrationStore: Send + Sync {
    /// Newest first, left-joined with the event title.
    async fn list_registrations(&self) -> Result<Vec<RegistrationWithEvent>, AppError>;

    async fn insert_registration(&self, registration: NewRegistration) -> Result<Registration, AppError>;

    /// Returns the number of rows removed.
    async fn delete_registrations_for_event(&self, event_id: Uuid) -> Result<u64, AppError>;

    async fn count_registrations(&self) -> Result<i64, AppError>;
}

#[async_trait]
pub trait AdminStore: Send + Sync {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError>;

    async fn insert_admin(&self, admin: &Admin) -> Result<(), AppError>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, session: &Session) -> Result<(), AppError>;

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, AppError>;

    async fn delete_session(&self, token_hash: &str) -> Result<(), AppError>;

    /// Removes every session that expired at or before `now`.
    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AppError>;
}
