//! In-memory store used by tests. Can be switched into a failing mode to
//! exercise the storage-failure paths.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{AdminStore, EventStore, RegistrationStore, SessionStore};
use crate::models::{Admin, Event, NewEvent, NewRegistration, Registration, RegistrationWithEvent, Session};
use crate::utils::error::AppError;

#[derive(Default)]
pub struct MemoryStore {
    events: Mutex<Vec<Event>>,
    registrations: Mutex<Vec<Registration>>,
    admins: Mutex<Vec<Admin>>,
    sessions: Mutex<Vec<Session>>,
    failing: AtomicBool,
    fail_event_delete: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Fail only the event delete, after registrations were removed.
    pub fn set_fail_event_delete(&self, failing: bool) {
        self.fail_event_delete.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), AppError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }

    pub fn add_event(&self, title: &str, created_at: DateTime<Utc>) -> Event {
        let event = NewEvent::parse(title, "2026-11-02T07:00", None)
            .unwrap()
            .into_event(created_at);
        self.events.lock().unwrap().push(event.clone());
        event
    }

    pub fn add_registration(
        &self,
        event_id: Uuid,
        name: &str,
        phone: &str,
        created_at: DateTime<Utc>,
    ) -> Registration {
        let registration = NewRegistration::parse(event_id, name, phone, "Pune")
            .unwrap()
            .into_registration(created_at);
        self.registrations.lock().unwrap().push(registration.clone());
        registration
    }

    pub fn registrations(&self) -> Vec<Registration> {
        self.registrations.lock().unwrap().clone()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.lock().unwrap().len()
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        self.check()?;
        let mut events = self.events.lock().unwrap().clone();
        events.reverse();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        self.check()?;
        Ok(self.events.lock().unwrap().iter().find(|e| e.id == id).cloned())
    }

    async fn insert_event(&self, event: NewEvent) -> Result<Event, AppError> {
        self.check()?;
        let event = event.into_event(Utc::now());
        self.events.lock().unwrap().push(event.clone());
        Ok(event)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, AppError> {
        self.check()?;
        if self.fail_event_delete.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError(sqlx::Error::PoolTimedOut));
        }
        let mut events = self.events.lock().unwrap();
        let before = events.len();
        events.retain(|e| e.id != id);
        Ok(events.len() < before)
    }

    async fn count_events(&self) -> Result<i64, AppError> {
        self.check()?;
        Ok(self.events.lock().unwrap().len() as i64)
    }
}

#[async_trait]
impl RegistrationStore for MemoryStore {
    async fn list_registrations(&self) -> Result<Vec<RegistrationWithEvent>, AppError> {
        self.check()?;
        let events = self.events.lock().unwrap().clone();
        let mut rows: Vec<_> = self
            .registrations
            .lock()
            .unwrap()
            .iter()
            .rev()
            .map(|r| RegistrationWithEvent {
                id: r.id,
                name: r.name.clone(),
                phone: r.phone.clone(),
                location: r.location.clone(),
                event_id: r.event_id,
                event_title: events.iter().find(|e| e.id == r.event_id).map(|e| e.title.clone()),
                created_at: r.created_at,
            })
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn insert_registration(&self, registration: NewRegistration) -> Result<Registration, AppError> {
        self.check()?;
        let registration = registration.into_registration(Utc::now());
        self.registrations.lock().unwrap().push(registration.clone());
        Ok(registration)
    }

    async fn delete_registrations_for_event(&self, event_id: Uuid) -> Result<u64, AppError> {
        self.check()?;
        let mut registrations = self.registrations.lock().unwrap();
        let before = registrations.len();
        registrations.retain(|r| r.event_id != event_id);
        Ok((before - registrations.len()) as u64)
    }

    async fn count_registrations(&self) -> Result<i64, AppError> {
        self.check()?;
        Ok(self.registrations.lock().unwrap().len() as i64)
    }
}

#[async_trait]
impl AdminStore for MemoryStore {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        self.check()?;
        Ok(self.admins.lock().unwrap().iter().find(|a| a.email == email).cloned())
    }

    async fn insert_admin(&self, admin: &Admin) -> Result<(), AppError> {
        self.check()?;
        self.admins.lock().unwrap().push(admin.clone());
        Ok(())
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        self.check()?;
        self.sessions.lock().unwrap().push(session.clone());
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        self.check()?;
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.token_hash == token_hash)
            .cloned())
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), AppError> {
        self.check()?;
        self.sessions.lock().unwrap().retain(|s| s.token_hash != token_hash);
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        self.check()?;
        let mut sessions = self.sessions.lock().unwrap();
        let before = sessions.len();
        sessions.retain(|s| !s.is_expired_at(now));
        Ok((before - sessions.len()) as u64)
    }
}
