use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AdminStore, EventStore, RegistrationStore, SessionStore};
use crate::db::Database;
use crate::models::{Admin, Event, NewEvent, NewRegistration, Registration, RegistrationWithEvent, Session};
use crate::utils::error::AppError;

/// Postgres-backed implementation of every store trait. Each call borrows
/// the shared pool from the [`Database`] gateway.
#[derive(Clone)]
pub struct PgStore {
    db: Arc<Database>,
}

impl PgStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    async fn pool(&self) -> Result<&PgPool, AppError> {
        self.db.pool().await
    }
}

#[async_trait]
impl EventStore for PgStore {
    async fn list_events(&self) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, title, date, image, created_at, updated_at \
             FROM events ORDER BY created_at DESC",
        )
        .fetch_all(self.pool().await?)
        .await?;
        Ok(events)
    }

    async fn find_event(&self, id: Uuid) -> Result<Option<Event>, AppError> {
        let event = sqlx::query_as::<_, Event>(
            "SELECT id, title, date, image, created_at, updated_at FROM events WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool().await?)
        .await?;
        Ok(event)
    }

    async fn insert_event(&self, event: NewEvent) -> Result<Event, AppError> {
        let event = event.into_event(Utc::now());
        let inserted = sqlx::query_as::<_, Event>(
            "INSERT INTO events (id, title, date, image, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, title, date, image, created_at, updated_at",
        )
        .bind(event.id)
        .bind(&event.title)
        .bind(&event.date)
        .bind(&event.image)
        .bind(event.created_at)
        .bind(event.updated_at)
        .fetch_one(self.pool().await?)
        .await?;
        Ok(inserted)
    }

    async fn delete_event(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(self.pool().await?)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_events(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM events")
            .fetch_one(self.pool().await?)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl RegistrationStore for PgStore {
    async fn list_registrations(&self) -> Result<Vec<RegistrationWithEvent>, AppError> {
        let rows = sqlx::query_as::<_, RegistrationWithEvent>(
            "SELECT r.id, r.name, r.phone, r.location, r.event_id, \
                    e.title AS event_title, r.created_at \
             FROM event_registrations r \
             LEFT JOIN events e ON e.id = r.event_id \
             ORDER BY r.created_at DESC",
        )
        .fetch_all(self.pool().await?)
        .await?;
        Ok(rows)
    }

    async fn insert_registration(&self, registration: NewRegistration) -> Result<Registration, AppError> {
        let registration = registration.into_registration(Utc::now());
        let inserted = sqlx::query_as::<_, Registration>(
            "INSERT INTO event_registrations \
                 (id, name, phone, location, event_id, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING id, name, phone, location, event_id, created_at, updated_at",
        )
        .bind(registration.id)
        .bind(&registration.name)
        .bind(&registration.phone)
        .bind(&registration.location)
        .bind(registration.event_id)
        .bind(registration.created_at)
        .bind(registration.updated_at)
        .fetch_one(self.pool().await?)
        .await?;
        Ok(inserted)
    }

    async fn delete_registrations_for_event(&self, event_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM event_registrations WHERE event_id = $1")
            .bind(event_id)
            .execute(self.pool().await?)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count_registrations(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_registrations")
            .fetch_one(self.pool().await?)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl AdminStore for PgStore {
    async fn find_admin_by_email(&self, email: &str) -> Result<Option<Admin>, AppError> {
        let admin = sqlx::query_as::<_, Admin>(
            "SELECT id, name, email, password_hash, created_at FROM admins WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(self.pool().await?)
        .await?;
        Ok(admin)
    }

    async fn insert_admin(&self, admin: &Admin) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO admins (id, name, email, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(admin.id)
        .bind(&admin.name)
        .bind(&admin.email)
        .bind(&admin.password_hash)
        .bind(admin.created_at)
        .execute(self.pool().await?)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert_session(&self, session: &Session) -> Result<(), AppError> {
        sqlx::query(
            "INSERT INTO admin_sessions \
                 (id, admin_id, token_hash, remember_me, expires_at, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(session.id)
        .bind(session.admin_id)
        .bind(&session.token_hash)
        .bind(session.remember_me)
        .bind(session.expires_at)
        .bind(session.created_at)
        .execute(self.pool().await?)
        .await?;
        Ok(())
    }

    async fn find_session(&self, token_hash: &str) -> Result<Option<Session>, AppError> {
        let session = sqlx::query_as::<_, Session>(
            "SELECT id, admin_id, token_hash, remember_me, expires_at, created_at \
             FROM admin_sessions WHERE token_hash = $1",
        )
        .bind(token_hash)
        .fetch_optional(self.pool().await?)
        .await?;
        Ok(session)
    }

    async fn delete_session(&self, token_hash: &str) -> Result<(), AppError> {
        sqlx::query("DELETE FROM admin_sessions WHERE token_hash = $1")
            .bind(token_hash)
            .execute(self.pool().await?)
            .await?;
        Ok(())
    }

    async fn delete_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM admin_sessions WHERE expires_at <= $1")
            .bind(now)
            .execute(self.pool().await?)
            .await?;
        Ok(result.rows_affected())
    }
}
