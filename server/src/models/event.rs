use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    /// Stored as entered; no timezone normalisation.
    pub date: String,
    /// Object path in the `event` bucket, or empty.
    pub image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for a new event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub image: String,
}

impl NewEvent {
    pub fn parse(title: &str, date: &str, image: Option<&str>) -> Result<Self, AppError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::ValidationError("Title is required".to_string()));
        }
        if date.trim().is_empty() {
            return Err(AppError::ValidationError("Date is required".to_string()));
        }

        Ok(Self {
            title: title.to_string(),
            date: date.to_string(),
            image: image.unwrap_or_default().to_string(),
        })
    }

    pub fn into_event(self, now: DateTime<Utc>) -> Event {
        Event {
            id: Uuid::new_v4(),
            title: self.title,
            date: self.date,
            image: self.image,
            created_at: now,
            updated_at: now,
        }
    }
}
