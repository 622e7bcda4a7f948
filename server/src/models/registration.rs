use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::utils::error::AppError;

const MIN_NAME_LEN: usize = 2;
const MIN_PHONE_LEN: usize = 8;
const MIN_LOCATION_LEN: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A registration joined with its event's title. `event_title` is `None`
/// when the referenced event no longer exists.
#[derive(Debug, Clone, FromRow)]
pub struct RegistrationWithEvent {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub location: String,
    pub event_id: Uuid,
    pub event_title: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRegistration {
    pub name: String,
    pub phone: String,
    pub location: String,
    pub event_id: Uuid,
}

impl NewRegistration {
    pub fn parse(event_id: Uuid, name: &str, phone: &str, location: &str) -> Result<Self, AppError> {
        let name = name.trim();
        let location = location.trim();

        check_min_len("name", name, MIN_NAME_LEN)?;
        check_min_len("phone", phone, MIN_PHONE_LEN)?;
        check_min_len("location", location, MIN_LOCATION_LEN)?;

        Ok(Self {
            name: name.to_string(),
            phone: phone.to_string(),
            location: location.to_string(),
            event_id,
        })
    }

    pub fn into_registration(self, now: DateTime<Utc>) -> Registration {
        Registration {
            id: Uuid::new_v4(),
            name: self.name,
            phone: self.phone,
            location: self.location,
            event_id: self.event_id,
            created_at: now,
            updated_at: now,
        }
    }
}

fn check_min_len(field: &str, value: &str, min: usize) -> Result<(), AppError> {
    if value.chars().count() < min {
        return Err(AppError::ValidationError(format!(
            "{field} must be at least {min} characters"
        )));
    }
    Ok(())
}
