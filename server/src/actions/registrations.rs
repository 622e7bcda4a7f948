use serde::Serialize;
use uuid::Uuid;

use super::storage_failure;
use crate::models::{NewRegistration, Registration};
use crate::registrations::{event_options, EventOption, RegistrationFilter, RegistrationRow};
use crate::store::{EventStore, RegistrationStore};
use crate::utils::error::AppError;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationListing {
    /// Rows that pass the filter, newest first.
    pub rows: Vec<RegistrationRow>,
    /// Every event seen in the unfiltered set, for the filter drop-down.
    pub events: Vec<EventOption>,
    pub total: usize,
}

/// Newest first, joined with event titles. A storage failure yields an
/// empty list.
pub async fn list_registrations(store: &dyn RegistrationStore) -> Vec<RegistrationRow> {
    match store.list_registrations().await {
        Ok(rows) => rows.into_iter().map(RegistrationRow::from).collect(),
        Err(e) => {
            tracing::error!(error = ?e, "Error fetching event registrations");
            Vec::new()
        }
    }
}

pub async fn filtered_registrations(
    store: &dyn RegistrationStore,
    filter: &RegistrationFilter,
) -> RegistrationListing {
    let all = list_registrations(store).await;
    let rows = filter.apply(&all);

    RegistrationListing {
        events: event_options(&all),
        total: all.len(),
        rows,
    }
}

/// Public sign-up for an event. The event must exist at creation time.
pub async fn create_registration(
    events: &dyn EventStore,
    registrations: &dyn RegistrationStore,
    event_id: Uuid,
    name: &str,
    phone: &str,
    location: &str,
) -> Result<Registration, AppError> {
    let new_registration = NewRegistration::parse(event_id, name, phone, location)?;

    let event = events
        .find_event(event_id)
        .await
        .map_err(|e| storage_failure("Failed to register for event", e))?;
    if event.is_none() {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    let registration = registrations
        .insert_registration(new_registration)
        .await
        .map_err(|e| storage_failure("Failed to register for event", e))?;

    tracing::info!(
        registration_id = %registration.id,
        event_id = %registration.event_id,
        "Registration created"
    );
    Ok(registration)
}
