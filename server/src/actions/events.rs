use serde::Serialize;
use uuid::Uuid;

use super::storage_failure;
use crate::models::{Event, NewEvent};
use crate::storage::{ImageResolver, EVENT_BUCKET};
use crate::store::{EventStore, RegistrationStore};
use crate::utils::error::AppError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: String,
    pub title: String,
    pub date: String,
    pub image: String,
    pub image_url: String,
}

impl EventSummary {
    pub fn new(event: Event, images: &ImageResolver) -> Self {
        let image_url = images.resolve(EVENT_BUCKET, Some(&event.image));
        Self {
            id: event.id.to_string(),
            title: event.title,
            date: event.date,
            image: event.image,
            image_url,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub registrations_removed: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub events: i64,
    pub registrations: i64,
}

/// Newest first. A storage failure yields an empty list.
pub async fn list_events(store: &dyn EventStore, images: &ImageResolver) -> Vec<EventSummary> {
    match store.list_events().await {
        Ok(events) => events
            .into_iter()
            .map(|event| EventSummary::new(event, images))
            .collect(),
        Err(e) => {
            tracing::error!(error = ?e, "Error fetching events");
            Vec::new()
        }
    }
}

pub async fn create_event(
    store: &dyn EventStore,
    images: &ImageResolver,
    title: &str,
    date: &str,
    image: Option<&str>,
) -> Result<EventSummary, AppError> {
    let new_event = NewEvent::parse(title, date, image)?;

    let event = store
        .insert_event(new_event)
        .await
        .map_err(|e| storage_failure("Failed to create event", e))?;

    tracing::info!(event_id = %event.id, title = %event.title, "Event created");
    Ok(EventSummary::new(event, images))
}

/// Removes the event's registrations, then the event. The two steps are
/// not atomic: if the second fails the event survives without its
/// registrations.
pub async fn delete_event(
    events: &dyn EventStore,
    registrations: &dyn RegistrationStore,
    id: Uuid,
) -> Result<DeleteOutcome, AppError> {
    let removed = registrations
        .delete_registrations_for_event(id)
        .await
        .map_err(|e| storage_failure("Failed to delete event", e))?;

    let deleted = events.delete_event(id).await.map_err(|e| {
        if removed > 0 {
            tracing::warn!(
                event_id = %id,
                registrations_removed = removed,
                "Event delete failed after its registrations were removed"
            );
        }
        storage_failure("Failed to delete event", e)
    })?;

    if !deleted {
        return Err(AppError::NotFound("Event not found".to_string()));
    }

    tracing::info!(event_id = %id, registrations_removed = removed, "Event deleted");
    Ok(DeleteOutcome {
        registrations_removed: removed,
    })
}

pub async fn dashboard_summary(
    events: &dyn EventStore,
    registrations: &dyn RegistrationStore,
) -> Result<DashboardSummary, AppError> {
    let summary = DashboardSummary {
        events: events
            .count_events()
            .await
            .map_err(|e| storage_failure("Failed to load dashboard", e))?,
        registrations: registrations
            .count_registrations()
            .await
            .map_err(|e| storage_failure("Failed to load dashboard", e))?,
    };
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::registrations::list_registrations;
    use crate::store::memory::MemoryStore;
    use chrono::{Duration, Utc};

    fn images() -> ImageResolver {
        ImageResolver::new("https://x.supabase.co/storage/v1")
    }

    #[tokio::test]
    async fn test_create_event_echoes_input() {
        let store = MemoryStore::new();
        for (title, date) in [("Morning Yoga", "2026-11-02T07:00"), ("Sound Bath", "Saturday")] {
            let event = create_event(&store, &images(), title, date, None).await.unwrap();
            assert_eq!(event.title, title);
            assert_eq!(event.date, date);
            assert_eq!(event.image, "");
            assert_eq!(event.image_url, "/placeholder.jpg");
        }
    }

    #[tokio::test]
    async fn test_create_event_validation_and_failure() {
        let store = MemoryStore::new();
        let err = create_event(&store, &images(), "", "today", None).await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));

        store.set_failing(true);
        let err = create_event(&store, &images(), "Yoga", "today", None).await.unwrap_err();
        assert!(matches!(err, AppError::StorageFailure(_)));
        assert_eq!(err.public_message(), "Failed to create event");
    }

    #[tokio::test]
    async fn test_list_events_newest_first() {
        let store = MemoryStore::new();
        let now = Utc::now();
        store.add_event("Older", now - Duration::days(2));
        store.add_event("Newest", now);
        store.add_event("Middle", now - Duration::days(1));

        let titles: Vec<_> = list_events(&store, &images())
            .await
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, ["Newest", "Middle", "Older"]);
    }

    #[tokio::test]
    async fn test_list_events_degrades_to_empty() {
        let store = MemoryStore::new();
        store.add_event("Yoga", Utc::now());
        store.set_failing(true);
        assert!(list_events(&store, &images()).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_event_cascades() {
        let store = MemoryStore::new();
        let now = Utc::now();
        let keep = store.add_event("Keep", now);
        let gone = store.add_event("Gone", now);
        store.add_registration(gone.id, "Anita Rao", "9998887776", now);
        store.add_registration(gone.id, "Rahul", "8887776665", now);
        store.add_registration(keep.id, "Meera", "7776665554", now);

        let outcome = delete_event(&store, &store, gone.id).await.unwrap();
        assert_eq!(outcome.registrations_removed, 2);

        let rows = list_registrations(&store).await;
        assert_eq!(rows.len(), 1);
        assert!(rows.iter().all(|r| r.event_id != gone.id.to_string()));
        assert!(store.find_event(gone.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_event_with_no_registrations() {
        let store = MemoryStore::new();
        let event = store.add_event("Quiet", Utc::now());
        let outcome = delete_event(&store, &store, event.id).await.unwrap();
        assert_eq!(outcome.registrations_removed, 0);
    }

    #[tokio::test]
    async fn test_delete_missing_event_is_not_found() {
        let store = MemoryStore::new();
        let event = store.add_event("Yoga", Utc::now());
        store.add_registration(event.id, "Anita Rao", "9998887776", Utc::now());
        let before = store.registrations();

        let err = delete_event(&store, &store, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(err.public_message(), "Event not found");
        assert_eq!(store.registrations().len(), before.len());
    }

    #[tokio::test]
    async fn test_partial_cascade_failure_is_reported() {
        let store = MemoryStore::new();
        let event = store.add_event("Yoga", Utc::now());
        store.add_registration(event.id, "Anita Rao", "9998887776", Utc::now());
        store.set_fail_event_delete(true);

        let err = delete_event(&store, &store, event.id).await.unwrap_err();
        assert!(matches!(err, AppError::StorageFailure(_)));
        // Registrations are gone but the event survives.
        assert!(store.registrations().is_empty());
        assert!(store.find_event(event.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_dashboard_counts() {
        let store = MemoryStore::new();
        let event = store.add_event("Yoga", Utc::now());
        store.add_registration(event.id, "Anita Rao", "9998887776", Utc::now());
        let summary = dashboard_summary(&store, &store).await.unwrap();
        assert_eq!(summary, DashboardSummary { events: 1, registrations: 1 });
    }
}
