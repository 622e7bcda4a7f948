//! Registration view rows and the operations that run over them in
//! memory: filtering and CSV export.

pub mod export;
pub mod filter;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::RegistrationWithEvent;

pub use export::{export_file_name, to_csv};
pub use filter::{DateRange, EventFilter, RegistrationFilter, RegistrationQuery};

pub const UNKNOWN_EVENT: &str = "Unknown Event";
const MISSING_LOCATION: &str = "N/A";

/// One row of the admin registrations table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRow {
    pub id: String,
    pub name: String,
    pub phone: String,
    pub location: String,
    /// Event title, or "Unknown Event" when the event is gone.
    pub event: String,
    /// Empty when the event is gone.
    pub event_id: String,
    /// Display date, e.g. "Oct 19, 2026".
    pub date: String,
    pub raw_date: DateTime<Utc>,
}

impl From<RegistrationWithEvent> for RegistrationRow {
    fn from(reg: RegistrationWithEvent) -> Self {
        let (event, event_id) = match reg.event_title {
            Some(title) => (title, reg.event_id.to_string()),
            None => (UNKNOWN_EVENT.to_string(), String::new()),
        };

        Self {
            id: reg.id.to_string(),
            name: reg.name,
            phone: reg.phone,
            location: if reg.location.is_empty() {
                MISSING_LOCATION.to_string()
            } else {
                reg.location
            },
            event,
            event_id,
            date: display_date(reg.created_at),
            raw_date: reg.created_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventOption {
    pub id: String,
    pub title: String,
}

/// Distinct events present in `rows`, in first-seen order.
pub fn event_options(rows: &[RegistrationRow]) -> Vec<EventOption> {
    let mut options: Vec<EventOption> = Vec::new();
    for row in rows {
        if !options.iter().any(|o| o.id == row.event_id) {
            options.push(EventOption {
                id: row.event_id.clone(),
                title: row.event.clone(),
            });
        }
    }
    options
}

pub fn display_date(at: DateTime<Utc>) -> String {
    at.format("%b %-d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn joined(title: Option<&str>, location: &str) -> RegistrationWithEvent {
        RegistrationWithEvent {
            id: Uuid::new_v4(),
            name: "Anita Rao".into(),
            phone: "9998887776".into(),
            location: location.into(),
            event_id: Uuid::new_v4(),
            event_title: title.map(Into::into),
            created_at: Utc.with_ymd_and_hms(2026, 10, 9, 18, 30, 0).unwrap(),
        }
    }

    #[test]
    fn test_row_from_join_hit() {
        let reg = joined(Some("Morning Yoga"), "Pune");
        let event_id = reg.event_id.to_string();
        let row = RegistrationRow::from(reg);
        assert_eq!(row.event, "Morning Yoga");
        assert_eq!(row.event_id, event_id);
        assert_eq!(row.date, "Oct 9, 2026");
        assert_eq!(row.raw_date, Utc.with_ymd_and_hms(2026, 10, 9, 18, 30, 0).unwrap());
    }

    #[test]
    fn test_row_from_join_miss() {
        let row = RegistrationRow::from(joined(None, ""));
        assert_eq!(row.event, "Unknown Event");
        assert_eq!(row.event_id, "");
        assert_eq!(row.location, "N/A");
    }

    #[test]
    fn test_event_options_are_distinct() {
        let a = RegistrationRow::from(joined(Some("Yoga"), "Pune"));
        let mut b = a.clone();
        b.id = "other".into();
        let c = RegistrationRow::from(joined(Some("Sound Bath"), "Goa"));

        let options = event_options(&[a.clone(), b, c.clone()]);
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].id, a.event_id);
        assert_eq!(options[1].title, "Sound Bath");
    }
}
