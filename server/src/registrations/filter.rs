//! In-memory registration filters.
//!
//! Applied to the full fetched set, never pushed down to storage. The
//! search, event and date filters are ANDed.

use chrono::NaiveDate;
use serde::Deserialize;

use super::RegistrationRow;
use crate::utils::error::AppError;

pub const ALL_EVENTS: &str = "all";

/// Raw query-string form of a filter.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationQuery {
    pub search: Option<String>,
    pub event: Option<String>,
    /// `YYYY-MM-DD`
    pub from: Option<String>,
    /// `YYYY-MM-DD`
    pub to: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventFilter {
    #[default]
    All,
    Only(String),
}

/// Inclusive on both ends at day granularity. No upper bound means
/// open-ended after `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub from: NaiveDate,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, day: NaiveDate) -> bool {
        day >= self.from && self.to.map_or(true, |to| day <= to)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationFilter {
    /// Lower-cased needle; `None` disables the search.
    search: Option<String>,
    event: EventFilter,
    dates: Option<DateRange>,
}

impl RegistrationFilter {
    pub fn new(search: Option<&str>, event: EventFilter, dates: Option<DateRange>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        Self {
            search,
            event,
            dates,
        }
    }

    pub fn from_query(query: &RegistrationQuery) -> Result<Self, AppError> {
        let event = match query.event.as_deref().map(str::trim) {
            None | Some("") | Some(ALL_EVENTS) => EventFilter::All,
            Some(id) => EventFilter::Only(id.to_string()),
        };

        let from = parse_day("from", query.from.as_deref())?;
        let to = parse_day("to", query.to.as_deref())?;
        // Only a lower bound switches the date filter on.
        let dates = from.map(|from| DateRange { from, to });

        Ok(Self::new(query.search.as_deref(), event, dates))
    }

    pub fn matches(&self, row: &RegistrationRow) -> bool {
        if let Some(needle) = &self.search {
            let hit = row.name.to_lowercase().contains(needle.as_str())
                || row.phone.to_lowercase().contains(needle.as_str());
            if !hit {
                return false;
            }
        }

        if let EventFilter::Only(id) = &self.event {
            if &row.event_id != id {
                return false;
            }
        }

        if let Some(range) = &self.dates {
            if !range.contains(row.raw_date.date_naive()) {
                return false;
            }
        }

        true
    }

    pub fn apply(&self, rows: &[RegistrationRow]) -> Vec<RegistrationRow> {
        rows.iter().filter(|row| self.matches(row)).cloned().collect()
    }
}

fn parse_day(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::ValidationError(format!("{field} must be a date in YYYY-MM-DD format"))),
    }
}
