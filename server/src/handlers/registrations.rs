use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::actions::registrations;
use crate::registrations::{export_file_name, to_csv, RegistrationFilter, RegistrationQuery};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub phone: String,
    pub location: String,
}

pub async fn list_registrations(
    State(state): State<AppState>,
    Query(query): Query<RegistrationQuery>,
) -> Result<Response, AppError> {
    let filter = RegistrationFilter::from_query(&query)?;
    let listing = registrations::filtered_registrations(state.registrations.as_ref(), &filter).await;
    Ok(success(listing, "Registrations fetched successfully"))
}

pub async fn export_registrations(
    State(state): State<AppState>,
    Query(query): Query<RegistrationQuery>,
) -> Result<Response, AppError> {
    let filter = RegistrationFilter::from_query(&query)?;
    let listing = registrations::filtered_registrations(state.registrations.as_ref(), &filter).await;
    if listing.rows.is_empty() {
        return Err(AppError::ValidationError("No data to export".to_string()));
    }

    let disposition = format!(
        "attachment; filename=\"{}\"",
        export_file_name(Utc::now().date_naive())
    );
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        to_csv(&listing.rows),
    )
        .into_response())
}

pub async fn register_for_event(
    State(state): State<AppState>,
    Path(event_id): Path<Uuid>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, AppError> {
    let registration = registrations::create_registration(
        state.events.as_ref(),
        state.registrations.as_ref(),
        event_id,
        &req.name,
        &req.phone,
        &req.location,
    )
    .await?;
    Ok(created(registration, "Registered successfully"))
}
