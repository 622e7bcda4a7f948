use axum::{
    extract::{Multipart, Path, Query, State},
    response::Response,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::actions::{events, uploads};
use crate::actions::uploads::{UploadRequest, UploadedFile};
use crate::state::AppState;
use crate::storage::EVENT_BUCKET;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub date: String,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub bucket: Option<String>,
}

pub async fn dashboard(State(state): State<AppState>) -> Result<Response, AppError> {
    let summary = events::dashboard_summary(state.events.as_ref(), state.registrations.as_ref()).await?;
    Ok(success(summary, "Dashboard loaded"))
}

pub async fn list_events(State(state): State<AppState>) -> Response {
    let events = events::list_events(state.events.as_ref(), &state.images).await;
    success(events, "Events fetched successfully")
}

pub async fn create_event(
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<Response, AppError> {
    let event = events::create_event(
        state.events.as_ref(),
        &state.images,
        &req.title,
        &req.date,
        req.image.as_deref(),
    )
    .await?;
    Ok(created(event, "Event created successfully"))
}

pub async fn delete_event(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Response, AppError> {
    let outcome = events::delete_event(state.events.as_ref(), state.registrations.as_ref(), id).await?;
    Ok(success(
        outcome,
        "Event and associated registrations deleted successfully",
    ))
}

pub async fn upload_image(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> Result<Response, AppError> {
    let mut request = UploadRequest::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid upload: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::ValidationError(format!("Invalid upload: {e}")))?;
                request.file = Some(UploadedFile {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            Some("fileName") => {
                let name = field
                    .text()
                    .await
                    .map_err(|e| AppError::ValidationError(format!("Invalid upload: {e}")))?;
                request.object_name = Some(name);
            }
            _ => {}
        }
    }

    let bucket = query.bucket.as_deref().unwrap_or(EVENT_BUCKET);
    let stored = uploads::upload_event_image(
        state.blobs.as_ref(),
        bucket,
        request,
        Utc::now().timestamp_millis(),
    )
    .await?;
    Ok(created(stored, "File uploaded successfully"))
}
