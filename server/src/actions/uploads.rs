use crate::storage::{BlobStore, StoredObject};
use crate::utils::error::AppError;

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct UploadRequest {
    pub file: Option<UploadedFile>,
    /// Object name to store under. Derived from the file name when absent.
    pub object_name: Option<String>,
}

/// Uploads an event cover image. Name collisions come back from the
/// storage service as errors; nothing is overwritten.
pub async fn upload_event_image(
    blobs: &dyn BlobStore,
    bucket: &str,
    request: UploadRequest,
    now_millis: i64,
) -> Result<StoredObject, AppError> {
    let file = request
        .file
        .filter(|f| !f.bytes.is_empty())
        .ok_or_else(|| AppError::ValidationError("No file provided".to_string()))?;

    let object_name = match request.object_name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => format!("event-{now_millis}-{}", file.file_name),
    };
    if object_name.split('/').any(|segment| segment == "..") {
        return Err(AppError::ValidationError("Invalid file name".to_string()));
    }

    let stored = blobs
        .put_object(bucket, &object_name, file.bytes, file.content_type.as_deref())
        .await
        .map_err(|e| {
            tracing::warn!(error = ?e, bucket, object_name = %object_name, "Image upload failed");
            match e {
                AppError::ExternalServiceError(_) | AppError::ValidationError(_) => e,
                other => AppError::ExternalServiceError(format!("Upload failed: {}", other.public_message())),
            }
        })?;

    tracing::info!(bucket, path = %stored.path, "Event image uploaded");
    Ok(stored)
}
