//! Blob storage gateway for event cover images.
//!
//! Talks to a Supabase-compatible storage REST API. Objects are written
//! once; an existing object at the same path is reported back as an
//! error by the service and surfaced unchanged.

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};

use crate::config::StorageConfig;
use crate::db::{Connect, Shared};
use crate::utils::error::AppError;

pub const EVENT_BUCKET: &str = "event";
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";
const CACHE_CONTROL: &str = "max-age=3600";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredObject {
    /// Path inside the bucket.
    pub path: String,
    /// `bucket/path` as reported by the service.
    pub full_path: String,
}

#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` at `bucket/path`. Never overwrites.
    async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<StoredObject, AppError>;
}

/// Resolves a stored image path to something a browser can load.
#[derive(Debug, Clone)]
pub struct ImageResolver {
    public_base: String,
}

impl ImageResolver {
    pub fn new(public_base: impl Into<String>) -> Self {
        Self {
            public_base: public_base.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn resolve(&self, bucket: &str, path: Option<&str>) -> String {
        match path {
            None | Some("") => PLACEHOLDER_IMAGE.to_string(),
            Some(path) if path.starts_with("http") => path.to_string(),
            Some(path) => format!("{}/object/public/{}/{}", self.public_base, bucket, path),
        }
    }
}

struct StorageConnector {
    service_key: String,
}

#[async_trait]
impl Connect for StorageConnector {
    type Handle = Client;

    async fn connect(&self) -> Result<Client, AppError> {
        let mut headers = HeaderMap::new();
        let bearer = format!("Bearer {}", self.service_key);
        for (name, value) in [("apikey", self.service_key.as_str()), ("authorization", bearer.as_str())] {
            let mut value = HeaderValue::from_str(value).map_err(|_| {
                AppError::InternalServerError("Storage service key is not a valid header value".into())
            })?;
            value.set_sensitive(true);
            headers.insert(name, value);
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AppError::InternalServerError(format!("Failed to build storage client: {e}")))?;

        tracing::info!("Storage client initialised");
        Ok(client)
    }
}

pub struct SupabaseStorage {
    base_url: String,
    client: Shared<StorageConnector>,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(rename = "Key")]
    key: Option<String>,
}

#[derive(Deserialize)]
struct StorageErrorBody {
    message: Option<String>,
    error: Option<String>,
}

impl SupabaseStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            base_url: config.url.clone(),
            client: Shared::new(StorageConnector {
                service_key: config.service_key.clone(),
            }),
        }
    }

    fn object_url(&self, bucket: &str, path: &str) -> Result<Url, AppError> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| AppError::InternalServerError(format!("Invalid storage URL: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| AppError::InternalServerError("Storage URL cannot be a base".into()))?
            .pop_if_empty()
            .push("object")
            .push(bucket)
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }
}

#[async_trait]
impl BlobStore for SupabaseStorage {
    async fn put_object(
        &self,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: Option<&str>,
    ) -> Result<StoredObject, AppError> {
        let client = self.client.get().await?;
        let url = self.object_url(bucket, path)?;

        let response = client
            .post(url)
            .header(header::CACHE_CONTROL, CACHE_CONTROL)
            .header(header::CONTENT_TYPE, content_type.unwrap_or("application/octet-stream"))
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Upload failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<StorageErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message.or(body.error))
                .unwrap_or_else(|| format!("Upload failed with status {status}"));
            tracing::warn!(%status, bucket, path, message = %message, "Storage rejected upload");
            return Err(AppError::ExternalServiceError(message));
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalServiceError(format!("Upload failed: {e}")))?;

        Ok(StoredObject {
            path: path.to_string(),
            full_path: body.key.unwrap_or_else(|| format!("{bucket}/{path}")),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ImageResolver {
        ImageResolver::new("https://x.supabase.co/storage/v1/")
    }

    #[test]
    fn test_missing_path_uses_placeholder() {
        assert_eq!(resolver().resolve(EVENT_BUCKET, None), "/placeholder.jpg");
        assert_eq!(resolver().resolve(EVENT_BUCKET, Some("")), "/placeholder.jpg");
    }

    #[test]
    fn test_absolute_url_returned_unchanged() {
        let url = "https://cdn.example.com/yoga.jpg";
        assert_eq!(resolver().resolve(EVENT_BUCKET, Some(url)), url);
    }

    #[test]
    fn test_bare_path_is_qualified() {
        assert_eq!(
            resolver().resolve("event", Some("event-1-yoga.jpg")),
            "https://x.supabase.co/storage/v1/object/public/event/event-1-yoga.jpg"
        );
    }

    #[test]
    fn test_object_url_encodes_segments() {
        let storage = SupabaseStorage::new(&StorageConfig {
            url: "https://x.supabase.co/storage/v1".into(),
            service_key: "key".into(),
            public_url: "https://x.supabase.co/storage/v1".into(),
        });
        let url = storage.object_url("event", "event-1-my photo.jpg").unwrap();
        assert_eq!(
            url.as_str(),
            "https://x.supabase.co/storage/v1/object/event/event-1-my%20photo.jpg"
        );
    }

    #[tokio::test]
    async fn test_client_built_once() {
        let storage = SupabaseStorage::new(&StorageConfig {
            url: "https://x.supabase.co/storage/v1".into(),
            service_key: "key".into(),
            public_url: "https://x.supabase.co/storage/v1".into(),
        });
        assert!(!storage.client.is_connected());
        storage.client.get().await.unwrap();
        assert!(storage.client.is_connected());
    }

    #[tokio::test]
    async fn test_memory_store_refuses_overwrite() {
        let store = memory::MemoryBlobStore::default();
        let stored = store.put_object("event", "a.jpg", vec![1], None).await.unwrap();
        assert_eq!(stored.full_path, "event/a.jpg");
        assert!(store.contains("event/a.jpg"));
        assert!(store.put_object("event", "a.jpg", vec![2], None).await.is_err());
    }
}
