use std::sync::Arc;

use crate::auth::AuthService;
use crate::config::Config;
use crate::db::Database;
use crate::storage::{BlobStore, ImageResolver, SupabaseStorage};
use crate::store::{EventStore, PgStore, RegistrationStore};

/// Everything a handler may touch, built once at startup and shared by
/// reference. There is no ambient global state.
#[derive(Clone)]
pub struct AppState {
    pub events: Arc<dyn EventStore>,
    pub registrations: Arc<dyn RegistrationStore>,
    pub blobs: Arc<dyn BlobStore>,
    pub images: ImageResolver,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn from_config(config: &Config, db: Arc<Database>) -> Self {
        let store = Arc::new(PgStore::new(db));

        Self {
            events: store.clone(),
            registrations: store.clone(),
            blobs: Arc::new(SupabaseStorage::new(&config.storage)),
            images: ImageResolver::new(config.storage.public_url.clone()),
            auth: Arc::new(AuthService::new(
                store.clone(),
                store,
                config.session.clone(),
            )),
        }
    }
}
