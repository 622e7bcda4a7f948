use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, create_security_headers_layer, HttpConfig};
use crate::handlers::{auth, events, health_check, registrations};
use crate::middleware::require_session;
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 6 * 1024 * 1024;

pub fn create_routes(state: AppState, http: &HttpConfig) -> Router {
    let admin = Router::new()
        .route("/web-app", get(events::dashboard))
        .route(
            "/web-app/events",
            get(events::list_events).post(events::create_event),
        )
        .route("/web-app/events/images", post(events::upload_image))
        .route("/web-app/events/:id", delete(events::delete_event))
        .route("/web-app/registrations", get(registrations::list_registrations))
        .route(
            "/web-app/registrations/export",
            get(registrations::export_registrations),
        );

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/sign-out", post(auth::sign_out))
        .route("/auth/session", get(auth::current_session))
        .route(
            "/events/:id/registrations",
            post(registrations::register_for_event),
        )
        .merge(admin)
        .layer(middleware::from_fn_with_state(state.clone(), require_session))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(create_security_headers_layer(http.is_production))
        .layer(create_cors_layer(&http.allowed_origins))
        .with_state(state)
}
