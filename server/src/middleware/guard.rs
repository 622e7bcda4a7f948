//! Route guard.
//!
//! Runs before every handler. Requests under the protected path need a
//! live session; everything else passes straight through. The only I/O
//! performed here is the session lookup.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};

use crate::auth::SIGN_IN_PATH;
use crate::state::AppState;

pub const PROTECTED_PATH: &str = "/web-app";

/// Matches the protected path itself and everything beneath it.
pub fn is_protected(path: &str) -> bool {
    match path.strip_prefix(PROTECTED_PATH) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

pub async fn require_session(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let path = request.uri().path();
    if !is_protected(path) {
        return next.run(request).await;
    }

    if state.auth.get_session(request.headers()).await.is_none() {
        tracing::info!(path, "Unauthenticated request redirected to sign-in");
        return Redirect::temporary(SIGN_IN_PATH).into_response();
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_matcher() {
        assert!(is_protected("/web-app"));
        assert!(is_protected("/web-app/"));
        assert!(is_protected("/web-app/events"));
        assert!(!is_protected("/web-apps"));
        assert!(!is_protected("/"));
        assert!(!is_protected("/auth/sign-in"));
        assert!(!is_protected("/events/1/registrations"));
    }
}
