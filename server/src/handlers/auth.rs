use axum::{extract::State, http::HeaderMap, response::Response, Json};
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::{SessionView, SignInOptions};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{empty_success, success};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
    #[serde(rename = "callbackURL")]
    pub callback_url: Option<String>,
    pub remember_me: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub redirect_to: String,
    pub admin: AdminView,
}

#[derive(Debug, Serialize)]
pub struct AdminView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<SignInRequest>,
) -> Result<(CookieJar, Response), AppError> {
    let options = SignInOptions {
        callback_url: req.callback_url,
        remember_me: req.remember_me,
    };
    let signed_in = state.auth.sign_in(&req.email, &req.password, options).await?;

    let jar = jar.add(state.auth.session_cookie(&signed_in));
    let body = SignInResponse {
        redirect_to: signed_in.redirect_to,
        admin: AdminView {
            id: signed_in.admin.id,
            name: signed_in.admin.name,
            email: signed_in.admin.email,
        },
    };

    Ok((jar, success(body, "Signed in successfully")))
}

/// The cookie is only cleared once the stored session is really gone.
pub async fn sign_out(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
) -> Result<(CookieJar, Response), AppError> {
    state.auth.sign_out(&headers).await?;
    Ok((
        jar.remove(state.auth.removal_cookie()),
        empty_success("Signed out successfully"),
    ))
}

pub async fn current_session(State(state): State<AppState>, headers: HeaderMap) -> Response {
    let session = state.auth.get_session(&headers).await;
    success(session.as_ref().map(SessionView::from), "Session lookup completed")
}
