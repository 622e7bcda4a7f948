//! Session/auth service.
//!
//! Sign-in checks an admin's credentials and issues an opaque random
//! token carried in an `HttpOnly` cookie. Only the SHA-256 of the token
//! is stored. Session lookups never fail: anything other than a live,
//! stored session reads as "no session".

pub mod password;

use std::sync::Arc;

use axum::http::HeaderMap;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::Utc;
use rand::RngCore;
use serde::Serialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::actions::storage_failure;
use crate::config::SessionConfig;
use crate::models::admin::normalize_email;
use crate::models::{Admin, Session};
use crate::store::{AdminStore, SessionStore};
use crate::utils::error::AppError;

pub use password::{hash_password, verify_dummy, verify_password};

pub const SIGN_IN_PATH: &str = "/auth/sign-in";
pub const DEFAULT_CALLBACK: &str = "/web-app";
const INVALID_CREDENTIALS: &str = "Invalid email or password";
const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone, Default)]
pub struct SignInOptions {
    pub callback_url: Option<String>,
    pub remember_me: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct SignedIn {
    pub admin: Admin,
    pub session: Session,
    /// Raw cookie token. Only ever handed to the client.
    pub token: String,
    pub redirect_to: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub admin_id: Uuid,
    pub expires_at: chrono::DateTime<Utc>,
    pub remember_me: bool,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            admin_id: session.admin_id,
            expires_at: session.expires_at,
            remember_me: session.remember_me,
        }
    }
}

pub struct AuthService {
    admins: Arc<dyn AdminStore>,
    sessions: Arc<dyn SessionStore>,
    config: SessionConfig,
}

impl AuthService {
    pub fn new(admins: Arc<dyn AdminStore>, sessions: Arc<dyn SessionStore>, config: SessionConfig) -> Self {
        Self {
            admins,
            sessions,
            config,
        }
    }

    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    pub async fn sign_in(
        &self,
        email: &str,
        password: &str,
        options: SignInOptions,
    ) -> Result<SignedIn, AppError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(AppError::ValidationError("Email and password are required".into()));
        }

        let Some(admin) = self.admins.find_admin_by_email(&email).await? else {
            verify_dummy(password);
            return Err(AppError::AuthError(INVALID_CREDENTIALS.into()));
        };

        if !verify_password(password, &admin.password_hash)? {
            tracing::info!(admin_id = %admin.id, "Sign-in rejected: wrong password");
            return Err(AppError::AuthError(INVALID_CREDENTIALS.into()));
        }

        let remember_me = options.remember_me.unwrap_or(true);
        let ttl = if remember_me {
            self.config.remember_ttl
        } else {
            self.config.ttl
        };

        let now = Utc::now();
        match self.sessions.delete_expired_sessions(now).await {
            Ok(0) => {}
            Ok(swept) => tracing::debug!(swept, "Expired sessions removed"),
            Err(e) => tracing::warn!(error = ?e, "Failed to remove expired sessions"),
        }

        let token = generate_token();
        let session = Session {
            id: Uuid::new_v4(),
            admin_id: admin.id,
            token_hash: hash_token(&token),
            remember_me,
            expires_at: now + ttl,
            created_at: now,
        };
        self.sessions.insert_session(&session).await?;

        tracing::info!(admin_id = %admin.id, remember_me, "Admin signed in");

        Ok(SignedIn {
            admin,
            session,
            token,
            redirect_to: safe_callback(options.callback_url.as_deref()),
        })
    }

    /// Looks up the session carried by the request cookie. Storage errors
    /// are logged and read as "no session".
    pub async fn get_session(&self, headers: &HeaderMap) -> Option<Session> {
        let jar = CookieJar::from_headers(headers);
        let token = jar.get(&self.config.cookie_name)?.value();
        if token.is_empty() {
            return None;
        }

        let token_hash = hash_token(token);
        match self.sessions.find_session(&token_hash).await {
            Ok(Some(session)) if !session.is_expired_at(Utc::now()) => Some(session),
            Ok(Some(session)) => {
                tracing::debug!(session_id = %session.id, "Session expired");
                if let Err(e) = self.sessions.delete_session(&token_hash).await {
                    tracing::warn!(error = ?e, session_id = %session.id, "Failed to remove expired session");
                }
                None
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(error = ?e, "Session lookup failed; treating request as signed out");
                None
            }
        }
    }

    /// Removes the stored session, if any. Signing out without a session
    /// is a no-op. A storage failure is reported so the caller never
    /// believes a still-valid session is gone.
    pub async fn sign_out(&self, headers: &HeaderMap) -> Result<(), AppError> {
        let jar = CookieJar::from_headers(headers);
        let Some(cookie) = jar.get(&self.config.cookie_name) else {
            return Ok(());
        };

        self.sessions
            .delete_session(&hash_token(cookie.value()))
            .await
            .map_err(|e| storage_failure("Failed to sign out", e))?;
        tracing::info!("Admin signed out");
        Ok(())
    }

    pub fn session_cookie(&self, signed_in: &SignedIn) -> Cookie<'static> {
        let mut builder = Cookie::build((self.config.cookie_name.clone(), signed_in.token.clone()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.config.secure_cookie);

        // Without "remember me" the cookie lives for the browser session only.
        if signed_in.session.remember_me {
            let seconds = (signed_in.session.expires_at - signed_in.session.created_at).num_seconds();
            builder = builder.max_age(time::Duration::seconds(seconds));
        }

        builder.build()
    }

    pub fn removal_cookie(&self) -> Cookie<'static> {
        Cookie::build((self.config.cookie_name.clone(), ""))
            .path("/")
            .build()
    }
}

/// Creates an admin account. Used by the `seed-admin` binary.
pub async fn create_admin(
    admins: &dyn AdminStore,
    name: &str,
    email: &str,
    password: &str,
) -> Result<Admin, AppError> {
    let email = normalize_email(email);
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::ValidationError("A valid email is required".into()));
    }
    if password.chars().count() < 8 {
        return Err(AppError::ValidationError(
            "Password must be at least 8 characters".into(),
        ));
    }
    if admins.find_admin_by_email(&email).await?.is_some() {
        return Err(AppError::ValidationError(format!("An admin with email {email} already exists")));
    }

    let admin = Admin {
        id: Uuid::new_v4(),
        name: name.trim().to_string(),
        email,
        password_hash: hash_password(password)?,
        created_at: Utc::now(),
    };
    admins.insert_admin(&admin).await?;
    Ok(admin)
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

/// Only same-site paths are accepted as post-login destinations.
fn safe_callback(callback: Option<&str>) -> String {
    match callback {
        Some(path) if path.starts_with('/') && !path.starts_with("//") && !path.contains('\\') => {
            path.to_string()
        }
        Some(other) => {
            tracing::debug!(callback = other, "Ignoring non-local callback URL");
            DEFAULT_CALLBACK.to_string()
        }
        None => DEFAULT_CALLBACK.to_string(),
    }
}
