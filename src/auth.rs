//! Auth gateway: login, registration, logout, heartbeat and the Google OAuth
//! bridge.
//!
//! ERROR HANDLING
//! ==============
//! Login, registration and OAuth completion surface normalized `ApiError`s.
//! Heartbeat, OAuth pre-fill and the server leg of logout are best-effort:
//! failures are logged and dropped. Logout always clears the local session,
//! including when the future is dropped mid-request.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http;
use crate::session::SessionStore;
use crate::storage::Storage;
use crate::types::{AuthResponse, Credentials, OAuthCompletion, OAuthRegistrationData, Registration, Session, User};

const LOGIN_FAILED: &str = "login failed";
const REGISTER_FAILED: &str = "registration failed";
const OAUTH_COMPLETE_FAILED: &str = "could not complete Google registration";
const PROFILE_FAILED: &str = "could not load the user profile";

#[derive(Clone, Debug)]
pub struct AuthGateway<S> {
    http: reqwest::Client,
    config: ClientConfig,
    store: SessionStore<S>,
}

impl<S: Storage> AuthGateway<S> {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, storage: S) -> Result<Self, ApiError> {
        let http = http::build_client(&config)?;
        Ok(Self { http, config, store: SessionStore::new(storage) })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn store(&self) -> &SessionStore<S> {
        &self.store
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn session(&self) -> Option<Session> {
        self.store.get()
    }

    pub fn current_user(&self) -> Option<User> {
        self.store.current_user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    /// `POST /register`. Persists the session and returns the raw body.
    ///
    /// # Errors
    ///
    /// Normalized backend error, transport failure, or storage failure.
    pub async fn register(&self, fields: &Registration) -> Result<Value, ApiError> {
        self.authenticate(self.config.api_endpoint("/register"), fields, REGISTER_FAILED)
            .await
    }

    /// `POST /login`. Persists the session and returns the raw body.
    ///
    /// # Errors
    ///
    /// Normalized backend error, transport failure, or storage failure.
    pub async fn login(&self, credentials: &Credentials) -> Result<Value, ApiError> {
        self.authenticate(self.config.api_endpoint("/login"), credentials, LOGIN_FAILED)
            .await
    }

    /// `POST /logout`, then clear the local session whatever happened.
    pub async fn logout(&self) {
        let _clear = ClearOnDrop(&self.store);
        let Some(token) = self.store.token() else {
            debug!("logout without stored token");
            return;
        };
        match self
            .http
            .post(self.config.api_endpoint("/logout"))
            .bearer_auth(&token)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => debug!("logout acknowledged"),
            Ok(resp) => warn!(status = resp.status().as_u16(), "logout rejected by backend"),
            Err(e) => warn!(error = %e, "logout request failed"),
        }
    }

    /// `POST /heartbeat`. Best-effort; never fails.
    pub async fn heartbeat(&self) {
        let Some(token) = self.store.token() else {
            debug!("heartbeat skipped: no session");
            return;
        };
        match self
            .http
            .post(self.config.api_endpoint("/heartbeat"))
            .bearer_auth(&token)
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => warn!(status = resp.status().as_u16(), "heartbeat rejected"),
            Err(e) => warn!(error = %e, "heartbeat failed"),
        }
    }

    /// Where to send the user to start Google sign-in.
    #[must_use]
    pub fn oauth_redirect_url(&self) -> String {
        self.config.host_endpoint("/auth/google")
    }

    /// Pre-fill data for the OAuth registration form. Failures yield `None`.
    pub async fn fetch_oauth_registration_data(&self, temp_token: &str) -> Option<OAuthRegistrationData> {
        let result = async {
            let response = self
                .http
                .get(self.config.host_endpoint("/auth/google/registration-data"))
                .query(&[("token", temp_token)])
                .send()
                .await?;
            let body = http::json_body(response, "registration data unavailable").await?;
            Ok::<_, ApiError>(serde_json::from_value::<OAuthRegistrationData>(body)?)
        }
        .await;

        match result {
            Ok(data) => Some(data),
            Err(e) => {
                warn!(error = %e, "oauth registration data unavailable");
                None
            }
        }
    }

    /// Exchange the OAuth temp token plus role/organization for a session.
    ///
    /// # Errors
    ///
    /// Normalized backend error, transport failure, or storage failure.
    pub async fn complete_oauth_registration(&self, fields: &OAuthCompletion) -> Result<Value, ApiError> {
        self.authenticate(
            self.config.host_endpoint("/auth/google/complete-registration"),
            fields,
            OAUTH_COMPLETE_FAILED,
        )
        .await
    }

    /// Adopt a bearer token delivered on the OAuth callback URL.
    ///
    /// The token is stored before the profile fetch, so a failed fetch leaves
    /// a token without a user (which reads as unauthenticated).
    ///
    /// # Errors
    ///
    /// `MissingToken` for an empty token (no request is made),
    /// `ProfileUnavailable` if `/user` fails or returns no profile.
    pub async fn exchange_url_token(&self, token: &str) -> Result<User, ApiError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::MissingToken);
        }
        self.store.set_token(token)?;

        let response = self
            .http
            .get(self.config.api_endpoint("/user"))
            .bearer_auth(token)
            .send()
            .await?;
        if !response.status().is_success() {
            warn!(status = response.status().as_u16(), "profile fetch for url token failed");
            return Err(ApiError::ProfileUnavailable);
        }
        let body = response
            .json::<Value>()
            .await
            .map_err(|_| ApiError::ProfileUnavailable)?;
        let user = profile_from_body(body).ok_or(ApiError::ProfileUnavailable)?;

        self.store.set_user(&user)?;
        info!(user_id = user.id, role = %user.role, "session established from url token");
        Ok(user)
    }

    /// Re-fetch `/user` and replace the cached profile.
    ///
    /// A 401 is returned as-is; the stored session is not cleared.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` without a token, otherwise normalized backend or
    /// transport errors.
    pub async fn fetch_current_user(&self) -> Result<User, ApiError> {
        let token = self.store.token().ok_or(ApiError::NotAuthenticated)?;
        let response = self
            .http
            .get(self.config.api_endpoint("/user"))
            .bearer_auth(&token)
            .send()
            .await?;
        let body = http::json_body(response, PROFILE_FAILED).await?;
        let user = profile_from_body(body).ok_or(ApiError::ProfileUnavailable)?;
        self.store.set_user(&user)?;
        Ok(user)
    }

    async fn authenticate(&self, url: String, body: &impl Serialize, default_message: &str) -> Result<Value, ApiError> {
        debug!(%url, "auth request");
        let response = self.http.post(&url).json(body).send().await?;
        let body = http::json_body(response, default_message).await?;

        let auth: AuthResponse = serde_json::from_value(body.clone())?;
        self.store.set(&Session { token: auth.token, user: auth.user })?;
        Ok(body)
    }
}

/// Accepts `{ "user": {...} }` or a bare user object. Null means no profile.
fn profile_from_body(body: Value) -> Option<User> {
    let profile = match body {
        Value::Object(mut map) if map.contains_key("user") => map.remove("user")?,
        other => other,
    };
    if profile.is_null() {
        return None;
    }
    serde_json::from_value(profile).ok()
}

/// Clears the session when dropped, so logout cleanup also runs if the
/// logout future is cancelled.
struct ClearOnDrop<'a, S: Storage>(&'a SessionStore<S>);

impl<S: Storage> Drop for ClearOnDrop<'_, S> {
    fn drop(&mut self) {
        self.0.clear();
    }
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
