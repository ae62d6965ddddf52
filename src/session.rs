//! Session store over two flat storage keys.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by the route guard on every navigation and written by the auth
//! gateway. A session is either fully present or absent: a token without a
//! parseable user reads as "not authenticated" and is left as-is.

use tracing::{info, warn};

use crate::error::ApiError;
use crate::storage::Storage;
use crate::types::{Session, User};

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Clone, Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Current session, or `None` if either key is missing or unreadable.
    pub fn get(&self) -> Option<Session> {
        let token = self.token()?;
        let user = self.current_user()?;
        Some(Session { token, user })
    }

    /// Persist a session. Token first, then the serialized user.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Storage` if either key cannot be written.
    pub fn set(&self, session: &Session) -> Result<(), ApiError> {
        self.set_token(&session.token)?;
        self.set_user(&session.user)?;
        info!(user_id = session.user.id, role = %session.user.role, "session stored");
        Ok(())
    }

    pub(crate) fn set_token(&self, token: &str) -> Result<(), ApiError> {
        self.storage.set_item(TOKEN_KEY, token)?;
        Ok(())
    }

    pub(crate) fn set_user(&self, user: &User) -> Result<(), ApiError> {
        let raw = serde_json::to_string(user).map_err(|e| ApiError::Storage(e.to_string()))?;
        self.storage.set_item(USER_KEY, &raw)?;
        Ok(())
    }

    /// Remove both keys. Failures are logged, never returned.
    pub fn clear(&self) {
        for key in [TOKEN_KEY, USER_KEY] {
            if let Err(e) = self.storage.remove_item(key) {
                warn!(key, error = %e, "failed to remove session key");
            }
        }
        info!("session cleared");
    }

    /// Stored bearer token, if any. Empty strings count as missing.
    pub fn token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read session token");
                None
            }
        }
    }

    /// Cached user, or `None` if missing or unparseable.
    pub fn current_user(&self) -> Option<User> {
        let raw = match self.storage.get_item(USER_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(error = %e, "failed to read cached user");
                return None;
            }
        };
        match serde_json::from_str::<User>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(error = %e, "cached user is not valid JSON");
                None
            }
        }
    }

    /// True iff both a token and a parseable user are stored.
    pub fn is_authenticated(&self) -> bool {
        self.get().is_some()
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
