//! Wire DTOs shared by the session store, auth gateway and route guard.
//!
//! DESIGN
//! ======
//! `User` models only the fields it must interpret and keeps everything else
//! in `extra`, untouched, so a cached profile serializes back to the object
//! the backend sent. The organization reference is one of those fields: the
//! backend spells it either `organization_id` or `organizacion_id`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Account role. Decides which dashboard a user lands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    /// Manager: oversees workers, vehicles, machinery and tasks.
    Jefe,
    /// Worker: consumes assigned tasks and updates asset data.
    Trabajador,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Admin, Role::Jefe, Role::Trabajador];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Jefe => "jefe",
            Self::Trabajador => "trabajador",
        }
    }

    /// Landing path for this role.
    #[must_use]
    pub fn home_path(self) -> &'static str {
        match self {
            Self::Admin => "/admin/organizaciones",
            Self::Jefe => "/dashboard/jefe",
            Self::Trabajador => "/dashboard/trabajador",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "jefe" => Ok(Self::Jefe),
            "trabajador" => Ok(Self::Trabajador),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Cached identity of the signed-in account. Owned by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Every other backend field, including the organization reference.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl User {
    /// Organization the account belongs to, under either backend spelling.
    #[must_use]
    pub fn organization_id(&self) -> Option<i64> {
        ["organization_id", "organizacion_id"]
            .into_iter()
            .find_map(|key| self.extra.get(key).and_then(Value::as_i64))
    }
}

/// Bearer token plus cached user. Either fully present or absent.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Successful body of `/login`, `/register` and OAuth completion.
#[derive(Debug, Deserialize)]
pub(crate) struct AuthResponse {
    pub token: String,
    pub user: User,
}

#[derive(Clone, Debug, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirmation: String,
    pub role: Role,
    /// Name of a new organization (jefe sign-up).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    /// Existing organization to join (trabajador sign-up).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
}

/// Fields sent when binding a Google identity to a role and organization.
#[derive(Clone, Debug, Serialize)]
pub struct OAuthCompletion {
    /// One-time temp token from the OAuth redirect URL.
    #[serde(rename = "token")]
    pub temp_token: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<i64>,
}

/// Pre-fill data for the OAuth registration form.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct OAuthRegistrationData {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
#[path = "types_test.rs"]
mod tests;
