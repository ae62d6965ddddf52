//! Client error type and backend error-body normalization.
//!
//! ERROR HANDLING
//! ==============
//! The backend reports failures in three shapes: a field-keyed `errors` map,
//! a top-level `message`, or nothing useful at all. They collapse into one
//! enum here so callers render a single message and never inspect JSON.

use serde_json::Value;

/// Field-keyed messages in the order the backend reported them.
pub type FieldErrors = Vec<(String, Vec<String>)>;

/// Errors produced by auth and resource operations.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Per-field validation messages reported by the backend.
    #[error("{}", join_field_messages(.0))]
    Validation(FieldErrors),

    /// A single backend-reported message, or a generic default.
    #[error("{message}")]
    Message { status: u16, message: String },

    /// Network, TLS or body-decoding failure.
    #[error("request failed: {0}")]
    Transport(String),

    /// A URL token exchange was attempted with an empty token.
    #[error("token not provided")]
    MissingToken,

    /// `/user` answered with a failure status or an empty profile.
    #[error("could not load the user profile")]
    ProfileUnavailable,

    /// The operation needs a stored token and none is present.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The session could not be written to storage.
    #[error("session storage failed: {0}")]
    Storage(String),
}

impl ApiError {
    /// HTTP status for backend-reported message errors.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Message { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Normalize a non-success response body into an error.
    ///
    /// Preference order: non-empty `errors` map, then `message`, then
    /// `default_message`.
    #[must_use]
    pub fn from_response_body(status: u16, body: &str, default_message: &str) -> Self {
        let parsed = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);

        if let Some(errors) = parsed.get("errors").and_then(Value::as_object) {
            let fields: FieldErrors = errors
                .iter()
                .map(|(field, messages)| (field.clone(), field_messages(messages)))
                .filter(|(_, messages)| !messages.is_empty())
                .collect();
            if !fields.is_empty() {
                return Self::Validation(fields);
            }
        }

        let message = parsed
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(default_message);
        Self::Message { status, message: message.to_owned() }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(error: serde_json::Error) -> Self {
        Self::Transport(error.to_string())
    }
}

impl From<std::io::Error> for ApiError {
    fn from(error: std::io::Error) -> Self {
        Self::Storage(error.to_string())
    }
}

fn field_messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(message) => vec![message.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(ToOwned::to_owned)
            .collect(),
        _ => Vec::new(),
    }
}

fn join_field_messages(fields: &FieldErrors) -> String {
    fields
        .iter()
        .flat_map(|(_, messages)| messages)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
