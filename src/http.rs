//! Shared reqwest plumbing for the auth gateway and resource clients.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Build the HTTP client. The cookie store lets the backend's cookie session
/// ride along with bearer tokens on the OAuth routes.
pub(crate) fn build_client(config: &ClientConfig) -> Result<reqwest::Client, ApiError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeouts.request_secs))
        .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
        .cookie_store(true)
        .build()
        .map_err(|e| ApiError::Transport(e.to_string()))
}

/// Read a response as JSON, normalizing non-success statuses into `ApiError`.
/// An empty success body reads as `Value::Null`.
pub(crate) async fn json_body(response: reqwest::Response, default_message: &str) -> Result<Value, ApiError> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        return Err(ApiError::from_response_body(status.as_u16(), &text, default_message));
    }
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(&text)?)
}
