//! Resource clients for fleet data.
//!
//! ARCHITECTURE
//! ============
//! Every collection follows the same REST shape, so one generic client
//! serves all of them; the `Resource` impl supplies the collection path and
//! the fields client-side search looks at. Requests borrow the bearer token
//! from the session store at call time.

mod list;
mod models;

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::auth::AuthGateway;
use crate::config::ClientConfig;
use crate::error::{ApiError, FieldErrors};
use crate::http;
use crate::session::SessionStore;
use crate::storage::Storage;

pub use list::{ResourceList, matches_query};
pub use models::{Machine, Notification, Task, Vehicle, WorkerLocation};

/// A REST collection the client can list, read and mutate.
pub trait Resource: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection path under the API base, e.g. `/vehiculos`.
    const PATH: &'static str;
    /// Human label used in log lines and error defaults.
    const LABEL: &'static str;

    fn id(&self) -> i64;

    /// Text fields matched by client-side search.
    fn search_fields(&self) -> Vec<&str>;

    /// Client-side checks run before create and update. Returns field-keyed
    /// messages; empty means the payload may be sent.
    fn validate(fields: &Value) -> FieldErrors {
        let _ = fields;
        FieldErrors::new()
    }
}

/// CRUD client for one resource type.
pub struct ResourceClient<T, S> {
    http: reqwest::Client,
    config: ClientConfig,
    store: SessionStore<S>,
    _resource: PhantomData<fn() -> T>,
}

impl<T, S: Clone> Clone for ResourceClient<T, S> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            config: self.config.clone(),
            store: self.store.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: Resource, S: Storage> ResourceClient<T, S> {
    /// # Errors
    ///
    /// Returns `ApiError::Transport` if the HTTP client cannot be built.
    pub fn new(config: ClientConfig, store: SessionStore<S>) -> Result<Self, ApiError> {
        let http = http::build_client(&config)?;
        Ok(Self { http, config, store, _resource: PhantomData })
    }

    /// Share the gateway's HTTP client, config and session store.
    pub fn from_gateway(gateway: &AuthGateway<S>) -> Self
    where
        S: Clone,
    {
        Self {
            http: gateway.http().clone(),
            config: gateway.config().clone(),
            store: gateway.store().clone(),
            _resource: PhantomData,
        }
    }

    fn collection_url(&self) -> String {
        self.config.api_endpoint(T::PATH)
    }

    fn item_url(&self, id: i64) -> String {
        format!("{}/{id}", self.collection_url())
    }

    /// `GET {PATH}`. Accepts a bare array or `{ "data": [...] }`.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated`, normalized backend errors, or transport failures.
    pub async fn list(&self) -> Result<Vec<T>, ApiError> {
        let body = self
            .send(reqwest::Method::GET, self.collection_url(), None)
            .await?;
        Ok(serde_json::from_value(unwrap_data(body))?)
    }

    /// `GET {PATH}/{id}`.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated`, normalized backend errors, or transport failures.
    pub async fn get(&self, id: i64) -> Result<T, ApiError> {
        let body = self
            .send(reqwest::Method::GET, self.item_url(id), None)
            .await?;
        Ok(serde_json::from_value(unwrap_data(body))?)
    }

    /// `POST {PATH}` with the given fields; returns the created record.
    ///
    /// # Errors
    ///
    /// `Validation` from client-side checks (no request is made),
    /// `NotAuthenticated`, normalized backend errors, or transport failures.
    pub async fn create(&self, fields: &Value) -> Result<T, ApiError> {
        check_fields::<T>(fields)?;
        let body = self
            .send(reqwest::Method::POST, self.collection_url(), Some(fields))
            .await?;
        Ok(serde_json::from_value(unwrap_data(body))?)
    }

    /// `PUT {PATH}/{id}` with the given fields; returns the updated record.
    ///
    /// # Errors
    ///
    /// `Validation` from client-side checks (no request is made),
    /// `NotAuthenticated`, normalized backend errors, or transport failures.
    pub async fn update(&self, id: i64, fields: &Value) -> Result<T, ApiError> {
        check_fields::<T>(fields)?;
        let body = self
            .send(reqwest::Method::PUT, self.item_url(id), Some(fields))
            .await?;
        Ok(serde_json::from_value(unwrap_data(body))?)
    }

    /// `DELETE {PATH}/{id}`.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated`, normalized backend errors, or transport failures.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.send(reqwest::Method::DELETE, self.item_url(id), None)
            .await?;
        Ok(())
    }

    async fn send(&self, method: reqwest::Method, url: String, body: Option<&Value>) -> Result<Value, ApiError> {
        let token = self.store.token().ok_or(ApiError::NotAuthenticated)?;
        debug!(resource = T::LABEL, %method, %url, "resource request");

        let request = self.http.request(method, &url).bearer_auth(token);
        let request = match body {
            Some(json) => request.json(json),
            None => request,
        };
        let response = request.send().await?;
        http::json_body(response, &format!("{} request failed", T::LABEL)).await
    }
}

fn check_fields<T: Resource>(fields: &Value) -> Result<(), ApiError> {
    let problems = T::validate(fields);
    if problems.is_empty() { Ok(()) } else { Err(ApiError::Validation(problems)) }
}

/// Unwrap a `{ "data": ... }` envelope if present.
fn unwrap_data(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
