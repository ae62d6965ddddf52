//! Client library for the AutoNet fleet and workforce API.
//!
//! ARCHITECTURE
//! ============
//! Leaves first: `storage` persists two flat keys, `session` reads and writes
//! a `Session` through it, `auth` talks to the backend and keeps the session
//! current, and `guard` decides whether a navigation may proceed. Resource
//! clients, list state and polling sit beside the auth stack and only borrow
//! the stored token.

pub mod auth;
pub mod config;
pub mod error;
pub mod guard;
mod http;
pub mod plate;
pub mod poll;
pub mod resources;
pub mod session;
pub mod storage;
pub mod types;

#[cfg(test)]
mod mock;

pub use auth::AuthGateway;
pub use config::ClientConfig;
pub use error::{ApiError, FieldErrors};
pub use guard::{Decision, Route, RouteGuard, authorize};
pub use session::SessionStore;
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use types::{Role, Session, User};
