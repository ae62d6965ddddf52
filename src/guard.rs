//! Route guard.
//!
//! SYSTEM CONTEXT
//! ==============
//! Evaluated synchronously on every navigation against whatever the session
//! store holds at that moment. There is no loading state and no backend
//! round trip: a stored session is trusted until logout clears it.
//!
//! A navigation carrying the one-time OAuth `token` parameter always renders
//! the guarded view, which is then responsible for exchanging the token.

use reqwest::Url;

use crate::session::SessionStore;
use crate::storage::Storage;
use crate::types::{Role, Session};

/// Query parameter carrying the OAuth bridge token.
pub const OAUTH_TOKEN_PARAM: &str = "token";

/// Outcome of a guard check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Redirect(&'static str),
}

/// Pure authorization rule.
#[must_use]
pub fn authorize(session: Option<&Session>, required: Option<Role>, has_bypass_token: bool) -> Decision {
    if has_bypass_token {
        return Decision::Allow;
    }
    let Some(session) = session else {
        return Decision::Redirect(Route::Entry.path());
    };
    match required {
        Some(role) if role != session.user.role => Decision::Redirect(session.user.role.home_path()),
        _ => Decision::Allow,
    }
}

/// True iff the URL carries a non-empty OAuth bridge token.
#[must_use]
pub fn has_bypass_token(url: &Url) -> bool {
    url.query_pairs()
        .any(|(key, value)| key == OAUTH_TOKEN_PARAM && !value.is_empty())
}

/// Parse an absolute URL or an app-relative path such as `/dashboard/jefe?token=x`.
#[must_use]
pub fn parse_navigation(target: &str) -> Option<Url> {
    match Url::parse(target) {
        Ok(url) => Some(url),
        Err(_) => Url::parse("http://app.invalid").ok()?.join(target).ok(),
    }
}

/// Application routes and the role each requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    /// Login screen.
    Entry,
    Register,
    /// Form binding a Google identity to a role and organization.
    OAuthRegistration,
    /// Landing page for the OAuth redirect; signed-in users of any role.
    OAuthCallback,
    AdminOrganizations,
    JefeDashboard,
    TrabajadorDashboard,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Entry,
        Route::Register,
        Route::OAuthRegistration,
        Route::OAuthCallback,
        Route::AdminOrganizations,
        Route::JefeDashboard,
        Route::TrabajadorDashboard,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Entry => "/",
            Self::Register => "/registro",
            Self::OAuthRegistration => "/auth/google/completar-registro",
            Self::OAuthCallback => "/auth/callback",
            Self::AdminOrganizations => Role::Admin.home_path(),
            Self::JefeDashboard => Role::Jefe.home_path(),
            Self::TrabajadorDashboard => Role::Trabajador.home_path(),
        }
    }

    /// Whether the route sits behind the guard at all.
    #[must_use]
    pub fn is_protected(self) -> bool {
        !matches!(self, Self::Entry | Self::Register | Self::OAuthRegistration)
    }

    #[must_use]
    pub fn required_role(self) -> Option<Role> {
        match self {
            Self::AdminOrganizations => Some(Role::Admin),
            Self::JefeDashboard => Some(Role::Jefe),
            Self::TrabajadorDashboard => Some(Role::Trabajador),
            _ => None,
        }
    }

    /// Most specific route for `path`. Nested paths such as
    /// `/dashboard/jefe/vehiculos` belong to their dashboard.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Route> {
        let path = match path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        Self::ALL
            .into_iter()
            .filter(|route| {
                let prefix = route.path();
                path == prefix || (prefix != "/" && path.starts_with(prefix) && path[prefix.len()..].starts_with('/'))
            })
            .max_by_key(|route| route.path().len())
    }
}

/// Guard bound to a session store.
#[derive(Clone, Debug)]
pub struct RouteGuard<S> {
    store: SessionStore<S>,
}

impl<S: Storage> RouteGuard<S> {
    pub fn new(store: SessionStore<S>) -> Self {
        Self { store }
    }

    /// Check a navigation to a view that requires `required`.
    pub fn check(&self, url: &Url, required: Option<Role>) -> Decision {
        authorize(self.store.get().as_ref(), required, has_bypass_token(url))
    }

    /// Resolve `target` against the route table and check it. Unknown or
    /// unparseable targets go to the entry screen.
    pub fn navigate(&self, target: &str) -> Decision {
        let Some(url) = parse_navigation(target) else {
            return Decision::Redirect(Route::Entry.path());
        };
        match Route::from_path(url.path()) {
            Some(route) if route.is_protected() => self.check(&url, route.required_role()),
            Some(_) => Decision::Allow,
            None => Decision::Redirect(Route::Entry.path()),
        }
    }
}

#[cfg(test)]
#[path = "guard_test.rs"]
mod tests;
