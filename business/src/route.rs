//! Route state for page navigation.
//!
//! This module defines the route enum that determines which page to display, and the guard
//! that keeps private pages behind a live session.

use serde::{Deserialize, Serialize};

use crate::session::SessionStore;

/// Represents the current page/route of the console.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    /// Login page - shown when user is not authenticated
    #[default]
    Login,
    Register,
    /// Email confirmation link target
    Confirm,
    /// User management - requires a session
    Users,
}

impl Route {
    pub fn is_private(self) -> bool {
        matches!(self, Self::Users)
    }

    pub fn path(self) -> &'static str {
        match self {
            Self::Login => "/login",
            Self::Register => "/register",
            Self::Confirm => "/confirm",
            Self::Users => "/users",
        }
    }

    /// Map a path to its route. Unknown paths have none.
    pub fn from_path(path: &str) -> Option<Self> {
        match path.trim_end_matches('/') {
            "/login" => Some(Self::Login),
            "/register" => Some(Self::Register),
            "/confirm" => Some(Self::Confirm),
            "" | "/users" => Some(Self::Users),
            _ => None,
        }
    }
}

/// Where a request for `requested` actually lands.
///
/// Private routes need a session; the login page is skipped when one already exists.
/// `None` stands for an unknown path and lands on whichever entry point fits the session.
pub fn resolve(requested: Option<Route>, session: &SessionStore) -> Route {
    let logged_in = session.is_logged_in();
    match requested {
        Some(route) if route.is_private() && !logged_in => Route::Login,
        Some(Route::Login) if logged_in => Route::Users,
        Some(route) => route,
        None if logged_in => Route::Users,
        None => Route::Login,
    }
}
