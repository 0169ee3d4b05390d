//! Console routes and navigation history

use std::fmt;

/// Entry points of the console
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/",
            Route::Dashboard => "/admin-dashboard",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation history with push and replace semantics
#[derive(Debug, Clone)]
pub struct Navigator {
    entries: Vec<Route>,
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        Self {
            entries: vec![start],
        }
    }

    pub fn current(&self) -> Route {
        // never empty: created with one entry, replace keeps the length
        self.entries.last().copied().unwrap_or(Route::Login)
    }

    pub fn push(&mut self, route: Route) {
        tracing::debug!("Navigate to {}", route);
        self.entries.push(route);
    }

    /// Swap the current entry so back-navigation cannot return to it
    pub fn replace(&mut self, route: Route) {
        tracing::debug!("Replace {} with {}", self.current(), route);
        if let Some(last) = self.entries.last_mut() {
            *last = route;
        }
    }

    pub fn history(&self) -> &[Route] {
        &self.entries
    }
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Login)
    }
}
