//! Route guard for protected views

use crate::auth::{Session, SessionManager, User};
use crate::navigation::{Navigator, Route};

/// Where the guard stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    Loading,
    Authorized,
    Unauthorized,
}

/// What the guarded view should do
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    /// Session still loading; render nothing protected
    Wait,
    /// Render the protected content for this user
    Render(User),
    /// Leave for the login route, replacing the history entry
    Redirect(Route),
}

/// Classify a session snapshot
pub fn classify(session: &Session) -> GuardState {
    if session.loading {
        GuardState::Loading
    } else if session.user.is_some() {
        GuardState::Authorized
    } else {
        GuardState::Unauthorized
    }
}

/// Decides whether a protected route may render
pub struct RouteGuard {
    session: SessionManager,
    state: GuardState,
}

impl RouteGuard {
    pub fn new(session: SessionManager) -> Self {
        Self {
            session,
            state: GuardState::Loading,
        }
    }

    pub fn state(&self) -> GuardState {
        self.state
    }

    /// Evaluate against the current session without waiting.
    ///
    /// Once settled the guard never returns to `Loading`.
    pub fn evaluate(&mut self) -> GuardDecision {
        let session = self.session.current();
        self.decide(session)
    }

    /// Wait for the session to settle, then decide
    pub async fn resolve(&mut self) -> GuardDecision {
        let session = self.session.settled().await;
        self.decide(session)
    }

    /// Resolve and apply a redirect to the navigator
    pub async fn enter(&mut self, navigator: &mut Navigator) -> GuardDecision {
        let decision = self.resolve().await;
        if let GuardDecision::Redirect(route) = &decision {
            navigator.replace(*route);
        }
        decision
    }

    fn decide(&mut self, session: Session) -> GuardDecision {
        let next = classify(&session);
        if next == GuardState::Loading && self.state != GuardState::Loading {
            tracing::warn!("Session reported loading after guard settled; keeping {:?}", self.state);
        } else {
            self.state = next;
        }

        match (self.state, session.user) {
            (GuardState::Loading, _) => GuardDecision::Wait,
            (GuardState::Authorized, Some(user)) => GuardDecision::Render(user),
            _ => {
                tracing::debug!("Not authenticated, redirecting to {}", Route::Login);
                GuardDecision::Redirect(Route::Login)
            }
        }
    }
}
