//! Session management
//!
//! A [`SessionManager`] is created once per process and handed to every view
//! that needs it. Views observe changes through [`SessionManager::subscribe`].

use crate::auth::jwt::decode_token;
use crate::auth::models::User;
use crate::auth::store::TokenStore;
use crate::error::Result;
use std::sync::Arc;
use tokio::sync::watch;

/// The client's belief about who is logged in
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    /// Decoded user, if any
    pub user: Option<User>,
    /// True until the startup token check has finished
    pub loading: bool,
}

impl Session {
    fn starting() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }
}

/// Holds the current session and publishes every change
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    state: Arc<watch::Sender<Session>>,
}

impl SessionManager {
    /// Create a session manager in the loading state
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            store,
            state: Arc::new(watch::Sender::new(Session::starting())),
        }
    }

    /// Create a session manager and run the startup check
    pub fn restore(store: Arc<dyn TokenStore>) -> Self {
        let manager = Self::new(store);
        manager.initialize();
        manager
    }

    /// Reconstruct the user from a stored token.
    ///
    /// Loading turns false exactly once; later calls do nothing.
    pub fn initialize(&self) {
        if !self.state.borrow().loading {
            tracing::debug!("Session already initialized");
            return;
        }

        let user = match self.store.get() {
            Ok(Some(token)) => match decode_token(&token) {
                Ok(user) => Some(user),
                Err(e) => {
                    tracing::warn!("Discarding malformed stored token: {}", e);
                    if let Err(e) = self.store.remove() {
                        tracing::error!("Failed to remove malformed token: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                tracing::warn!("Failed to read token store: {}", e);
                None
            }
        };

        let applied = self.state.send_if_modified(|session| {
            if !session.loading {
                return false;
            }
            session.user = user;
            session.loading = false;
            true
        });

        if applied {
            tracing::debug!(
                "Session initialized (authenticated: {})",
                self.current().user.is_some()
            );
        }
    }

    /// Set the current user. Token persistence is the caller's job.
    ///
    /// A login settles the session, so a later `initialize` is a no-op.
    pub fn login(&self, user: User) {
        tracing::info!(
            "Logged in as {}",
            user.username.as_deref().unwrap_or("<unknown>")
        );
        self.state.send_modify(|session| {
            session.user = Some(user);
            session.loading = false;
        });
    }

    /// Clear the current user and remove the stored token
    pub fn logout(&self) -> Result<()> {
        self.state.send_modify(|session| session.user = None);
        self.store.remove()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Snapshot of the current session
    pub fn current(&self) -> Session {
        self.state.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.state.borrow().user.clone()
    }

    /// Receive every subsequent session change
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.state.subscribe()
    }

    /// Wait until the startup check has finished
    pub async fn settled(&self) -> Session {
        let mut rx = self.subscribe();
        let session = match rx.wait_for(|session| !session.loading).await {
            Ok(session) => session.clone(),
            Err(_) => self.current(),
        };
        session
    }

    pub fn store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.store)
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            state: Arc::clone(&self.state),
        }
    }
}
