//! Login flow

use std::sync::Arc;

use crate::auth::{decode_token, Credentials, SessionManager, TokenStore, User};
use crate::error::{Error, Result};
use crate::gateway::BackendGateway;
use crate::lifecycle::{Completion, Scope};
use crate::navigation::{Navigator, Route};

pub const VALIDATION_MESSAGE: &str = "Please enter both username and password";

/// Values entered on the login form
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    /// Captured but does not change how long the token is kept
    pub remember_me: bool,
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            remember_me: false,
        }
    }

    /// Both fields must be non-empty
    pub fn validate(&self) -> Result<Credentials> {
        if self.username.is_empty() || self.password.is_empty() {
            return Err(Error::Validation(VALIDATION_MESSAGE.to_string()));
        }

        Ok(Credentials {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }
}

/// State and behaviour of the login screen
pub struct LoginView {
    gateway: BackendGateway,
    session: SessionManager,
    store: Arc<dyn TokenStore>,
    scope: Scope,
    error: Option<String>,
    is_loading: bool,
}

impl LoginView {
    pub fn new(gateway: BackendGateway, session: SessionManager) -> Self {
        let store = session.store();
        Self {
            gateway,
            session,
            store,
            scope: Scope::new(),
            error: None,
            is_loading: false,
        }
    }

    /// Message to show above the form, if any
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Handle to this view's lifecycle; ending it discards in-flight logins
    pub fn scope(&self) -> Scope {
        self.scope.clone()
    }

    /// Submit the form.
    ///
    /// On success the token is stored, the session updated and the navigator
    /// moved to the dashboard.
    pub async fn submit(
        &mut self,
        form: &LoginForm,
        navigator: &mut Navigator,
    ) -> Completion<Result<User>> {
        self.error = None;

        let credentials = match form.validate() {
            Ok(credentials) => credentials,
            Err(e) => {
                self.error = Some(e.user_message());
                return Completion::Applied(Err(e));
            }
        };

        if form.remember_me {
            tracing::debug!("Remember me requested; token persistence is unchanged");
        }

        self.is_loading = true;
        let gateway = self.gateway.clone();
        let outcome = self
            .scope
            .run(async move { gateway.authenticate(&credentials).await })
            .await;
        self.is_loading = false;

        let result = match outcome {
            Completion::Applied(result) => result.and_then(|token| self.establish(&token)),
            Completion::Discarded => return Completion::Discarded,
        };

        match &result {
            Ok(_) => navigator.push(Route::Dashboard),
            Err(e) => {
                tracing::warn!("Login failed: {}", e);
                self.error = Some(e.user_message());
            }
        }

        Completion::Applied(result)
    }

    fn establish(&self, token: &str) -> Result<User> {
        let user = decode_token(token)?;
        self.store.set(token)?;
        self.session.login(user.clone());
        Ok(user)
    }
}
