//! Driver verification dashboard
//!
//! The view keeps the last fetched driver list, the tab/search/selection
//! state, and drives approval and document verification. Network work runs
//! inside the view's [`Scope`]; once the view is unmounted late results are
//! discarded.

mod filter;

pub use filter::{filter_drivers, matches_query, Tab};

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::auth::{SessionManager, User};
use crate::driver::{Driver, DriverId};
use crate::error::{Error, Result};
use crate::gateway::BackendGateway;
use crate::lifecycle::{Completion, Scope};
use crate::verification::{VerificationProvider, VerificationResult};

/// Notification raised when a driver is rejected
pub const REJECTED_NOTICE: &str = "Driver rejected";

/// When to re-fetch the driver list after an approval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshPolicy {
    /// Re-fetch whether or not the mutation succeeded
    Always,
    /// Re-fetch only after a confirmed mutation
    OnSuccess,
}

impl RefreshPolicy {
    pub fn from_config(refresh_on_failure: bool) -> Self {
        if refresh_on_failure {
            RefreshPolicy::Always
        } else {
            RefreshPolicy::OnSuccess
        }
    }
}

/// Local state of the dashboard
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    pub drivers: Vec<Driver>,
    pub tab: Tab,
    pub query: String,
    pub selected: Option<Driver>,
    pub verification: Option<VerificationResult>,
    pub processing: bool,
}

impl DashboardState {
    pub fn visible(&self) -> Vec<&Driver> {
        filter_drivers(&self.drivers, self.tab, &self.query)
    }
}

/// What happened during an approval
#[derive(Debug, Clone, PartialEq)]
pub struct ApprovalOutcome {
    pub driver_id: DriverId,
    /// Response body of a successful verification mutation
    pub response: Option<Value>,
    /// Set when the mutation failed
    pub error: Option<String>,
    /// Whether the driver list was replaced afterwards
    pub refreshed: bool,
}

impl ApprovalOutcome {
    pub fn verified(&self) -> bool {
        self.error.is_none()
    }
}

/// Avatar initial and display name shown in the header
#[derive(Debug, Clone, PartialEq)]
pub struct UserBadge {
    pub initial: char,
    pub name: String,
}

impl From<&User> for UserBadge {
    fn from(user: &User) -> Self {
        Self {
            initial: user.initial(),
            name: user.display_name().to_string(),
        }
    }
}

pub struct DashboardView {
    gateway: BackendGateway,
    session: SessionManager,
    provider: Arc<dyn VerificationProvider>,
    policy: RefreshPolicy,
    scope: Scope,
    state: RwLock<DashboardState>,
}

impl DashboardView {
    pub fn new(
        gateway: BackendGateway,
        session: SessionManager,
        provider: Arc<dyn VerificationProvider>,
        policy: RefreshPolicy,
    ) -> Self {
        Self {
            gateway,
            session,
            provider,
            policy,
            scope: Scope::new(),
            state: RwLock::new(DashboardState::default()),
        }
    }

    /// Fetch the driver list once and replace the local list.
    ///
    /// A failed fetch is logged and leaves the previous list in place.
    pub async fn mount(&self) -> Completion<Result<usize>> {
        let gateway = self.gateway.clone();
        let fetched = self
            .scope
            .run(async move { gateway.fetch_drivers().await })
            .await;

        let Completion::Applied(result) = fetched else {
            return Completion::Discarded;
        };

        Completion::Applied(match result {
            Ok(drivers) => {
                let count = drivers.len();
                self.state.write().await.drivers = drivers;
                Ok(count)
            }
            Err(e) => {
                tracing::error!("Failed to load drivers: {}", e);
                Err(e)
            }
        })
    }

    /// Tear the view down; in-flight results will be discarded
    pub fn unmount(&self) {
        self.scope.end();
    }

    pub fn scope(&self) -> Scope {
        self.scope.clone()
    }

    /// Results dropped because the view was unmounted
    pub fn discarded(&self) -> usize {
        self.scope.discarded()
    }

    pub async fn snapshot(&self) -> DashboardState {
        self.state.read().await.clone()
    }

    pub async fn set_tab(&self, tab: Tab) {
        self.state.write().await.tab = tab;
    }

    pub async fn set_query(&self, query: impl Into<String>) {
        self.state.write().await.query = query.into();
    }

    /// Drivers matching the current tab and query
    pub async fn filtered(&self) -> Vec<Driver> {
        let state = self.state.read().await;
        state.visible().into_iter().cloned().collect()
    }

    /// Select a driver from the loaded list
    pub async fn select(&self, driver_id: &DriverId) -> Result<Driver> {
        let mut state = self.state.write().await;
        let driver = state
            .drivers
            .iter()
            .find(|driver| &driver.id == driver_id)
            .cloned()
            .ok_or_else(|| Error::DriverNotFound(driver_id.to_string()))?;

        state.selected = Some(driver.clone());
        state.verification = None;
        Ok(driver)
    }

    pub async fn selected(&self) -> Option<Driver> {
        self.state.read().await.selected.clone()
    }

    /// Run the verification provider against the selected driver
    pub async fn run_verification(&self) -> Completion<Result<VerificationResult>> {
        let driver = {
            let mut state = self.state.write().await;
            let Some(driver) = state.selected.clone() else {
                return Completion::Applied(Err(Error::NoSelection));
            };
            state.processing = true;
            driver
        };

        let provider = Arc::clone(&self.provider);
        let verified = self
            .scope
            .run(async move { provider.verify(&driver).await })
            .await;

        let Completion::Applied(result) = verified else {
            return Completion::Discarded;
        };

        let mut state = self.state.write().await;
        state.processing = false;
        match &result {
            Ok(verification) => state.verification = Some(verification.clone()),
            Err(e) => tracing::error!("Verification failed: {}", e),
        }
        Completion::Applied(result)
    }

    /// Approve the selected driver and reload the list.
    ///
    /// With [`RefreshPolicy::Always`] the list is re-fetched and the selection
    /// cleared even when the mutation failed. If the re-fetch itself fails the
    /// selection is kept.
    pub async fn approve(&self) -> Completion<Result<ApprovalOutcome>> {
        let driver = {
            let mut state = self.state.write().await;
            let Some(driver) = state.selected.clone() else {
                return Completion::Applied(Err(Error::NoSelection));
            };
            state.processing = true;
            driver
        };

        let gateway = self.gateway.clone();
        let policy = self.policy;
        let driver_id = driver.id.clone();
        let work = async move {
            let mutation = gateway.try_mark_driver_verified(&driver_id).await;
            let refresh = if mutation.is_ok() || policy == RefreshPolicy::Always {
                Some(gateway.fetch_drivers().await)
            } else {
                None
            };
            (mutation, refresh)
        };

        let Completion::Applied((mutation, refresh)) = self.scope.run(work).await else {
            return Completion::Discarded;
        };

        let mut outcome = ApprovalOutcome {
            driver_id: driver.id.clone(),
            response: None,
            error: None,
            refreshed: false,
        };
        match mutation {
            Ok(body) => outcome.response = Some(body),
            Err(e) => {
                tracing::error!("Failed to verify driver {}: {}", driver.id, e);
                outcome.error = Some(e.to_string());
            }
        }

        let mut state = self.state.write().await;
        state.processing = false;
        match refresh {
            Some(Ok(drivers)) => {
                state.drivers = drivers;
                state.selected = None;
                state.verification = None;
                outcome.refreshed = true;
            }
            Some(Err(e)) => {
                tracing::error!("Failed to reload drivers after approval: {}", e);
            }
            None => {
                tracing::debug!("Skipping reload after failed approval");
            }
        }

        Completion::Applied(Ok(outcome))
    }

    /// Reject the selected driver. No request is made.
    pub async fn reject(&self) -> Result<&'static str> {
        let mut state = self.state.write().await;
        let driver = state.selected.take().ok_or(Error::NoSelection)?;
        state.verification = None;
        tracing::info!("Driver {} rejected locally", driver.id);
        Ok(REJECTED_NOTICE)
    }

    /// Header badge for the logged in user
    pub fn badge(&self) -> Option<UserBadge> {
        self.session.user().as_ref().map(UserBadge::from)
    }

    pub fn logout(&self) -> Result<()> {
        self.session.logout()
    }
}
