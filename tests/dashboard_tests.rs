//! Dashboard data-sync tests against a fake driver service
//!
//! Run with: cargo test --test dashboard_tests

mod common;

use common::{memory_store_with_admin, unreachable_url, FakeBackend};
use driver_admin::auth::SessionManager;
use driver_admin::config::ApiConfig;
use driver_admin::dashboard::{DashboardView, RefreshPolicy, Tab, REJECTED_NOTICE};
use driver_admin::driver::DriverId;
use driver_admin::error::Error;
use driver_admin::gateway::BackendGateway;
use driver_admin::lifecycle::Completion;
use driver_admin::verification::SimulatedVerifier;
use std::sync::Arc;
use std::time::Duration;

fn dashboard(api: ApiConfig, policy: RefreshPolicy) -> DashboardView {
    let store = memory_store_with_admin();
    let session = SessionManager::restore(store.clone());
    let gateway = BackendGateway::new(api, store).unwrap();
    let provider = Arc::new(SimulatedVerifier::new(Duration::from_millis(5)));
    DashboardView::new(gateway, session, provider, policy)
}

fn ids(drivers: &[driver_admin::Driver]) -> Vec<String> {
    drivers.iter().map(|d| d.id.to_string()).collect()
}

// ============================================================================
// Mount and filtering
// ============================================================================

#[tokio::test]
async fn test_mount_fetches_once_with_bearer() {
    let backend = FakeBackend::start().await;
    let view = dashboard(backend.api(), RefreshPolicy::Always);

    let loaded = view.mount().await;
    assert!(matches!(loaded, Completion::Applied(Ok(2))));
    assert_eq!(backend.lists(), 1);
    assert_eq!(
        backend.last_authorization(),
        Some(format!("Bearer {}", backend.state.token))
    );
}

#[tokio::test]
async fn test_filter_scenarios() {
    let backend = FakeBackend::start().await;
    let view = dashboard(backend.api(), RefreshPolicy::Always);
    view.mount().await;

    // Pending is the default tab
    assert_eq!(ids(&view.filtered().await), vec!["1"]);

    view.set_tab(Tab::All).await;
    view.set_query("bo").await;
    assert_eq!(ids(&view.filtered().await), vec!["2"]);

    view.set_query("").await;
    assert_eq!(ids(&view.filtered().await), vec!["1", "2"]);
    assert_eq!(ids(&view.filtered().await), vec!["1", "2"]);
}

#[tokio::test]
async fn test_failed_mount_keeps_previous_list() {
    let backend = FakeBackend::start().await;
    let view = dashboard(backend.api(), RefreshPolicy::Always);
    view.mount().await;

    backend.set_fail_list(true);
    let reloaded = view.mount().await;

    assert!(matches!(
        reloaded,
        Completion::Applied(Err(Error::Status { status: 500, .. }))
    ));
    assert_eq!(view.snapshot().await.drivers.len(), 2);
}

#[tokio::test]
async fn test_failed_first_mount_leaves_empty_list() {
    let backend = FakeBackend::start().await;
    backend.set_fail_list(true);
    let view = dashboard(backend.api(), RefreshPolicy::Always);

    assert!(matches!(view.mount().await, Completion::Applied(Err(_))));
    assert!(view.snapshot().await.drivers.is_empty());
    assert!(view.filtered().await.is_empty());
}

// ============================================================================
// Approval
// ============================================================================

#[tokio::test]
async fn test_approve_refreshes_and_clears_selection() {
    let backend = FakeBackend::start().await;
    let view = dashboard(backend.api(), RefreshPolicy::Always);
    view.mount().await;

    view.select(&DriverId::Number(1)).await.unwrap();
    let outcome = view.approve().await.applied().unwrap().unwrap();

    assert!(outcome.verified());
    assert!(outcome.refreshed);
    assert_eq!(backend.verifications(), 1);
    assert_eq!(backend.lists(), 2);

    let state = view.snapshot().await;
    assert!(state.selected.is_none());
    assert!(!state.processing);

    view.set_tab(Tab::Verified).await;
    assert_eq!(ids(&view.filtered().await), vec!["1", "2"]);
}

#[tokio::test]
async fn test_failed_mutation_still_refreshes() {
    let backend = FakeBackend::start().await;
    let mut api = backend.api();
    api.verify_url = unreachable_url().await;
    let view = dashboard(api, RefreshPolicy::Always);
    view.mount().await;

    view.select(&DriverId::Number(1)).await.unwrap();
    let outcome = view.approve().await.applied().unwrap().unwrap();

    assert!(!outcome.verified());
    assert!(outcome.error.is_some());
    assert!(outcome.refreshed);
    assert_eq!(backend.lists(), 2);

    let state = view.snapshot().await;
    assert!(state.selected.is_none());
    assert!(state.verification.is_none());
    assert!(!state.processing);
}

#[tokio::test]
async fn test_on_success_policy_keeps_selection_after_failure() {
    let backend = FakeBackend::start().await;
    backend.set_fail_verify(true);
    let view = dashboard(backend.api(), RefreshPolicy::OnSuccess);
    view.mount().await;

    view.select(&DriverId::Number(1)).await.unwrap();
    let outcome = view.approve().await.applied().unwrap().unwrap();

    assert!(!outcome.verified());
    assert!(!outcome.refreshed);
    assert_eq!(backend.lists(), 1);
    assert_eq!(view.selected().await.map(|d| d.id), Some(DriverId::Number(1)));
}

#[tokio::test]
async fn test_failed_refresh_keeps_selection() {
    let backend = FakeBackend::start().await;
    let view = dashboard(backend.api(), RefreshPolicy::Always);
    view.mount().await;

    view.select(&DriverId::Number(1)).await.unwrap();
    backend.set_fail_list(true);
    let outcome = view.approve().await.applied().unwrap().unwrap();

    assert!(outcome.verified());
    assert!(!outcome.refreshed);
    assert!(view.selected().await.is_some());
    assert!(!view.snapshot().await.processing);
}

#[tokio::test]
async fn test_approve_without_selection() {
    let backend = FakeBackend::start().await;
    let view = dashboard(backend.api(), RefreshPolicy::Always);

    let outcome = view.approve().await;
    assert!(matches!(outcome, Completion::Applied(Err(Error::NoSelection))));
    assert_eq!(backend.verifications(), 0);
}

// ============================================================================
// Rejection and verification
// ============================================================================

#[tokio::test]
async fn test_reject_is_local_only() {
    let backend = FakeBackend::start().await;
    let view = dashboard(backend.api(), RefreshPolicy::Always);
    view.mount().await;

    view.select(&DriverId::Number(1)).await.unwrap();
    assert_eq!(view.reject().await.unwrap(), REJECTED_NOTICE);

    assert!(view.selected().await.is_none());
    assert_eq!(backend.verifications(), 0);
    assert_eq!(backend.lists(), 1);
}

#[tokio::test]
async fn test_select_unknown_driver() {
    let backend = FakeBackend::start().await;
    let view = dashboard(backend.api(), RefreshPolicy::Always);
    view.mount().await;

    let result = view.select(&DriverId::Number(99)).await;
    assert!(matches!(result, Err(Error::DriverNotFound(_))));
}

#[tokio::test]
async fn test_run_verification_on_selected_driver() {
    let backend = FakeBackend::start().await;
    let view = dashboard(backend.api(), RefreshPolicy::Always);
    view.mount().await;

    view.select(&DriverId::Number(2)).await.unwrap();
    let result = view.run_verification().await.applied().unwrap().unwrap();

    assert!(result.face_match);
    assert_eq!(result.overall_score, 95);
    assert_eq!(result.ocr_license.number.as_deref(), Some("B2222222"));
    assert_eq!(result.ocr_nic.name.as_deref(), Some("Bob"));

    let state = view.snapshot().await;
    assert_eq!(state.verification, Some(result));
    assert!(!state.processing);
}

// ============================================================================
// Lifecycle
// ============================================================================

#[tokio::test]
async fn test_unmount_discards_inflight_fetch() {
    let backend = FakeBackend::start().await;
    backend.set_list_delay(Duration::from_secs(5));
    let view = Arc::new(dashboard(backend.api(), RefreshPolicy::Always));

    let task = {
        let view = Arc::clone(&view);
        tokio::spawn(async move { view.mount().await })
    };

    tokio::time::sleep(Duration::from_millis(50)).await;
    view.unmount();

    assert!(task.await.unwrap().is_discarded());
    assert_eq!(view.discarded(), 1);
    assert!(view.snapshot().await.drivers.is_empty());
}

#[tokio::test]
async fn test_header_badge_and_logout() {
    let backend = FakeBackend::start().await;
    let view = dashboard(backend.api(), RefreshPolicy::Always);

    let badge = view.badge().expect("logged in");
    assert_eq!(badge.initial, 'A');
    assert_eq!(badge.name, "Fleet Admin");

    view.logout().unwrap();
    assert!(view.badge().is_none());
}
