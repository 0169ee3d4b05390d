//! Configuration schema definitions

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub verification: VerificationConfig,
}

/// Base URLs of the backend services.
///
/// The verification mutation has been observed on a different host/port than
/// the listing endpoint, so every service gets its own base URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Admin authentication service
    #[serde(default = "default_auth_url")]
    pub auth_url: String,

    /// Driver listing service
    #[serde(default = "default_drivers_url")]
    pub drivers_url: String,

    /// Driver verification service
    #[serde(default = "default_verify_url")]
    pub verify_url: String,

    /// Per-request timeout; unset means no timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

fn default_auth_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_drivers_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_verify_url() -> String {
    "http://localhost:3001".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            auth_url: default_auth_url(),
            drivers_url: default_drivers_url(),
            verify_url: default_verify_url(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Where the bearer token is persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,

    #[serde(default = "default_token_key")]
    pub token_key: String,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("./.driver-admin/storage.json")
}

fn default_token_key() -> String {
    "token".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
            token_key: default_token_key(),
        }
    }
}

/// Document verification and approval behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerificationConfig {
    /// Delay of the simulated verification provider
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Re-fetch the driver list after an approval even if the mutation failed
    #[serde(default = "default_refresh_on_failure")]
    pub refresh_on_failure: bool,
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_refresh_on_failure() -> bool {
    true
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            refresh_on_failure: default_refresh_on_failure(),
        }
    }
}

impl VerificationConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
