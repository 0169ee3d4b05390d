//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Config;

pub const CONFIG_FILENAME: &str = "driver-admin.toml";

/// Load configuration from driver-admin.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from an explicit path, or search for one and fall back
/// to defaults when no file exists.
pub fn load_config_or_default(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return load_config_from_path(path);
    }

    match load_config() {
        Ok(config) => Ok(config),
        Err(Error::ConfigNotFound) => {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            Ok(Config::default())
        }
        Err(e) => Err(e),
    }
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Compile-time constant pattern; a failure here is a bug, not a runtime condition
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Driver admin console configuration

[api]
# Admin authentication service (POST /api/admins/login)
auth_url = "${DRIVER_ADMIN_AUTH_URL:-http://localhost:3000}"
# Driver listing service (GET /api/admins/get-drivers)
drivers_url = "${DRIVER_ADMIN_DRIVERS_URL:-http://localhost:3000}"
# Driver verification service (PUT /drivers/verify/{id})
verify_url = "${DRIVER_ADMIN_VERIFY_URL:-http://localhost:3001}"
# timeout_secs = 30

[storage]
path = "./.driver-admin/storage.json"
token_key = "token"

[verification]
# Delay of the simulated document verification
delay_ms = 2000
# Re-fetch the driver list after an approval even when the mutation failed
refresh_on_failure = true
"#
}
