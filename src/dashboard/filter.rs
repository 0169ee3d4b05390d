//! Driver list filtering

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::driver::{Driver, VerificationStatus};

/// Dashboard tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    All,
    #[default]
    Pending,
    Verified,
    Rejected,
}

impl Tab {
    pub fn matches(&self, driver: &Driver) -> bool {
        match self {
            Tab::All => true,
            Tab::Pending => driver.is_pending,
            Tab::Verified => driver.is_verified,
            Tab::Rejected => driver.verification_status == VerificationStatus::Rejected,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::All => write!(f, "all"),
            Tab::Pending => write!(f, "pending"),
            Tab::Verified => write!(f, "verified"),
            Tab::Rejected => write!(f, "rejected"),
        }
    }
}

/// Case-insensitive substring match on the full name.
///
/// A driver without a name never matches, not even the empty query.
pub fn matches_query(driver: &Driver, query: &str) -> bool {
    driver
        .full_name
        .as_deref()
        .map(|name| name.to_lowercase().contains(&query.to_lowercase()))
        .unwrap_or(false)
}

/// Drivers visible for a tab and search query, in list order
pub fn filter_drivers<'a>(drivers: &'a [Driver], tab: Tab, query: &str) -> Vec<&'a Driver> {
    drivers
        .iter()
        .filter(|driver| tab.matches(driver) && matches_query(driver, query))
        .collect()
}
