//! Driver verification records

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Driver identifier as sent by the backend (numeric or string)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DriverId {
    Number(i64),
    Text(String),
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DriverId::Number(n) => write!(f, "{}", n),
            DriverId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for DriverId {
    fn from(id: i64) -> Self {
        DriverId::Number(id)
    }
}

impl From<&str> for DriverId {
    fn from(id: &str) -> Self {
        match id.parse::<i64>() {
            Ok(n) => DriverId::Number(n),
            Err(_) => DriverId::Text(id.to_string()),
        }
    }
}

/// Verification status of a driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum VerificationStatus {
    #[default]
    Pending,
    Verified,
    Rejected,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for VerificationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerificationStatus::Pending => write!(f, "pending"),
            VerificationStatus::Verified => write!(f, "verified"),
            VerificationStatus::Rejected => write!(f, "rejected"),
            VerificationStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// A driver record as returned by the listing endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: DriverId,

    #[serde(default)]
    pub full_name: Option<String>,

    #[serde(default)]
    pub address: Option<String>,

    #[serde(default)]
    pub phone_num: Option<String>,

    #[serde(default)]
    pub license_number: Option<String>,

    #[serde(default)]
    pub nic_number: Option<String>,

    #[serde(default)]
    pub verification_status: VerificationStatus,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_pending: bool,

    #[serde(default, deserialize_with = "deserialize_flag")]
    pub is_verified: bool,

    #[serde(default)]
    pub created_at: Option<String>,
}

impl Driver {
    pub fn new(id: impl Into<DriverId>, full_name: &str) -> Self {
        Self {
            id: id.into(),
            full_name: Some(full_name.to_string()),
            address: None,
            phone_num: None,
            license_number: None,
            nic_number: None,
            verification_status: VerificationStatus::Pending,
            is_pending: true,
            is_verified: false,
            created_at: None,
        }
    }

    /// Status label with the first letter capitalised
    pub fn status_label(&self) -> String {
        let status = self.verification_status.to_string();
        let mut chars = status.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => status,
        }
    }

    /// Submission date parsed from `created_at`
    pub fn submitted_on(&self) -> Option<NaiveDate> {
        let raw = self.created_at.as_deref()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.date_naive());
        }
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
            return Some(dt.date());
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
    }
}

/// Accept `0`/`1`, booleans or null for the pending/verified flags
fn deserialize_flag<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n == 1,
        Some(Flag::Text(s)) => s == "1" || s.eq_ignore_ascii_case("true"),
        None => false,
    })
}
