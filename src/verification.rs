//! Document verification providers

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::driver::Driver;
use crate::error::Result;

/// Licence expiry reported by the simulated provider
pub const SIMULATED_LICENSE_EXPIRY: &str = "2025-06-30";

/// Score reported by the simulated provider
pub const SIMULATED_SCORE: u8 = 95;

/// Text read from a driving licence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseReading {
    pub success: bool,
    pub number: Option<String>,
    pub name: Option<String>,
    pub expiry: Option<String>,
}

/// Text read from a national identity card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NicReading {
    pub success: bool,
    pub number: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub face_match: bool,
    pub ocr_license: LicenseReading,
    pub ocr_nic: NicReading,
    pub overall_score: u8,
}

/// Checks a driver's documents
#[async_trait]
pub trait VerificationProvider: Send + Sync {
    async fn verify(&self, driver: &Driver) -> Result<VerificationResult>;
}

/// Provider that waits a fixed delay and reports a fabricated match.
///
/// No inference happens: OCR fields are copied from the driver record.
#[derive(Debug, Clone)]
pub struct SimulatedVerifier {
    delay: Duration,
}

impl SimulatedVerifier {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedVerifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl VerificationProvider for SimulatedVerifier {
    async fn verify(&self, driver: &Driver) -> Result<VerificationResult> {
        tracing::debug!("Simulating verification of driver {}", driver.id);
        tokio::time::sleep(self.delay).await;

        Ok(VerificationResult {
            face_match: true,
            ocr_license: LicenseReading {
                success: true,
                number: driver.license_number.clone(),
                name: driver.full_name.clone(),
                expiry: Some(SIMULATED_LICENSE_EXPIRY.to_string()),
            },
            ocr_nic: NicReading {
                success: true,
                number: driver.nic_number.clone(),
                name: driver.full_name.clone(),
            },
            overall_score: SIMULATED_SCORE,
        })
    }
}
