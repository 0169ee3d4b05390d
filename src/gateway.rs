//! HTTP calls to the backend services
//!
//! Every call is made exactly once: no retry, no backoff and no
//! deduplication of identical concurrent requests.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use crate::auth::{Credentials, ErrorBody, LoginResponse, TokenStore};
use crate::config::ApiConfig;
use crate::driver::{Driver, DriverId};
use crate::error::{Error, Result};

pub const LOGIN_PATH: &str = "/api/admins/login";
pub const DRIVERS_PATH: &str = "/api/admins/get-drivers";
pub const VERIFY_PATH: &str = "/drivers/verify";

/// Client for the authentication and driver-management services
#[derive(Clone)]
pub struct BackendGateway {
    client: Client,
    api: ApiConfig,
    store: Arc<dyn TokenStore>,
}

impl BackendGateway {
    pub fn new(api: ApiConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = api.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            api,
            store,
        })
    }

    pub fn api(&self) -> &ApiConfig {
        &self.api
    }

    pub fn login_url(&self) -> String {
        join_url(&self.api.auth_url, LOGIN_PATH)
    }

    pub fn drivers_url(&self) -> String {
        join_url(&self.api.drivers_url, DRIVERS_PATH)
    }

    pub fn verify_url(&self, driver_id: &DriverId) -> String {
        join_url(
            &self.api.verify_url,
            &format!("{}/{}", VERIFY_PATH, driver_id),
        )
    }

    /// Exchange credentials for an access token.
    ///
    /// A rejected login carries the server's `message` verbatim.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<String> {
        let url = self.login_url();
        tracing::debug!("POST {}", url);

        let response = self.client.post(&url).json(credentials).send().await?;
        let status = response.status();

        if status.is_success() {
            let body: LoginResponse = response.json().await?;
            return Ok(body.access_token);
        }

        let body: ErrorBody = response.json().await?;
        match body.message {
            Some(message) => Err(Error::Authentication(message)),
            None => Err(Error::Status {
                url,
                status: status.as_u16(),
            }),
        }
    }

    /// Fetch the full driver list
    pub async fn fetch_drivers(&self) -> Result<Vec<Driver>> {
        let url = self.drivers_url();
        tracing::debug!("GET {}", url);

        let request = self.authorize(self.client.get(&url))?;
        let response = ensure_success(&url, request.send().await?)?;
        let drivers: Vec<Driver> = response.json().await?;

        tracing::debug!("Fetched {} drivers", drivers.len());
        Ok(drivers)
    }

    /// Mark a driver verified, surfacing any failure
    pub async fn try_mark_driver_verified(&self, driver_id: &DriverId) -> Result<Value> {
        let url = self.verify_url(driver_id);
        tracing::debug!("PUT {}", url);

        let request = self.authorize(self.client.put(&url))?;
        let response = ensure_success(&url, request.send().await?)?;
        Ok(response.json().await?)
    }

    /// Mark a driver verified; failures are logged and yield `None`
    pub async fn mark_driver_verified(&self, driver_id: &DriverId) -> Option<Value> {
        match self.try_mark_driver_verified(driver_id).await {
            Ok(body) => Some(body),
            Err(e) => {
                tracing::error!("Failed to verify driver {}: {}", driver_id, e);
                None
            }
        }
    }

    fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        Ok(match self.store.get()? {
            Some(token) => request.bearer_auth(token),
            None => {
                tracing::debug!("No stored token, sending request unauthenticated");
                request
            }
        })
    }
}

fn ensure_success(url: &str, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(Error::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    fn gateway() -> BackendGateway {
        let api = ApiConfig {
            auth_url: "http://auth.local:3000/".to_string(),
            drivers_url: "http://drivers.local:3000".to_string(),
            verify_url: "http://verify.local:3001".to_string(),
            timeout_secs: Some(5),
        };
        BackendGateway::new(api, Arc::new(MemoryTokenStore::new())).unwrap()
    }

    #[test]
    fn test_urls_use_per_service_hosts() {
        let gateway = gateway();
        assert_eq!(gateway.login_url(), "http://auth.local:3000/api/admins/login");
        assert_eq!(
            gateway.drivers_url(),
            "http://drivers.local:3000/api/admins/get-drivers"
        );
        assert_eq!(
            gateway.verify_url(&DriverId::Number(9)),
            "http://verify.local:3001/drivers/verify/9"
        );
    }
}
