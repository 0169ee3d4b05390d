//! Fake backend services for integration tests
//!
//! Serves the login, driver listing and verification endpoints from one
//! in-process axum server bound to an ephemeral port.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use driver_admin::auth::MemoryTokenStore;
use driver_admin::config::ApiConfig;
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "secret";
pub const BAD_LOGIN_MESSAGE: &str = "Invalid username or password";

/// Sign a token the way the authentication service would
pub fn mint_token(claims: Value) -> String {
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(b"backend-signing-key"),
    )
    .expect("Failed to create token")
}

pub fn admin_claims() -> Value {
    json!({
        "id": 1,
        "username": ADMIN_USERNAME,
        "name": "Fleet Admin",
        "role": "admin",
        "iat": 1_700_000_000,
        "exp": 4_000_000_000i64
    })
}

pub fn admin_token() -> String {
    mint_token(admin_claims())
}

pub fn memory_store_with_admin() -> Arc<MemoryTokenStore> {
    Arc::new(MemoryTokenStore::with_token(admin_token()))
}

/// The two-driver roster used across scenarios
pub fn sample_drivers() -> Vec<Value> {
    vec![
        json!({
            "id": 1,
            "full_name": "Alice",
            "address": "1 Main Street",
            "phone_num": "0711111111",
            "license_number": "B1111111",
            "nic_number": "911111111V",
            "verification_status": "pending",
            "is_pending": 1,
            "is_verified": 0,
            "created_at": "2024-02-10T09:00:00.000Z"
        }),
        json!({
            "id": 2,
            "full_name": "Bob",
            "address": "2 Hill Road",
            "phone_num": "0722222222",
            "license_number": "B2222222",
            "nic_number": "922222222V",
            "verification_status": "verified",
            "is_pending": 0,
            "is_verified": 1,
            "created_at": "2024-01-15T09:00:00.000Z"
        }),
    ]
}

#[derive(Default)]
pub struct BackendState {
    pub token: String,
    pub drivers: Mutex<Vec<Value>>,
    pub login_calls: AtomicUsize,
    pub list_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub fail_list: AtomicBool,
    pub fail_verify: AtomicBool,
    pub list_delay_ms: AtomicU64,
    pub last_authorization: Mutex<Option<String>>,
}

pub struct FakeBackend {
    pub addr: SocketAddr,
    pub state: Arc<BackendState>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        Self::start_issuing(admin_token()).await
    }

    /// Start a backend whose login endpoint hands out `token`
    pub async fn start_issuing(token: String) -> Self {
        let state = Arc::new(BackendState {
            token,
            drivers: Mutex::new(sample_drivers()),
            ..Default::default()
        });

        let app = Router::new()
            .route("/api/admins/login", post(login))
            .route("/api/admins/get-drivers", get(list_drivers))
            .route("/drivers/verify/{id}", put(verify_driver))
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// All three services served by this backend
    pub fn api(&self) -> ApiConfig {
        ApiConfig {
            auth_url: self.url(),
            drivers_url: self.url(),
            verify_url: self.url(),
            timeout_secs: Some(10),
        }
    }

    pub fn logins(&self) -> usize {
        self.state.login_calls.load(Ordering::SeqCst)
    }

    pub fn lists(&self) -> usize {
        self.state.list_calls.load(Ordering::SeqCst)
    }

    pub fn verifications(&self) -> usize {
        self.state.verify_calls.load(Ordering::SeqCst)
    }

    pub fn set_fail_list(&self, fail: bool) {
        self.state.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_verify(&self, fail: bool) {
        self.state.fail_verify.store(fail, Ordering::SeqCst);
    }

    pub fn set_list_delay(&self, delay: Duration) {
        self.state
            .list_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    pub fn last_authorization(&self) -> Option<String> {
        self.state.last_authorization.lock().unwrap().clone()
    }
}

/// A URL nothing listens on, for transport failures
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

async fn login(
    State(state): State<Arc<BackendState>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.login_calls.fetch_add(1, Ordering::SeqCst);

    let username = body.get("username").and_then(Value::as_str);
    let password = body.get("password").and_then(Value::as_str);

    if username == Some(ADMIN_USERNAME) && password == Some(ADMIN_PASSWORD) {
        (
            StatusCode::OK,
            Json(json!({ "accessToken": state.token, "message": "Login successful" })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": BAD_LOGIN_MESSAGE })),
        )
    }
}

async fn list_drivers(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.list_calls.fetch_add(1, Ordering::SeqCst);
    *state.last_authorization.lock().unwrap() = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let delay = state.list_delay_ms.load(Ordering::SeqCst);
    if delay > 0 {
        tokio::time::sleep(Duration::from_millis(delay)).await;
    }

    if state.fail_list.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "database unavailable" })),
        );
    }

    let drivers = state.drivers.lock().unwrap().clone();
    (StatusCode::OK, Json(Value::Array(drivers)))
}

async fn verify_driver(
    State(state): State<Arc<BackendState>>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    state.verify_calls.fetch_add(1, Ordering::SeqCst);

    if state.fail_verify.load(Ordering::SeqCst) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": "verification failed" })),
        );
    }

    let mut drivers = state.drivers.lock().unwrap();
    let Some(driver) = drivers
        .iter_mut()
        .find(|d| d.get("id").map(|v| v.to_string()) == Some(id.clone()))
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "message": "Driver not found" })),
        );
    };

    driver["verification_status"] = json!("verified");
    driver["is_pending"] = json!(0);
    driver["is_verified"] = json!(1);

    (StatusCode::OK, Json(json!({ "message": "Driver verified", "id": id })))
}
