//! Driver admin - review and approve driver verification requests
//!
//! This is the library interface of the admin console: session handling,
//! the route guard, the backend gateway and the login and dashboard flows.
//! The `driver-admin` binary is a thin CLI over it.

pub mod auth;
pub mod cli;
pub mod config;
pub mod dashboard;
pub mod driver;
pub mod error;
pub mod gateway;
pub mod guard;
pub mod lifecycle;
pub mod login;
pub mod navigation;
pub mod verification;

pub use auth::{SessionManager, User};
pub use config::Config;
pub use dashboard::DashboardView;
pub use driver::Driver;
pub use error::Error;
pub use gateway::BackendGateway;
