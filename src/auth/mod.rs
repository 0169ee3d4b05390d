//! Authentication and session management

pub mod jwt;
pub mod models;
pub mod session;
pub mod store;

pub use jwt::decode_token;
pub use models::{Credentials, ErrorBody, LoginResponse, User};
pub use session::{Session, SessionManager};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
