//! Error types for the driver admin console

use thiserror::Error;

/// Message shown for any login failure that is not a validation or
/// authentication error.
pub const GENERIC_LOGIN_ERROR: &str = "An error occurred. Please try again.";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Config file not found. Run 'driver-admin init' first.")]
    ConfigNotFound,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Local form validation failed; no request was sent
    #[error("{0}")]
    Validation(String),

    /// The authentication service rejected the credentials
    #[error("{0}")]
    Authentication(String),

    /// The token storage file exists but cannot be used
    #[error("{0}")]
    Storage(String),

    #[error("Invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Not logged in. Run 'driver-admin login' first.")]
    Unauthorized,

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("No driver selected")]
    NoSelection,

    #[error("Driver '{0}' not found")]
    DriverNotFound(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Text shown on the login screen for this error.
    ///
    /// Validation and authentication messages are surfaced verbatim, every
    /// other failure collapses into a generic message.
    pub fn user_message(&self) -> String {
        match self {
            Error::Validation(msg) | Error::Authentication(msg) => msg.clone(),
            _ => GENERIC_LOGIN_ERROR.to_string(),
        }
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_passes_server_text_through() {
        let err = Error::Authentication("Invalid username or password".to_string());
        assert_eq!(err.user_message(), "Invalid username or password");
    }

    #[test]
    fn test_user_message_hides_transport_details() {
        let err = Error::Status {
            url: "http://localhost:3000/api/admins/login".to_string(),
            status: 502,
        };
        assert_eq!(err.user_message(), GENERIC_LOGIN_ERROR);
    }
}
