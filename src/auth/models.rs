//! Authentication models

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded access token payload.
///
/// The authentication service is a black box, so every claim is optional and
/// claims are read leniently: a value of an unexpected type never fails the
/// decode. Anything unrecognised, or unusable, is kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(from = "Map<String, Value>")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,

    /// Issued at
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// Expiration time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<i64>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Scalar claim rendered as text; strings as-is, numbers and booleans printed
fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn role_list(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(scalar_text).collect()),
        other => scalar_text(other).map(|role| vec![role]),
    }
}

/// Remove `key` from the claims when `read` can make sense of it
fn take<T>(claims: &mut Map<String, Value>, key: &str, read: fn(&Value) -> Option<T>) -> Option<T> {
    let parsed = claims.get(key).and_then(read)?;
    claims.remove(key);
    Some(parsed)
}

impl From<Map<String, Value>> for User {
    fn from(mut claims: Map<String, Value>) -> Self {
        let id = claims.remove("id");
        let sub = claims.remove("sub");
        let username = take(&mut claims, "username", scalar_text);
        let name = take(&mut claims, "name", scalar_text);

        // `role` may itself be a list; its entries join `roles`
        let mut roles = take(&mut claims, "roles", role_list).unwrap_or_default();
        let role = if matches!(claims.get("role"), Some(Value::Array(_))) {
            roles.extend(take(&mut claims, "role", role_list).unwrap_or_default());
            None
        } else {
            take(&mut claims, "role", scalar_text)
        };

        let iat = take(&mut claims, "iat", timestamp);
        let exp = take(&mut claims, "exp", timestamp);

        Self {
            id,
            sub,
            username,
            name,
            role,
            roles,
            iat,
            exp,
            extra: claims,
        }
    }
}

impl User {
    /// User identifier, taken from `id` and then `sub`
    pub fn identifier(&self) -> Option<String> {
        self.id
            .as_ref()
            .or(self.sub.as_ref())
            .map(|value| match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
    }

    /// Avatar initial: first letter of the username, upper-cased
    pub fn initial(&self) -> char {
        self.username
            .as_deref()
            .and_then(|name| name.chars().next())
            .and_then(|c| c.to_uppercase().next())
            .unwrap_or('A')
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Admin")
    }

    /// Every role claim, the single `role` first, without duplicates
    pub fn all_roles(&self) -> Vec<&str> {
        let mut all: Vec<&str> = Vec::new();
        for role in self.role.iter().chain(self.roles.iter()) {
            if !all.contains(&role.as_str()) {
                all.push(role);
            }
        }
        all
    }

    /// Whether the `exp` claim lies in the past.
    ///
    /// Informational only: sessions are never invalidated on expiry.
    pub fn is_expired(&self) -> bool {
        self.exp
            .map(|exp| chrono::Utc::now().timestamp() > exp)
            .unwrap_or(false)
    }
}

/// Login credentials
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Successful login response
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Failure body returned by the backend services
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
