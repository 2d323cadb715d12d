//! Wire types and response-shape classification.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;

/// A registered user as returned by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
    pub name: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

/// Registration payload. Sent once and dropped.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RegisterData {
    pub email: String,
    pub name: String,
    pub password: String,
}

impl std::fmt::Debug for RegisterData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterData")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &"***")
            .finish()
    }
}

/// UI status flag for a pending operation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadingState {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Accepted shapes of the registration response.
#[derive(Debug, PartialEq)]
pub enum RegisterPayload {
    /// `{ "user": { ... } }`
    Envelope(Value),
    /// The user object itself, detected by `_id`, `email` and `name`.
    Bare(Value),
}

impl RegisterPayload {
    /// Classify a response body; `None` when neither shape applies.
    pub fn classify(body: Value) -> Option<Self> {
        let Value::Object(mut map) = body else {
            return None;
        };
        if let Some(user) = map.remove("user") {
            if ["_id", "email", "name"].iter().all(|k| map.contains_key(*k)) {
                tracing::warn!("registration response carries both a user envelope and top-level user fields; using the envelope");
            }
            return Some(Self::Envelope(user));
        }
        if ["_id", "email", "name"].iter().all(|k| map.contains_key(*k)) {
            return Some(Self::Bare(Value::Object(map)));
        }
        None
    }

    pub fn into_user(self) -> Result<User, ApiError> {
        let raw = match self {
            Self::Envelope(v) | Self::Bare(v) => v,
        };
        decode_user(raw)
    }
}

/// Accepted shapes of the listing response.
#[derive(Debug, PartialEq)]
pub enum UsersPayload {
    /// A bare array of users.
    Bare(Vec<Value>),
    /// `{ "users": [ ... ] }`
    Envelope(Value),
}

impl UsersPayload {
    pub fn classify(body: Value) -> Option<Self> {
        match body {
            Value::Array(items) => Some(Self::Bare(items)),
            Value::Object(mut map) => map.remove("users").map(Self::Envelope),
            _ => None,
        }
    }

    pub fn into_users(self) -> Result<Vec<User>, ApiError> {
        let items = match self {
            Self::Bare(items) => items,
            Self::Envelope(Value::Array(items)) => items,
            Self::Envelope(_) => {
                return Err(ApiError::new(
                    "Invalid response format from users endpoint: users is not an array",
                ));
            }
        };
        items.into_iter().map(decode_user).collect()
    }
}

fn decode_user(raw: Value) -> Result<User, ApiError> {
    serde_json::from_value(raw)
        .map_err(|e| ApiError::new(format!("Invalid user object in response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn wire_user(id: &str) -> Value {
        json!({
            "_id": id,
            "email": format!("{id}@example.com"),
            "name": format!("User {id}"),
            "createdAt": "2024-01-02T03:04:05.000Z",
            "updatedAt": "2024-01-02T03:04:05.000Z",
        })
    }

    #[test]
    fn envelope_wins_when_both_shapes_match() {
        let mut body = wire_user("outer");
        body["user"] = wire_user("inner");
        let payload = RegisterPayload::classify(body).unwrap();
        assert_eq!(payload.into_user().unwrap().id, "inner");
    }

    #[test]
    fn bare_user_requires_identity_fields() {
        assert!(RegisterPayload::classify(json!({ "email": "a@b.c", "name": "x" })).is_none());
        assert!(RegisterPayload::classify(json!([wire_user("a")])).is_none());
        assert!(matches!(
            RegisterPayload::classify(wire_user("a")),
            Some(RegisterPayload::Bare(_))
        ));
    }

    #[test]
    fn partial_user_is_rejected() {
        let payload = RegisterPayload::classify(json!({ "_id": "1", "email": "a@b.c", "name": "x" })).unwrap();
        let err = payload.into_user().unwrap_err();
        assert!(err.is_contract_violation());
        assert!(err.message.contains("createdAt"));
    }

    #[test]
    fn null_field_is_rejected() {
        let mut body = wire_user("a");
        body["name"] = Value::Null;
        let err = RegisterPayload::classify(body).unwrap().into_user().unwrap_err();
        assert!(err.is_contract_violation());
    }

    #[test]
    fn users_envelope_must_hold_an_array() {
        let payload = UsersPayload::classify(json!({ "users": { "a": 1 } })).unwrap();
        assert!(payload.into_users().is_err());
        assert!(UsersPayload::classify(json!({ "items": [] })).is_none());
        assert!(UsersPayload::classify(json!("nope")).is_none());
    }

    #[test]
    fn register_data_debug_hides_password() {
        let data = RegisterData {
            email: "a@b.c".into(),
            name: "A".into(),
            password: "hunter22".into(),
        };
        assert!(!format!("{data:?}").contains("hunter22"));
    }
}
