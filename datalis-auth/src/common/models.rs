use chrono::{serde::ts_seconds, DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Identity record issued by the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    #[serde(default)]
    pub email_confirmed_at: Option<String>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

impl User {
    /// Display name chosen at signup, if any.
    pub fn username(&self) -> Option<&str> {
        self.user_metadata.get("username").and_then(Value::as_str)
    }
}

/// Provider-issued credential for an authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(with = "ts_seconds")]
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// How long before `expires_at` a session is due for refresh.
pub const REFRESH_MARGIN: Duration = Duration::minutes(5);

impl Session {
    pub fn refresh_due_at(&self) -> DateTime<Utc> {
        self.expires_at - REFRESH_MARGIN
    }

    /// True once the session is inside its refresh margin, so a request
    /// never leaves with a token about to lapse.
    pub fn needs_refresh(&self) -> bool {
        self.refresh_due_at() <= Utc::now()
    }
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthChangeEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

/// Payload of the provider's session-changed stream
#[derive(Debug, Clone, PartialEq)]
pub struct AuthStateChange {
    pub event: AuthChangeEvent,
    pub session: Option<Session>,
}

impl AuthStateChange {
    pub fn new(event: AuthChangeEvent, session: Option<Session>) -> Self {
        Self { event, session }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(expires_in: Duration) -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            token_type: "bearer".to_string(),
            expires_at: Utc::now() + expires_in,
            user: User {
                id: "user-1".to_string(),
                email: None,
                email_confirmed_at: None,
                user_metadata: Map::new(),
            },
        }
    }

    #[test]
    fn refresh_is_due_inside_margin() {
        assert!(!session(Duration::hours(1)).needs_refresh());
        assert!(session(Duration::minutes(2)).needs_refresh());
        assert!(session(Duration::minutes(-1)).needs_refresh());

        let s = session(Duration::hours(1));
        assert_eq!(s.expires_at - s.refresh_due_at(), REFRESH_MARGIN);
    }

    #[test]
    fn expires_at_travels_as_unix_seconds() {
        let json = serde_json::json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_at": 1_700_000_000,
            "user": { "id": "user-1", "email": null }
        });
        let s: Session = serde_json::from_value(json).unwrap();
        assert_eq!(s.expires_at.timestamp(), 1_700_000_000);
        assert_eq!(s.token_type, "bearer");
    }
}
