use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{Session, User};

const DEFAULT_EXPIRES_IN_SECS: i64 = 3600;

#[derive(Debug, Serialize)]
pub struct SignUpBody<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub data: SignUpMetadata<'a>,
}

#[derive(Debug, Serialize)]
pub struct SignUpMetadata<'a> {
    pub username: &'a str,
}

#[derive(Debug, Serialize)]
pub struct PasswordGrant<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RefreshGrant<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<i64>,
    pub user: User,
}

impl TokenResponse {
    pub fn into_session(self) -> Session {
        let expires_at = self
            .expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0))
            .unwrap_or_else(|| {
                Utc::now()
                    + Duration::seconds(self.expires_in.unwrap_or(DEFAULT_EXPIRES_IN_SECS))
            });

        Session {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            token_type: self.token_type.unwrap_or_else(|| "bearer".to_string()),
            expires_at,
            user: self.user,
        }
    }
}

/// Signup replies with a full token response when email confirmation is
/// off, and with the bare user object when it is on.
pub fn parse_signup(body: Value) -> Result<(Option<User>, Option<Session>), serde_json::Error> {
    if body.get("access_token").is_some() {
        let session = serde_json::from_value::<TokenResponse>(body)?.into_session();
        return Ok((Some(session.user.clone()), Some(session)));
    }

    if let Some(user) = body.get("user").filter(|u| !u.is_null()) {
        return Ok((Some(serde_json::from_value(user.clone())?), None));
    }

    if body.get("id").is_some() {
        return Ok((Some(serde_json::from_value(body)?), None));
    }

    Ok((None, None))
}

/// Pull a readable message out of an error body.
pub fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .filter(|message| !message.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn user_json() -> Value {
        json!({ "id": "user-1", "email": "ana@example.com", "user_metadata": { "username": "ana" } })
    }

    #[test]
    fn signup_with_confirmation_returns_user_only() {
        let (user, session) = parse_signup(user_json()).unwrap();
        assert_eq!(user.unwrap().username(), Some("ana"));
        assert!(session.is_none());
    }

    #[test]
    fn signup_without_confirmation_returns_session() {
        let (user, session) = parse_signup(json!({
            "access_token": "a",
            "refresh_token": "r",
            "expires_in": 3600,
            "user": user_json()
        }))
        .unwrap();
        assert_eq!(user.unwrap().id, "user-1");
        assert_eq!(session.unwrap().token_type, "bearer");
    }

    #[test]
    fn signup_without_user_is_empty() {
        let (user, session) = parse_signup(json!({ "user": null })).unwrap();
        assert!(user.is_none() && session.is_none());
    }

    #[test]
    fn error_message_prefers_msg_then_description() {
        assert_eq!(
            error_message(br#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#),
            Some("Invalid login credentials".to_string())
        );
        assert_eq!(
            error_message(br#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#),
            Some("Email not confirmed".to_string())
        );
        assert_eq!(error_message(b"gateway timeout"), None);
    }

    #[test]
    fn explicit_expiry_wins_over_relative() {
        let session = TokenResponse {
            access_token: "a".into(),
            refresh_token: "r".into(),
            token_type: None,
            expires_in: Some(10),
            expires_at: Some(1_900_000_000),
            user: serde_json::from_value(user_json()).unwrap(),
        }
        .into_session();
        assert_eq!(session.expires_at.timestamp(), 1_900_000_000);
    }
}
