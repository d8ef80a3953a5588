#![allow(dead_code)]

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use chrono::{Duration, Utc};
use datalis_auth::{Session, Settings, User};
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const PASSWORD: &str = "correct horse";
pub const UNCONFIRMED_EMAIL: &str = "pending@example.com";
pub const GOOD_REFRESH: &str = "good-refresh";
/// Signs in with an access token that lapses after one second.
pub const SHORT_LIVED_EMAIL: &str = "brief@example.com";

#[derive(Debug, Clone)]
pub struct Seen {
    pub path: String,
    pub apikey: Option<String>,
    pub authorization: Option<String>,
    pub query: HashMap<String, String>,
    pub body: Option<Value>,
}

#[derive(Clone)]
pub struct IdentityService {
    seen: Arc<Mutex<Vec<Seen>>>,
    logout_status: StatusCode,
}

impl IdentityService {
    fn record(
        &self,
        path: &str,
        headers: &HeaderMap,
        query: HashMap<String, String>,
        body: Option<Value>,
    ) {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        self.seen.lock().unwrap().push(Seen {
            path: path.to_string(),
            apikey: header("apikey"),
            authorization: header("authorization"),
            query,
            body,
        });
    }

    /// Token requests seen so far with the given grant type.
    pub fn grants(&self, grant_type: &str) -> usize {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.path == "/token")
            .filter(|s| s.query.get("grant_type").map(String::as_str) == Some(grant_type))
            .count()
    }

    pub fn last(&self, path: &str) -> Option<Seen> {
        self.seen
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|s| s.path == path)
            .cloned()
    }
}

pub fn user_json(email: &str) -> Value {
    json!({
        "id": "user-1",
        "email": email,
        "email_confirmed_at": "2024-05-01T10:00:00Z",
        "user_metadata": { "username": "ana" }
    })
}

fn token_json(access_token: &str, email: &str, expires_in: i64) -> Value {
    json!({
        "access_token": access_token,
        "refresh_token": GOOD_REFRESH,
        "token_type": "bearer",
        "expires_in": expires_in,
        "user": user_json(email)
    })
}

fn rejected(description: &str) -> (StatusCode, Json<Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": "invalid_grant", "error_description": description })),
    )
}

async fn token(
    State(service): State<IdentityService>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    service.record("/token", &headers, query.clone(), Some(body.clone()));

    match query.get("grant_type").map(String::as_str) {
        Some("password") => {
            let email = body["email"].as_str().unwrap_or_default();
            if email == UNCONFIRMED_EMAIL {
                return rejected("Email not confirmed");
            }
            if body["password"] != PASSWORD {
                return rejected("Invalid login credentials");
            }
            let expires_in = if email == SHORT_LIVED_EMAIL { 1 } else { 3600 };
            (StatusCode::OK, Json(token_json("access-1", email, expires_in)))
        }
        Some("refresh_token") if body["refresh_token"] == GOOD_REFRESH => (
            StatusCode::OK,
            Json(token_json("refreshed-access", "ana@example.com", 3600)),
        ),
        Some("refresh_token") => rejected("Invalid Refresh Token: Refresh Token Not Found"),
        _ => rejected("unsupported_grant_type"),
    }
}

async fn signup(
    State(service): State<IdentityService>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    service.record("/signup", &headers, query, Some(body.clone()));

    if body["email"] == "taken@example.com" {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "code": 422, "msg": "User already registered" })),
        );
    }
    (StatusCode::OK, Json(user_json(body["email"].as_str().unwrap_or_default())))
}

async fn logout(State(service): State<IdentityService>, headers: HeaderMap) -> StatusCode {
    service.record("/logout", &headers, HashMap::new(), None);
    service.logout_status
}

/// Stand up a fake identity service and return settings pointing at it.
pub async fn spawn_identity_service(logout_status: StatusCode) -> (Settings, IdentityService) {
    let service = IdentityService {
        seen: Arc::default(),
        logout_status,
    };
    let router = Router::new()
        .route("/auth/v1/token", post(token))
        .route("/auth/v1/signup", post(signup))
        .route("/auth/v1/logout", post(logout))
        .with_state(service.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let settings = Settings {
        auth_url: format!("http://{addr}"),
        auth_anon_key: "anon-key".to_string(),
        email_redirect_to: Some("https://app.example.com/".to_string()),
        ..Settings::default()
    };
    (settings, service)
}

pub fn session(access_token: &str, refresh_token: &str, expires_in: Duration) -> Session {
    Session {
        access_token: access_token.to_string(),
        refresh_token: refresh_token.to_string(),
        token_type: "bearer".to_string(),
        expires_at: Utc::now() + expires_in,
        user: serde_json::from_value::<User>(user_json("ana@example.com")).unwrap(),
    }
}
