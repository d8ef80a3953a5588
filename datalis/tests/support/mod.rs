#![allow(dead_code)]

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use datalis_auth::Settings;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const PASSWORD: &str = "correct horse";
pub const ACCESS_TOKEN: &str = "access-1";

/// Company id whose workbench listing answers slowly.
pub const SLOW_COMPANY: &str = "co-slow";

/// State of the fake platform: backend API, identity service and wallet
/// table behind one listener.
#[derive(Clone)]
pub struct Platform {
    pub balance: Arc<Mutex<Option<i64>>>,
    pub wallet_writes: Arc<Mutex<Vec<Value>>>,
    pub sent_messages: Arc<Mutex<Vec<Value>>>,
    pub fail_wallet: Arc<Mutex<bool>>,
}

fn bearer(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "detail": "Not authenticated" })),
    )
}

fn workbench_json(id: &str, name: &str, company_id: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "owner_user_id": "user-1",
        "company_id": company_id,
        "created_at": "2024-05-01T10:00:00+00:00"
    })
}

async fn token(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["password"] != PASSWORD {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_grant", "error_description": "Invalid login credentials" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "access_token": ACCESS_TOKEN,
            "refresh_token": "refresh-1",
            "expires_in": 3600,
            "user": {
                "id": "user-1",
                "email": body["email"],
                "user_metadata": { "username": "ana" }
            }
        })),
    )
}

async fn read_wallet(
    State(platform): State<Platform>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if bearer(&headers) != Some(ACCESS_TOKEN) || headers.get("apikey").is_none() {
        return unauthorized();
    }
    assert_eq!(query.get("user_id").map(String::as_str), Some("eq.user-1"));
    assert_eq!(query.get("select").map(String::as_str), Some("credits_balance"));

    let balance = *platform.balance.lock().unwrap();
    (StatusCode::OK, Json(json!({ "credits_balance": balance })))
}

async fn write_wallet(
    State(platform): State<Platform>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    if bearer(&headers) != Some(ACCESS_TOKEN) {
        return StatusCode::UNAUTHORIZED;
    }
    if *platform.fail_wallet.lock().unwrap() {
        return StatusCode::INTERNAL_SERVER_ERROR;
    }
    *platform.balance.lock().unwrap() = body["credits_balance"].as_i64();
    platform.wallet_writes.lock().unwrap().push(body);
    StatusCode::NO_CONTENT
}

async fn list_workbenches(
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> (StatusCode, Json<Value>) {
    if bearer(&headers).is_none() {
        return unauthorized();
    }
    let company = query.get("company_id").cloned().unwrap_or_default();
    if company == SLOW_COMPANY {
        tokio::time::sleep(Duration::from_millis(300)).await;
        return (
            StatusCode::OK,
            Json(json!([workbench_json("wb-slow", "Slow", &company)])),
        );
    }
    (
        StatusCode::OK,
        Json(json!([
            workbench_json("wb-1", "Revenue", &company),
            workbench_json("wb-2", "Churn", &company)
        ])),
    )
}

async fn get_workbench(Path(id): Path<String>) -> impl IntoResponse {
    if id == "wb-1" {
        return (StatusCode::OK, Json(workbench_json("wb-1", "Revenue", "co-1")));
    }
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "detail": "Workbench not found" })),
    )
}

async fn workbench_status(Path(_id): Path<String>) -> Json<Value> {
    Json(json!({
        "status": "processing",
        "total_files": 3,
        "indexed_files": 1,
        "failed_files": 0,
        "errors": []
    }))
}

async fn create_session(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "session_id": "s-1",
        "user_id": "user-1",
        "workbench_id": body["workbench_id"],
        "title": body["title"].as_str().unwrap_or("New Chat"),
        "created_at": "2024-05-01T10:00:00+00:00"
    }))
}

async fn list_sessions() -> Json<Value> {
    Json(json!([{
        "session_id": "s-1",
        "title": "New Chat",
        "workbench_id": "wb-1",
        "created_at": "2024-05-01T10:00:00+00:00"
    }]))
}

async fn send_message(
    State(platform): State<Platform>,
    Path(session_id): Path<String>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if session_id != "s-1" {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "detail": "Chat session not found" })),
        );
    }
    platform.sent_messages.lock().unwrap().push(body.clone());
    (
        StatusCode::OK,
        Json(json!({
            "message": format!("You asked: {}", body["content"].as_str().unwrap_or_default()),
            "context_chunks": [],
            "usage_info": { "total_tokens": 42 }
        })),
    )
}

async fn list_messages(Path(session_id): Path<String>) -> Json<Value> {
    Json(json!([{
        "message_id": "m-1",
        "session_id": session_id,
        "sender_id": "user-1",
        "message_type": "user",
        "content": "hello",
        "metadata": {},
        "created_at": "2024-05-01T10:00:00+00:00"
    }]))
}

/// Start the fake platform and return settings pointing both the backend
/// and the identity service at it.
pub async fn spawn_platform(balance: Option<i64>) -> (Settings, Platform) {
    let platform = Platform {
        balance: Arc::new(Mutex::new(balance)),
        wallet_writes: Arc::default(),
        sent_messages: Arc::default(),
        fail_wallet: Arc::default(),
    };

    let router = Router::new()
        .route("/auth/v1/token", post(token))
        .route("/rest/v1/wallet", get(read_wallet).patch(write_wallet))
        .route("/api/workbenches", get(list_workbenches))
        .route("/api/workbenches/{id}", get(get_workbench))
        .route("/api/workbenches/{id}/status", get(workbench_status))
        .route("/api/chat/sessions", post(create_session).get(list_sessions))
        .route(
            "/api/chat/sessions/{id}/messages",
            post(send_message).get(list_messages),
        )
        .with_state(platform.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let settings = Settings {
        backend_url: format!("http://{addr}"),
        auth_url: format!("http://{addr}"),
        auth_anon_key: "anon-key".to_string(),
        email_redirect_to: None,
    };
    (settings, platform)
}
