#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use todo_api::auth::{PasswordHasher, TokenService};
use todo_api::database::MemoryStore;
use todo_api::{app, AppState};

pub const SECRET: &[u8] = b"integration-test-secret";

/// Router over a fresh in-memory store. bcrypt runs at its minimum cost to keep tests fast.
pub fn test_app() -> Router {
    let state = AppState::new(
        Arc::new(MemoryStore::new()),
        TokenService::new(SECRET),
        PasswordHasher::new(4),
    );
    app(state)
}

pub fn request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).expect("valid request")
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).expect("valid request")
}

/// Send one request and decode the body as JSON (`Null` when empty, a string when not JSON).
pub async fn send(app: &Router, request: Request<Body>) -> Result<(StatusCode, Value)> {
    let response = app.clone().oneshot(request).await?;
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    Ok((status, body))
}

pub async fn register(app: &Router, username: &str, password: &str, role: Option<&str>) -> Result<StatusCode> {
    let mut body = json!({ "username": username, "password": password });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    let (status, _) = send(app, json_request(Method::POST, "/register", None, &body)).await?;
    Ok(status)
}

pub async fn login(app: &Router, username: &str, password: &str) -> Result<String> {
    let body = json!({ "username": username, "password": password });
    let (status, body) = send(app, json_request(Method::POST, "/login", None, &body)).await?;
    anyhow::ensure!(status == StatusCode::OK, "login for {} failed: {} {}", username, status, body);

    body["token"]
        .as_str()
        .map(str::to_string)
        .context("login response has no token")
}

/// Register then log in, returning the bearer token.
pub async fn signup(app: &Router, username: &str, role: Option<&str>) -> Result<String> {
    let status = register(app, username, "pw1", role).await?;
    anyhow::ensure!(status == StatusCode::CREATED, "register {} failed: {}", username, status);
    login(app, username, "pw1").await
}

pub async fn create_todo(app: &Router, token: &str, title: &str) -> Result<Value> {
    let body = json!({ "title": title });
    let (status, todo) = send(app, json_request(Method::POST, "/todos/create", Some(token), &body)).await?;
    anyhow::ensure!(status == StatusCode::CREATED, "create failed: {} {}", status, todo);
    Ok(todo)
}

pub async fn list_todos(app: &Router, token: &str, uri: &str) -> Result<Vec<Value>> {
    let (status, body) = send(app, request(Method::GET, uri, Some(token))).await?;
    anyhow::ensure!(status == StatusCode::OK, "list failed: {} {}", status, body);
    body.as_array().cloned().context("listing is not an array")
}

/// User id carried by a token, as the server sees it.
pub fn user_id_of(token: &str) -> i32 {
    TokenService::new(SECRET)
        .verify(token)
        .expect("token issued by the test app")
        .user_id
}
