mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;

use todo_api::auth::{Role, TokenService, TOKEN_TTL_MINUTES};

use common::{json_request, request, send, test_app, SECRET};

#[tokio::test]
async fn root_and_health_respond() -> Result<()> {
    let app = test_app();

    let (status, body) = send(&app, request(Method::GET, "/", None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body.as_str().unwrap_or_default().contains("Todo API"));

    let (status, body) = send(&app, request(Method::GET, "/health", None)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn login_token_carries_stored_identity() -> Result<()> {
    let app = test_app();
    let alice = common::signup(&app, "alice", None).await?;
    let root = common::signup(&app, "root", Some("admin")).await?;

    let tokens = TokenService::new(SECRET);
    let alice_claims = tokens.verify(&alice)?;
    let root_claims = tokens.verify(&root)?;
    assert_eq!(alice_claims.role, Role::User);
    assert_eq!(root_claims.role, Role::Admin);
    assert_eq!(alice_claims.exp - alice_claims.iat, TOKEN_TTL_MINUTES * 60);

    // Ids in the tokens match the stored rows.
    let (status, users) = send(&app, request(Method::GET, "/admin/getallusers", Some(&root))).await?;
    assert_eq!(status, StatusCode::OK);
    let users = users.as_array().cloned().unwrap_or_default();
    let stored_alice = users.iter().find(|u| u["username"] == "alice").expect("alice stored");
    assert_eq!(stored_alice["id"], alice_claims.user_id);
    assert_eq!(stored_alice["role"], "user");
    Ok(())
}

#[tokio::test]
async fn register_validates_input() -> Result<()> {
    let app = test_app();

    assert_eq!(common::register(&app, "alice", "pw1", None).await?, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        json_request(Method::POST, "/register", None, &json!({ "username": "alice", "password": "other" })),
    )
    .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Username already taken");

    assert_eq!(common::register(&app, "", "pw1", None).await?, StatusCode::BAD_REQUEST);
    assert_eq!(common::register(&app, "bob", "", None).await?, StatusCode::BAD_REQUEST);
    assert_eq!(common::register(&app, "bob", "pw1", Some("root")).await?, StatusCode::BAD_REQUEST);

    let malformed = Request::builder()
        .method(Method::POST)
        .uri("/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let (status, body) = send(&app, malformed).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_JSON");
    Ok(())
}

#[tokio::test]
async fn register_response_has_message() -> Result<()> {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request(Method::POST, "/register", None, &json!({ "username": "alice", "password": "pw1" })),
    )
    .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["message"].is_string());
    Ok(())
}

#[tokio::test]
async fn bad_credentials_are_indistinguishable() -> Result<()> {
    let app = test_app();
    common::register(&app, "alice", "pw1", None).await?;

    let (wrong_status, wrong_body) = send(
        &app,
        json_request(Method::POST, "/login", None, &json!({ "username": "alice", "password": "nope" })),
    )
    .await?;
    let (unknown_status, unknown_body) = send(
        &app,
        json_request(Method::POST, "/login", None, &json!({ "username": "mallory", "password": "pw1" })),
    )
    .await?;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body, unknown_body);

    let (status, _) = send(&app, json_request(Method::POST, "/login", None, &json!({ "username": "alice" }))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_bearer_token() -> Result<()> {
    let app = test_app();
    let token = common::signup(&app, "alice", None).await?;

    let (status, _) = send(&app, request(Method::GET, "/todos", None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let basic = format!("Basic {}", token);
    for value in ["Bearer garbage", "Bearer ", token.as_str(), basic.as_str()] {
        let req = Request::builder()
            .uri("/todos")
            .header(header::AUTHORIZATION, value)
            .body(Body::empty())?;
        let (status, body) = send(&app, req).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {:?}", value);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    let (status, _) = send(&app, request(Method::GET, "/todos", Some(&token))).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn expired_and_foreign_tokens_are_rejected() -> Result<()> {
    let app = test_app();
    let token = common::signup(&app, "alice", None).await?;
    let user_id = common::user_id_of(&token);

    let stale = TokenService::new(SECRET).issue_at(
        user_id,
        Role::User,
        Utc::now() - Duration::minutes(TOKEN_TTL_MINUTES + 5),
    )?;
    let (status, expired_body) = send(&app, request(Method::GET, "/todos", Some(&stale))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let foreign = TokenService::new(b"someone-elses-secret").issue(user_id, Role::Admin)?;
    let (status, foreign_body) = send(&app, request(Method::GET, "/todos", Some(&foreign))).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Failure reason is not revealed.
    assert_eq!(expired_body, foreign_body);
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_404() -> Result<()> {
    let app = test_app();
    let (status, body) = send(&app, request(Method::GET, "/nope", None)).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}

#[tokio::test]
async fn empty_role_registers_as_user() -> Result<()> {
    let app = test_app();

    assert_eq!(common::register(&app, "alice", "pw1", Some("")).await?, StatusCode::CREATED);

    let token = common::login(&app, "alice", "pw1").await?;
    assert_eq!(TokenService::new(SECRET).verify(&token)?.role, Role::User);
    Ok(())
}

#[tokio::test]
async fn usernames_are_stored_trimmed() -> Result<()> {
    let app = test_app();

    assert_eq!(common::register(&app, " alice ", "pw1", None).await?, StatusCode::CREATED);
    assert_eq!(common::register(&app, "alice", "pw2", None).await?, StatusCode::BAD_REQUEST);

    common::login(&app, "alice", "pw1").await?;
    common::login(&app, " alice", "pw1").await?;
    Ok(())
}
