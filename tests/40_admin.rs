mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};

use common::{create_todo, list_todos, request, send, signup, test_app};

#[tokio::test]
async fn admin_routes_are_role_gated() -> Result<()> {
    let app = test_app();
    let alice = signup(&app, "alice", None).await?;
    let todo = create_todo(&app, &alice, "keep me").await?;

    let uri = format!("/admin/todos?id={}", todo["id"]);
    let (status, body) = send(&app, request(Method::DELETE, &uri, Some(&alice))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Forbidden: Admins only");

    let (status, _) = send(&app, request(Method::GET, "/admin/getallusers", Some(&alice))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Authentication comes before the role gate.
    let (status, _) = send(&app, request(Method::GET, "/admin/getallusers", None)).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    assert_eq!(list_todos(&app, &alice, "/todos").await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn admin_deletes_any_todo() -> Result<()> {
    let app = test_app();
    let alice = signup(&app, "alice", None).await?;
    let admin = signup(&app, "admin", Some("admin")).await?;
    let todo = create_todo(&app, &alice, "buy milk").await?;

    let uri = format!("/admin/todos?id={}", todo["id"]);
    let (status, body) = send(&app, request(Method::DELETE, &uri, Some(&admin))).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    assert!(list_todos(&app, &alice, "/todos").await?.is_empty());

    // Already gone: still answered with 200.
    let (status, _) = send(&app, request(Method::DELETE, &uri, Some(&admin))).await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, request(Method::DELETE, "/admin/todos", Some(&admin))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn admin_lists_users_without_secrets() -> Result<()> {
    let app = test_app();
    signup(&app, "alice", None).await?;
    let admin = signup(&app, "admin", Some("admin")).await?;

    let (status, body) = send(&app, request(Method::GET, "/admin/getallusers", Some(&admin))).await?;
    assert_eq!(status, StatusCode::OK);

    let users = body.as_array().cloned().unwrap_or_default();
    assert_eq!(users.len(), 2);
    for user in &users {
        let fields = user.as_object().expect("user object");
        let mut keys: Vec<&str> = fields.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["id", "role", "username"]);
    }
    assert_eq!(users[0]["username"], "alice");
    assert_eq!(users[1]["role"], "admin");
    Ok(())
}
