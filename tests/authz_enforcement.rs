use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

use crm_core::config::BackendConfig;
use crm_core::create_app;
use crm_core::events::init_event_bus;
use crm_core::ServiceRegistry;

fn test_app() -> Router {
    std::env::set_var("JWT_SECRET", "test-secret");

    let registry = Arc::new(ServiceRegistry::new(BackendConfig::default()));
    let (event_bus, _audit_rx) = init_event_bus();
    create_app(registry, event_bus).expect("app construction")
}

async fn login(app: &Router, email: &str) -> Result<String> {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": email, "password": "password123" }).to_string(),
        ))?;

    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK, "login as {email} failed");
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await?;
    let auth: serde_json::Value = serde_json::from_slice(&bytes)?;
    auth.get("token")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .context("missing token")
}

fn create_customer_req(token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/customers")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(
            json!({ "name": "Hooli", "email": "info@hooli.example" }).to_string(),
        ))
        .expect("request")
}

fn create_ticket_req(token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/tickets")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(
            json!({
                "customer_id": "22222222-2222-2222-2222-222222222222",
                "subject": "Broken widget",
                "priority": "low"
            })
            .to_string(),
        ))
        .expect("request")
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

#[tokio::test]
async fn customer_role_is_read_only() -> Result<()> {
    let app = test_app();
    let token = login(&app, "customer@example.com").await?;

    let resp = app.clone().oneshot(get("/customers", &token)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(create_customer_req(&token)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    let resp = app.clone().oneshot(create_ticket_req(&token)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn agent_manages_tickets_but_not_customers() -> Result<()> {
    let app = test_app();
    let token = login(&app, "agent@example.com").await?;

    let resp = app.clone().oneshot(create_ticket_req(&token)).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app.clone().oneshot(create_customer_req(&token)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn manager_manages_customers_but_not_tickets() -> Result<()> {
    let app = test_app();
    let token = login(&app, "manager@example.com").await?;

    let resp = app.clone().oneshot(create_customer_req(&token)).await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let resp = app.clone().oneshot(create_ticket_req(&token)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn admin_sees_audit_but_not_backend_controls() -> Result<()> {
    let app = test_app();
    let token = login(&app, "admin@example.com").await?;

    let resp = app.clone().oneshot(get("/admin/audit", &token)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // platform_admin belongs to no role table; only the super admin bypass
    // grants it
    let resp = app.clone().oneshot(get("/admin/backend", &token)).await?;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn super_admin_bypasses_every_check() -> Result<()> {
    let app = test_app();
    let token = login(&app, "root@example.com").await?;

    let resp = app.clone().oneshot(get("/admin/backend", &token)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(get("/admin/audit", &token)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // writes still need a tenant; root has none, so this is a 400 rather
    // than a 403
    let resp = app.clone().oneshot(create_customer_req(&token)).await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn stale_token_without_session_is_rejected() -> Result<()> {
    let app = test_app();
    let token = login(&app, "admin@example.com").await?;

    // logout clears the session; the still-valid JWT no longer maps to one
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app.clone().oneshot(get("/customers", &token)).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
