use std::sync::Arc;

use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

use crm_core::config::BackendConfig;
use crm_core::create_app;
use crm_core::events::{init_event_bus, start_audit_listener};
use crm_core::ServiceRegistry;

fn test_app() -> (Router, Arc<ServiceRegistry>) {
    std::env::set_var("JWT_SECRET", "test-secret");

    let registry = Arc::new(ServiceRegistry::new(BackendConfig::default()));
    let (event_bus, audit_rx) = init_event_bus();
    tokio::spawn(start_audit_listener(audit_rx, registry.audit()));

    let app = create_app(Arc::clone(&registry), event_bus).expect("app construction");
    (app, registry)
}

async fn json_body(resp: Response) -> Result<serde_json::Value> {
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
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
    let auth = json_body(resp).await?;
    auth.get("token")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .context("missing token")
}

fn get(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .expect("request")
}

fn send_json(method: &str, uri: &str, token: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn health_needs_no_auth() -> Result<()> {
    let (app, _) = test_app();

    let resp = app
        .oneshot(Request::builder().uri("/health").body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let health = json_body(resp).await?;
    assert_eq!(health["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn invalid_credentials_are_rejected() -> Result<()> {
    let (app, _) = test_app();

    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": "admin@example.com", "password": "wrong" }).to_string(),
        ))?;

    let resp = app.oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_bearer_token() -> Result<()> {
    let (app, _) = test_app();

    let resp = app
        .oneshot(Request::builder().uri("/customers").body(Body::empty())?)
        .await?;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn me_returns_the_session_principal() -> Result<()> {
    let (app, _) = test_app();
    let token = login(&app, "admin@example.com").await?;

    let resp = app.clone().oneshot(get("/auth/me", &token)).await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let me = json_body(resp).await?;
    assert_eq!(me["email"], "admin@example.com");
    assert_eq!(me["role"], "admin");
    Ok(())
}

#[tokio::test]
async fn customer_crud_flow() -> Result<()> {
    let (app, _) = test_app();
    let token = login(&app, "admin@example.com").await?;

    // seeded list is non-empty
    let resp = app.clone().oneshot(get("/customers", &token)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let listed = json_body(resp).await?;
    let seeded_count = listed.as_array().context("array")?.len();
    assert!(seeded_count > 0);

    // create
    let resp = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/customers",
            &token,
            json!({
                "name": "Umbrella Corp",
                "email": "info@umbrella.example",
                "industry": "pharma"
            }),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created = json_body(resp).await?;
    assert_eq!(created["status"], "prospect");
    let id = created["id"].as_str().context("id")?.to_string();

    // read back
    let resp = app
        .clone()
        .oneshot(get(&format!("/customers/{id}"), &token))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // update
    let resp = app
        .clone()
        .oneshot(send_json(
            "PUT",
            &format!("/customers/{id}"),
            &token,
            json!({ "status": "active" }),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = json_body(resp).await?;
    assert_eq!(updated["status"], "active");
    assert_eq!(updated["name"], "Umbrella Corp");

    // delete
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/customers/{id}"))
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .clone()
        .oneshot(get(&format!("/customers/{id}"), &token))
        .await?;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn customer_search_and_export() -> Result<()> {
    let (app, _) = test_app();
    let token = login(&app, "admin@example.com").await?;

    let resp = app
        .clone()
        .oneshot(get("/customers?search=acme", &token))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let hits = json_body(resp).await?;
    for customer in hits.as_array().context("array")? {
        let name = customer["name"].as_str().unwrap_or_default().to_lowercase();
        let email = customer["email"].as_str().unwrap_or_default().to_lowercase();
        assert!(name.contains("acme") || email.contains("acme"));
    }

    let resp = app.clone().oneshot(get("/customers/export", &token)).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let export = json_body(resp).await?;
    assert!(export["count"].as_u64().context("count")? > 0);
    assert!(export["csv"]
        .as_str()
        .context("csv")?
        .starts_with("id,name,email"));

    let resp = app
        .clone()
        .oneshot(get("/customers/industries", &token))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn bulk_delete_reports_only_existing_rows() -> Result<()> {
    let (app, _) = test_app();
    let token = login(&app, "admin@example.com").await?;

    let resp = app.clone().oneshot(get("/customers", &token)).await?;
    let listed = json_body(resp).await?;
    let first_id = listed[0]["id"].as_str().context("id")?.to_string();

    let resp = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/customers/bulk-delete",
            &token,
            json!({ "ids": [first_id, "00000000-0000-0000-0000-00000000dead"] }),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let outcome = json_body(resp).await?;
    assert_eq!(outcome["deleted"], 1);
    Ok(())
}

#[tokio::test]
async fn ticket_lifecycle_with_assignment() -> Result<()> {
    let (app, _) = test_app();
    let token = login(&app, "agent@example.com").await?;

    let resp = app.clone().oneshot(get("/customers", &token)).await?;
    let customers = json_body(resp).await?;
    let customer_id = customers[0]["id"].as_str().context("customer id")?.to_string();

    let resp = app
        .clone()
        .oneshot(send_json(
            "POST",
            "/tickets",
            &token,
            json!({
                "customer_id": customer_id,
                "subject": "Cannot log in",
                "priority": "high"
            }),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let ticket = json_body(resp).await?;
    assert_eq!(ticket["status"], "open");
    let ticket_id = ticket["id"].as_str().context("ticket id")?.to_string();

    let resp = app
        .clone()
        .oneshot(send_json(
            "POST",
            &format!("/tickets/{ticket_id}/assign"),
            &token,
            json!({ "assignee_id": "30000000-0000-0000-0000-000000000003" }),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let assigned = json_body(resp).await?;
    assert_eq!(assigned["status"], "in_progress");
    assert_eq!(
        assigned["assignee_id"],
        "30000000-0000-0000-0000-000000000003"
    );
    Ok(())
}
