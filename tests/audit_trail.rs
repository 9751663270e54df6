use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::{self, Body};
use axum::http::{Request, StatusCode};
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

async fn json_body(resp: axum::response::Response) -> Result<serde_json::Value> {
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
    assert_eq!(resp.status(), StatusCode::OK);
    let auth = json_body(resp).await?;
    auth.get("token")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .context("missing token")
}

#[tokio::test]
async fn mutations_land_in_the_audit_trail() -> Result<()> {
    let (app, _) = test_app();
    let token = login(&app, "admin@example.com").await?;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/customers")
                .header("content-type", "application/json")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::from(
                    json!({ "name": "Stark Industries", "email": "tony@stark.example" })
                        .to_string(),
                ))?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::CREATED);

    // the listener records asynchronously; poll until the entry shows up
    let mut found = None;
    for _ in 0..25 {
        tokio::time::sleep(Duration::from_millis(100)).await;

        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin/audit")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::empty())?,
            )
            .await?;
        assert_eq!(resp.status(), StatusCode::OK);
        let entries = json_body(resp).await?;

        if let Some(entry) = entries
            .as_array()
            .context("entries")?
            .iter()
            .find(|e| e["event_name"] == "customer.created")
        {
            found = Some(entry.clone());
            break;
        }
    }

    let entry = found.context("customer.created never reached the audit trail")?;
    assert!(entry["hash"].as_str().context("hash")?.len() == 64);
    assert_eq!(entry["payload"]["name"], "Stark Industries");
    Ok(())
}

#[tokio::test]
async fn chain_verifies_after_a_burst_of_events() -> Result<()> {
    let (app, _) = test_app();
    let token = login(&app, "admin@example.com").await?;

    for i in 0..5 {
        let resp = app
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/customers")
                    .header("content-type", "application/json")
                    .header("authorization", format!("Bearer {token}"))
                    .body(Body::from(
                        json!({
                            "name": format!("Customer {i}"),
                            "email": format!("c{i}@example.com")
                        })
                        .to_string(),
                    ))?,
            )
            .await?;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // let the listener drain the bus
    tokio::time::sleep(Duration::from_millis(500)).await;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/audit/verify")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let verification = json_body(resp).await?;
    assert_eq!(verification["intact"], true);
    Ok(())
}
