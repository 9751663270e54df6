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

fn test_app() -> (Router, Arc<ServiceRegistry>) {
    std::env::set_var("JWT_SECRET", "test-secret");

    let registry = Arc::new(ServiceRegistry::new(BackendConfig::default()));
    let (event_bus, _audit_rx) = init_event_bus();
    let app = create_app(Arc::clone(&registry), event_bus).expect("app construction");
    (app, registry)
}

async fn json_body(resp: axum::response::Response) -> Result<serde_json::Value> {
    let bytes = body::to_bytes(resp.into_body(), usize::MAX).await?;
    Ok(serde_json::from_slice(&bytes)?)
}

async fn login_root(app: &Router) -> Result<String> {
    let req = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header("content-type", "application/json")
        .body(Body::from(
            json!({ "email": "root@example.com", "password": "password123" }).to_string(),
        ))?;

    let resp = app.clone().oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let auth = json_body(resp).await?;
    auth.get("token")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .context("missing token")
}

fn put_backend(token: &str, payload: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri("/admin/backend")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(payload.to_string()))
        .expect("request")
}

#[tokio::test]
async fn status_reports_every_service() -> Result<()> {
    let (app, _) = test_app();
    let token = login_root(&app).await?;

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/admin/backend")
                .header("authorization", format!("Bearer {token}"))
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let status = json_body(resp).await?;
    assert_eq!(status["global_mode"], "mock");
    let services = status["services"].as_array().context("services")?;
    assert_eq!(services.len(), 10);
    assert!(services.iter().all(|s| s["backend"] == "mock"));
    Ok(())
}

#[tokio::test]
async fn real_mode_without_base_url_degrades_to_mock() -> Result<()> {
    let (app, _) = test_app();
    let token = login_root(&app).await?;

    let resp = app
        .clone()
        .oneshot(put_backend(&token, json!({ "mode": "real" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let status = json_body(resp).await?;
    assert_eq!(status["global_mode"], "real");
    let customer = status["services"]
        .as_array()
        .context("services")?
        .iter()
        .find(|s| s["service"] == "customer")
        .context("customer entry")?
        .clone();
    assert_eq!(customer["mode"], "real");
    assert_eq!(customer["backend"], "mock");
    Ok(())
}

#[tokio::test]
async fn unknown_mode_degrades_to_mock() -> Result<()> {
    let (app, _) = test_app();
    let token = login_root(&app).await?;

    let resp = app
        .clone()
        .oneshot(put_backend(&token, json!({ "mode": "banana" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let status = json_body(resp).await?;
    assert_eq!(status["global_mode"], "mock");
    Ok(())
}

#[tokio::test]
async fn unknown_service_is_a_bad_request() -> Result<()> {
    let (app, _) = test_app();
    let token = login_root(&app).await?;

    let resp = app
        .clone()
        .oneshot(put_backend(
            &token,
            json!({ "service": "warehouse", "mode": "mock" }),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn override_is_reflected_in_status() -> Result<()> {
    let (app, registry) = test_app();
    let token = login_root(&app).await?;

    let resp = app
        .clone()
        .oneshot(put_backend(
            &token,
            json!({ "service": "customer", "mode": "real" }),
        ))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let status = json_body(resp).await?;
    let services = status["services"].as_array().context("services")?;
    let customer = services
        .iter()
        .find(|s| s["service"] == "customer")
        .context("customer entry")?;
    let sales = services
        .iter()
        .find(|s| s["service"] == "sales")
        .context("sales entry")?;
    assert_eq!(customer["mode"], "real");
    assert_eq!(sales["mode"], "mock");

    // clearing the override restores the global default
    let resp = app
        .clone()
        .oneshot(put_backend(&token, json!({ "service": "customer" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(registry.current_config().overrides.is_empty());
    Ok(())
}

#[tokio::test]
async fn mode_switch_resets_mock_state() -> Result<()> {
    let (app, registry) = test_app();
    let token = login_root(&app).await?;

    let before = registry.customers();

    let resp = app
        .clone()
        .oneshot(put_backend(&token, json!({ "mode": "mock" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    // a mode change drops the cached instance even when the mode is the
    // same value; the fresh mock starts from seeded state again
    let after = registry.customers();
    assert!(!Arc::ptr_eq(&before, &after));
    Ok(())
}

#[tokio::test]
async fn mock_only_services_never_leave_mock() -> Result<()> {
    let (app, _) = test_app();
    let token = login_root(&app).await?;

    let resp = app
        .clone()
        .oneshot(put_backend(&token, json!({ "mode": "supabase" })))
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let status = json_body(resp).await?;
    for service in status["services"].as_array().context("services")? {
        let name = service["service"].as_str().unwrap_or_default();
        if matches!(name, "auth" | "file" | "audit") {
            assert_eq!(service["backend"], "mock", "{name} must stay mock");
        }
    }
    Ok(())
}
