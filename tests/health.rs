use anyhow::Result;
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use serde_json::Value;
use tower::util::ServiceExt; // for `oneshot`

use fbs_api::create_app;

mod common;

use common::TestApp;

#[tokio::test]
async fn health_endpoint_reports_db_ok() -> Result<()> {
    let (pool, _dir) = common::migrated_pool().await?;

    // create app router the way the server does
    std::env::set_var("JWT_SECRET", "test-secret");
    let app = create_app(pool.clone()).await?;

    let req = Request::builder()
        .method("GET")
        .uri("/api/health")
        .body(Body::empty())?;

    let resp: Response = app.oneshot(req).await?;
    assert_eq!(resp.status(), StatusCode::OK, "health endpoint did not return 200");

    let body_bytes = body::to_bytes(resp.into_body(), 10_485_760).await?;
    let v: Value = serde_json::from_slice(&body_bytes)?;
    let db_ok = v.get("db_ok").and_then(|b| b.as_bool()).unwrap_or(false);
    assert!(db_ok, "expected db_ok: true, got: {}", v);

    Ok(())
}

#[tokio::test]
async fn root_returns_welcome() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.call(Method::GET, "/", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Welcome to FBS API");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, body) = app.call(Method::GET, "/no/such/route", None, None).await?;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Nothing to do here.");
    Ok(())
}
