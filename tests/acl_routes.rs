use anyhow::Result;
use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

mod common;

use common::TestApp;

const MAINTENANCE: &str = "Maintenance: Server is undergoing service upgrade. Please return later";

fn airline() -> Value {
    json!({ "code": "pr", "name": "Philippine Airlines", "country": "Philippines" })
}

#[tokio::test]
async fn missing_or_bad_token_is_rejected() -> Result<()> {
    let app = TestApp::new().await?;

    let (status, _) = app.call(Method::GET, "/airlines", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = app.call(Method::GET, "/airlines", Some("not-a-jwt"), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized request");
    Ok(())
}

#[tokio::test]
async fn customer_reads_but_cannot_write_catalogue() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.token_for("grace@example.com", "customer").await?;

    let (status, body) = app.call(Method::GET, "/airlines", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"], json!([]));

    let (status, body) = app.call(Method::POST, "/airlines", Some(&token), Some(airline())).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized request");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(1) FROM airlines").fetch_one(&app.pool).await?;
    assert_eq!(count, 0);
    Ok(())
}

#[tokio::test]
async fn privileged_roles_write_without_grants() -> Result<()> {
    let app = TestApp::new().await?;

    for (email, role) in [("root@example.com", "sup_admin"), ("ops@example.com", "sys_admin")] {
        let token = app.token_for(email, role).await?;
        let code = if role == "sup_admin" { "pr" } else { "5j" };

        let (status, body) = app
            .call(Method::POST, "/airlines", Some(&token), Some(json!({ "code": code, "name": role })))
            .await?;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        assert_eq!(body["data"]["code"], code.to_uppercase());
    }
    Ok(())
}

#[tokio::test]
async fn maintenance_blocks_customers_not_admins() -> Result<()> {
    let app = TestApp::new().await?;
    let customer = app.token_for("grace@example.com", "customer").await?;
    let admin = app.token_for("root@example.com", "sup_admin").await?;
    app.set_maintenance(true).await?;

    let (status, body) = app.call(Method::GET, "/packages", Some(&customer), None).await?;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], MAINTENANCE);

    let (status, _) = app.call(Method::GET, "/packages", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);

    app.set_maintenance(false).await?;
    let (status, _) = app.call(Method::GET, "/packages", Some(&customer), None).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn withdrawn_resource_is_unavailable() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.token_for("grace@example.com", "customer").await?;
    app.set_resource_deleted("cart", true).await?;

    let (status, body) = app.call(Method::GET, "/cart", Some(&token), None).await?;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "Service unavailable");
    Ok(())
}

#[tokio::test]
async fn disabled_grant_is_unauthorized() -> Result<()> {
    let app = TestApp::new().await?;
    let token = app.token_for("grace@example.com", "customer").await?;
    app.set_grant_disabled("customer", "cart", "r", true).await?;

    let (status, body) = app.call(Method::GET, "/cart", Some(&token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Unauthorized request");

    // the write grant on the same resource is unaffected
    let (status, _) = app
        .call(Method::DELETE, "/cart/999", Some(&token), None)
        .await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn role_without_any_grant_is_unauthorized() -> Result<()> {
    let app = TestApp::new().await?;
    sqlx::query("INSERT INTO role (code, name) VALUES ('auditor', 'Auditor')")
        .execute(&app.pool)
        .await?;
    sqlx::query(
        "INSERT INTO permission (role_id, resource_id, mode) \
         SELECT r.id, s.id, 'r' FROM role r, resource s WHERE r.code = 'auditor' AND s.code = 'user_account'",
    )
    .execute(&app.pool)
    .await?;
    let token = app.token_for("audit@example.com", "auditor").await?;

    let (status, _) = app.call(Method::GET, "/airlines", Some(&token), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
