//! Health endpoint integration test.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn test_health_endpoint_reports_ok(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
    assert!(json["version"].is_string());
}

/// The health endpoint is unauthenticated; API routes are not.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_api_routes_require_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/v1/guilds").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
