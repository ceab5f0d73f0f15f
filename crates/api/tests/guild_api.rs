//! HTTP-level integration tests for guild and membership endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{
    auth_token, body_json, character_payload, get_auth, post_json_auth, put_json_auth,
};
use sqlx::PgPool;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Guild creation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_guild_returns_201(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/guilds",
        &token,
        serde_json::json!({"name": "Ironwood Pact"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Ironwood Pact");
    assert!(json["data"]["id"].is_number());
}

/// The founder becomes an active admin automatically.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_guild_founder_is_active_admin(pool: PgPool) {
    let founder = Uuid::new_v4();
    let token = auth_token(founder);

    let app = common::build_test_app(pool.clone());
    let created = body_json(
        post_json_auth(
            app,
            "/api/v1/guilds",
            &token,
            serde_json::json!({"name": "Founders"}),
        )
        .await,
    )
    .await;
    let guild_id = created["data"]["id"].as_i64().unwrap();

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/v1/guilds/{guild_id}/members"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let members = json["data"].as_array().unwrap();
    assert_eq!(members.len(), 1);
    assert_eq!(members[0]["user_id"], founder.to_string());
    assert_eq!(members[0]["role"], "admin");
    assert_eq!(members[0]["status"], "active");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_guild_name_returns_409(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        "/api/v1/guilds",
        &token,
        serde_json::json!({"name": "Twice"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/v1/guilds",
        &token,
        serde_json::json!({"name": "Twice"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let json = body_json(response).await;
    assert_eq!(json["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_get_nonexistent_guild_returns_404(pool: PgPool) {
    let token = auth_token(Uuid::new_v4());
    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/v1/guilds/999999", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert!(json["error"].is_string(), "Error response should have 'error' field");
    assert_eq!(json["code"], "NOT_FOUND");
}

// ---------------------------------------------------------------------------
// Join and approval flow
// ---------------------------------------------------------------------------

/// Joining creates a pending membership plus the user's first character.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_join_guild_creates_pending_membership_and_character(pool: PgPool) {
    let (guild_id, _admin) = common::seed_guild_with_admin(&pool, "Joinable").await;
    let joiner = Uuid::new_v4();
    let token = auth_token(joiner);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/join"),
        &token,
        character_payload("Fresh Recruit"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["membership"]["status"], "pending");
    assert_eq!(json["data"]["membership"]["role"], "member");
    assert_eq!(json["data"]["character"]["name"], "Fresh Recruit");
    // Skills start zero-initialized across every catalogue entry.
    assert_eq!(
        json["data"]["character"]["skills"]["gathering"]["Fishing"]["level"],
        0
    );
}

/// A pending member cannot use member-only endpoints until approved.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_pending_member_forbidden_until_approved(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Gatekept").await;
    let joiner = Uuid::new_v4();
    let joiner_token = auth_token(joiner);
    let admin_token = auth_token(admin);

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/join"),
        &joiner_token,
        character_payload("Waiting"),
    )
    .await;

    let app = common::build_test_app(pool.clone());
    let response = get_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/members"),
        &joiner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Admin approves.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/members/{joiner}/status"),
        &admin_token,
        serde_json::json!({"status": "active"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "active");

    let app = common::build_test_app(pool);
    let response = get_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/members"),
        &joiner_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_joining_twice_returns_409(pool: PgPool) {
    let (guild_id, _admin) = common::seed_guild_with_admin(&pool, "One Shot").await;
    let joiner = Uuid::new_v4();
    let token = auth_token(joiner);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/join"),
        &token,
        character_payload("First"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/join"),
        &token,
        character_payload("Second"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Role management
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_admin_cannot_change_roles(pool: PgPool) {
    let (guild_id, _admin) = common::seed_guild_with_admin(&pool, "Locked Roles").await;
    let member = common::seed_member(&pool, guild_id, "member", "active").await;
    let other = common::seed_member(&pool, guild_id, "member", "active").await;
    let member_token = auth_token(member);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/members/{other}/role"),
        &member_token,
        serde_json::json!({"role": "admin"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_admin_promotes_member(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Promotions").await;
    let member = common::seed_member(&pool, guild_id, "member", "active").await;
    let admin_token = auth_token(admin);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/members/{member}/role"),
        &admin_token,
        serde_json::json!({"role": "admin"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["role"], "admin");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_invalid_role_value_returns_400(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Bad Role").await;
    let member = common::seed_member(&pool, guild_id, "member", "active").await;
    let admin_token = auth_token(admin);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/members/{member}/role"),
        &admin_token,
        serde_json::json!({"role": "overlord"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
