#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method, Request, Response, StatusCode};
use axum::Router;
use sqlx::PgPool;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use uuid::Uuid;

use guildhall_api::auth::jwt::{generate_access_token, JwtConfig};
use guildhall_api::config::ServerConfig;
use guildhall_api::routes;
use guildhall_api::state::AppState;
use guildhall_core::types::DbId;
use guildhall_db::models::guild::CreateGuild;
use guildhall_db::models::membership::CreateMembership;
use guildhall_db::repositories::{GuildRepo, InventoryRepo, MembershipRepo};

/// Signing secret shared by [`test_config`] and [`auth_token`].
const TEST_JWT_SECRET: &str = "integration-test-secret-not-for-production";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        db_acquire_timeout_secs: 3,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router with all middleware layers, using the
/// given database pool.
///
/// This mirrors the router construction in `main.rs` so integration tests
/// exercise the same middleware stack (CORS, request ID, timeout, tracing,
/// panic recovery) that production uses.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();

    let state = AppState {
        pool,
        config: Arc::new(config),
    };

    let cors = CorsLayer::new()
        .allow_origin(["http://localhost:5173".parse().unwrap()])
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600));

    let request_id_header = HeaderName::from_static("x-request-id");

    Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(PropagateRequestIdLayer::new(request_id_header.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id_header, MakeRequestUuid))
        .layer(cors)
        .with_state(state)
}

/// Mint a valid access token for `user_id`, signed with the test secret.
pub fn auth_token(user_id: Uuid) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 60,
    };
    generate_access_token(user_id, &config).expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request should build");

    app.oneshot(request).await.expect("request should not fail")
}

/// GET without authentication (for 401 and health checks).
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

/// POST with an empty body (cancel / accept / reject endpoints).
pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// DELETE with a JSON body (inventory removal takes a quantity).
pub async fn delete_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    use http_body_util::BodyExt;

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be valid JSON")
}

// ---------------------------------------------------------------------------
// Seed helpers
// ---------------------------------------------------------------------------

/// Create a guild directly through the repository layer and return its id.
pub async fn seed_guild(pool: &PgPool, name: &str) -> DbId {
    let mut conn = pool.acquire().await.expect("pool should yield a connection");
    let guild = GuildRepo::create(
        &mut conn,
        &CreateGuild {
            name: name.to_string(),
        },
    )
    .await
    .expect("guild creation should succeed");
    guild.id
}

/// Insert a membership row with the given role and status, returning the
/// (fresh, random) user id.
pub async fn seed_member(pool: &PgPool, guild_id: DbId, role: &str, status: &str) -> Uuid {
    let user_id = Uuid::new_v4();
    let mut conn = pool.acquire().await.expect("pool should yield a connection");
    MembershipRepo::create(
        &mut conn,
        &CreateMembership {
            guild_id,
            user_id,
            role: Some(role.to_string()),
            status: Some(status.to_string()),
        },
    )
    .await
    .expect("membership creation should succeed");
    user_id
}

/// Convenience: a guild with one active admin. Returns `(guild_id, admin_id)`.
pub async fn seed_guild_with_admin(pool: &PgPool, name: &str) -> (DbId, Uuid) {
    let guild_id = seed_guild(pool, name).await;
    let admin_id = seed_member(pool, guild_id, "admin", "active").await;
    (guild_id, admin_id)
}

/// Insert an inventory line for a member, returning its row id.
pub async fn seed_inventory(
    pool: &PgPool,
    guild_id: DbId,
    user_id: Uuid,
    item_guid: &str,
    item_name: &str,
    rarity: &str,
    quantity: i64,
) -> DbId {
    let mut conn = pool.acquire().await.expect("pool should yield a connection");
    let line = InventoryRepo::upsert_add(
        &mut conn, user_id, guild_id, item_guid, item_name, rarity, quantity,
    )
    .await
    .expect("inventory seed should succeed");
    line.id
}

/// A valid character creation payload (gathering Fighter/Knight).
pub fn character_payload(name: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "character_type": "gathering",
        "primary_class": "Fighter",
        "secondary_class": "Knight",
    })
}
