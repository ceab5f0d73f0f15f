//! HTTP-level integration tests for roster and loadout endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    auth_token, body_json, character_payload, delete_auth, get_auth, post_json_auth,
    put_json_auth,
};
use sqlx::PgPool;
use uuid::Uuid;

/// Create a character through the API and return its id.
async fn create_character(pool: &PgPool, guild_id: i64, token: &str, name: &str) -> i64 {
    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/characters"),
        token,
        character_payload(name),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    json["data"]["id"].as_i64().unwrap()
}

// ---------------------------------------------------------------------------
// Creation and validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_character_returns_201_with_initial_skills(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Roster").await;
    let token = auth_token(admin);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/characters"),
        &token,
        character_payload("Bron"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "Bron");
    assert_eq!(json["data"]["status"], "active");
    assert_eq!(json["data"]["skills"]["gathering"]["Mining"]["level"], 0);
    assert_eq!(json["data"]["skills"]["gathering"]["Mining"]["rank"], "Novice");
    // The loadout starts empty.
    assert_eq!(json["data"]["equipment"], serde_json::json!({}));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_create_character_rejects_invalid_class_pairing(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Pairings").await;
    let token = auth_token(admin);

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/characters"),
        &token,
        serde_json::json!({
            "name": "Mismatch",
            "character_type": "gathering",
            "primary_class": "Fighter",
            // Paladin belongs to Cleric, not Fighter.
            "secondary_class": "Paladin",
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_non_member_cannot_create_character(pool: PgPool) {
    let (guild_id, _admin) = common::seed_guild_with_admin(&pool, "Outsiders").await;
    let stranger_token = auth_token(Uuid::new_v4());

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/v1/guilds/{guild_id}/characters"),
        &stranger_token,
        character_payload("Intruder"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_update_character_name(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Renames").await;
    let token = auth_token(admin);
    let id = create_character(&pool, guild_id, &token, "Old Name").await;

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/characters/{id}"),
        &token,
        serde_json::json!({"name": "New Name"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["data"]["name"], "New Name");
    // Untouched fields survive the partial update.
    assert_eq!(json["data"]["primary_class"], "Fighter");
}

/// Changing only the primary class must still validate against the kept
/// secondary class.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_partial_update_validates_effective_pairing(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Partial").await;
    let token = auth_token(admin);
    let id = create_character(&pool, guild_id, &token, "Knight").await;

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/characters/{id}"),
        &token,
        // Knight is not a Mage secondary.
        serde_json::json!({"primary_class": "Mage"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_member_cannot_update_anothers_character(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Not Yours").await;
    let member = common::seed_member(&pool, guild_id, "member", "active").await;
    let admin_token = auth_token(admin);
    let member_token = auth_token(member);
    let id = create_character(&pool, guild_id, &admin_token, "Admins Own").await;

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/characters/{id}"),
        &member_token,
        serde_json::json!({"name": "Stolen"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Status changes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_character_status_change_is_admin_only(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Statuses").await;
    let member = common::seed_member(&pool, guild_id, "member", "active").await;
    let admin_token = auth_token(admin);
    let member_token = auth_token(member);
    let id = create_character(&pool, guild_id, &member_token, "Benched").await;

    // Even the owner cannot change status without the admin role.
    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/characters/{id}/status"),
        &member_token,
        serde_json::json!({"status": "inactive"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/characters/{id}/status"),
        &admin_token,
        serde_json::json!({"status": "inactive"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["status"], "inactive");
}

// ---------------------------------------------------------------------------
// Deletion and the membership cascade
// ---------------------------------------------------------------------------

/// Character deletion is an admin action, even for your own roster.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_member_cannot_delete_own_character(pool: PgPool) {
    let (guild_id, _admin) = common::seed_guild_with_admin(&pool, "Hands Off").await;
    let member = common::seed_member(&pool, guild_id, "member", "active").await;
    let member_token = auth_token(member);
    let own = create_character(&pool, guild_id, &member_token, "Keeper").await;

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/v1/characters/{own}"), &member_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

/// Deleting a non-last character leaves the membership untouched.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_non_last_character_keeps_membership(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Keeps").await;
    let member = common::seed_member(&pool, guild_id, "member", "active").await;
    let member_token = auth_token(member);
    let admin_token = auth_token(admin);
    let first = create_character(&pool, guild_id, &member_token, "Main").await;
    create_character(&pool, guild_id, &member_token, "Alt").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/characters/{first}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, &format!("/api/v1/guilds/{guild_id}/members"), &admin_token).await,
    )
    .await;
    let members = json["data"].as_array().unwrap();
    assert!(
        members.iter().any(|m| m["user_id"] == member.to_string()),
        "membership must survive while other characters remain"
    );
}

/// Deleting the last character removes the guild membership too.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_delete_last_character_removes_membership(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Cascades").await;
    let member = common::seed_member(&pool, guild_id, "member", "active").await;
    let member_token = auth_token(member);
    let admin_token = auth_token(admin);
    let only = create_character(&pool, guild_id, &member_token, "Only One").await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/v1/characters/{only}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let app = common::build_test_app(pool);
    let json = body_json(
        get_auth(app, &format!("/api/v1/guilds/{guild_id}/members"), &admin_token).await,
    )
    .await;
    let members = json["data"].as_array().unwrap();
    assert!(
        members.iter().all(|m| m["user_id"] != member.to_string()),
        "membership must be removed with the last character"
    );
}

// ---------------------------------------------------------------------------
// Equipment
// ---------------------------------------------------------------------------

fn equip_payload(slot: &str, name: &str, two_handed: bool) -> serde_json::Value {
    serde_json::json!({
        "slot": slot,
        "item": {
            "item_guid": format!("guid-{name}"),
            "item_name": name,
            "rarity": "Rare",
            "isTwoHanded": two_handed,
        },
    })
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_equip_and_unequip_round_trip(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Loadouts").await;
    let token = auth_token(admin);
    let id = create_character(&pool, guild_id, &token, "Armored").await;

    let app = common::build_test_app(pool.clone());
    let response = put_json_auth(
        app,
        &format!("/api/v1/characters/{id}/equipment"),
        &token,
        equip_payload("head", "Iron Helm", false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["equipment"]["head"]["item_name"], "Iron Helm");

    let app = common::build_test_app(pool);
    let response = delete_auth(
        app,
        &format!("/api/v1/characters/{id}/equipment/head"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["equipment"]["head"].is_null());
}

/// Equipping a two-handed weapon into mainHand1 clears the paired main hand
/// and the matching off hand.
#[sqlx::test(migrations = "../db/migrations")]
async fn test_two_handed_weapon_clears_hand_slots(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Two Handed").await;
    let token = auth_token(admin);
    let id = create_character(&pool, guild_id, &token, "Duelist").await;

    for (slot, name) in [("mainHand2", "Sword"), ("offHand1", "Shield")] {
        let app = common::build_test_app(pool.clone());
        let response = put_json_auth(
            app,
            &format!("/api/v1/characters/{id}/equipment"),
            &token,
            equip_payload(slot, name, false),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/characters/{id}/equipment"),
        &token,
        equip_payload("mainHand1", "Greatsword", true),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let equipment = &json["data"]["equipment"];
    assert_eq!(equipment["mainHand1"]["item_name"], "Greatsword");
    assert!(equipment["mainHand2"].is_null());
    assert!(equipment["offHand1"].is_null());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_only_owner_can_edit_loadout(pool: PgPool) {
    let (guild_id, admin) = common::seed_guild_with_admin(&pool, "Owner Only").await;
    let member = common::seed_member(&pool, guild_id, "member", "active").await;
    let member_token = auth_token(member);
    let admin_token = auth_token(admin);
    let id = create_character(&pool, guild_id, &member_token, "Private").await;

    // Even admins cannot touch another member's loadout.
    let app = common::build_test_app(pool);
    let response = put_json_auth(
        app,
        &format!("/api/v1/characters/{id}/equipment"),
        &admin_token,
        equip_payload("head", "Crown", false),
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
