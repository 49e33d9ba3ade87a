mod common;

use poem::http::StatusCode;
use sea_orm::ConnectionTrait;
use serde_json::json;

use common::{PASSWORD, bearer, create_user, setup_app, sign_in};
use visitdesk::app_data::AppData;
use visitdesk::types::db::user::Role;

#[tokio::test]
async fn test_health() {
    let (client, _app_data) = setup_app().await;

    let resp = client.get("/api/health").send().await;

    resp.assert_status_is_ok();
    let json = resp.json().await;
    let body = json.value().object();
    body.get("status").assert_string("healthy");
    body.get("database").assert_string("up");
}

#[tokio::test]
async fn test_signin_and_session() {
    let (client, app_data) = setup_app().await;
    let user = create_user(&app_data, "alice", Role::Staff).await;
    let token = sign_in(&client, "alice").await;

    let resp = client.get("/api/auth/session").header("Authorization", bearer(&token)).send().await;

    resp.assert_status_is_ok();
    let json = resp.json().await;
    let session = json.value().object();
    session.get("user_id").assert_string(&user.id);
    session.get("role").assert_string("staff");
}

#[tokio::test]
async fn test_signin_rejects_bad_credentials() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "alice", Role::Staff).await;

    let resp = client
        .post("/api/auth/signin")
        .body_json(&json!({ "username": "alice", "password": "wrong-password" }))
        .send()
        .await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    resp.json().await.value().object().get("error").assert_string("invalid_credentials");
}

#[tokio::test]
async fn test_signin_descriptor_is_public() {
    let (client, _app_data) = setup_app().await;

    let resp = client.get("/api/auth/signin").send().await;

    resp.assert_status_is_ok();
    resp.json()
        .await
        .value()
        .object()
        .get("action")
        .assert_string("http://localhost:3000/api/auth/signin");
}

#[tokio::test]
async fn test_refresh_and_signout() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "alice", Role::Staff).await;
    let resp = client
        .post("/api/auth/signin")
        .body_json(&json!({ "username": "alice", "password": PASSWORD }))
        .send()
        .await;
    let json = resp.json().await;
    let tokens = json.value().object();
    let access_token = tokens.get("access_token").string().to_string();
    let refresh_token = tokens.get("refresh_token").string().to_string();

    let resp = client
        .post("/api/auth/refresh")
        .body_json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = client
        .post("/api/auth/signout")
        .header("Authorization", bearer(&access_token))
        .body_json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = client
        .post("/api/auth/refresh")
        .body_json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    resp.json().await.value().object().get("error").assert_string("invalid_refresh_token");
}

#[tokio::test]
async fn test_users_api_is_admin_only() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "admin", Role::Admin).await;
    create_user(&app_data, "staff", Role::Staff).await;
    let staff_token = sign_in(&client, "staff").await;
    let admin_token = sign_in(&client, "admin").await;

    let resp = client.get("/api/users/list").header("Authorization", bearer(&staff_token)).send().await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let resp = client.get("/api/users/list").header("Authorization", bearer(&admin_token)).send().await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let users = json.value().array();
    users.assert_len(2);
    users.get(0).object().get("username").assert_string("admin");
    users.get(1).object().get("username").assert_string("staff");
}

#[tokio::test]
async fn test_users_api_requires_bearer() {
    let (client, _app_data) = setup_app().await;

    let resp = client.get("/api/users/list").send().await;

    resp.assert_status(StatusCode::UNAUTHORIZED);
    let json = resp.json().await;
    let body = json.value().object();
    body.get("error").assert_string("missing_token");
    body.get("status_code").assert_i64(401);
}

#[tokio::test]
async fn test_create_user_generates_password_once() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "admin", Role::Admin).await;
    let token = sign_in(&client, "admin").await;

    let resp = client
        .post("/api/users")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "username": "bob", "full_name": "Bob Smith", "role": "staff" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let password = json.value().object().get("generated_password").string().to_string();
    assert_eq!(password.chars().count(), 20);

    let resp = client
        .post("/api/auth/signin")
        .body_json(&json!({ "username": "bob", "password": password }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = client
        .post("/api/users")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "username": "bob", "full_name": "Bob Again", "role": "staff" }))
        .send()
        .await;
    resp.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let (client, app_data) = setup_app().await;
    let admin = create_user(&app_data, "admin", Role::Admin).await;
    let token = sign_in(&client, "admin").await;

    let resp = client
        .delete(format!("/api/users/{}", admin.id))
        .header("Authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = client
        .delete("/api/users/does-not-exist")
        .header("Authorization", bearer(&token))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_access_points_list_and_admin_create() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "admin", Role::Admin).await;
    create_user(&app_data, "staff", Role::Staff).await;
    let admin_token = sign_in(&client, "admin").await;
    let staff_token = sign_in(&client, "staff").await;

    let resp = client
        .post("/api/accesspoint")
        .header("Authorization", bearer(&staff_token))
        .body_json(&json!({ "name": "Lobby" }))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let resp = client
        .post("/api/accesspoint")
        .header("Authorization", bearer(&admin_token))
        .body_json(&json!({ "name": "Lobby", "location": "Building A" }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = client
        .get("/api/accesspoint/list")
        .header("Authorization", bearer(&staff_token))
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    json.value().array().assert_len(1);
    json.value().array().get(0).object().get("name").assert_string("Lobby");
}

#[tokio::test]
async fn test_qr_check_in_flow() {
    let (client, app_data) = setup_app().await;
    let host = create_user(&app_data, "host", Role::Staff).await;
    create_user(&app_data, "guard", Role::Staff).await;
    create_user(&app_data, "admin", Role::Admin).await;
    let admin_token = sign_in(&client, "admin").await;
    let guard_token = sign_in(&client, "guard").await;
    let host_token = sign_in(&client, "host").await;

    let resp = client
        .post("/api/accesspoint")
        .header("Authorization", bearer(&admin_token))
        .body_json(&json!({ "name": "Lobby" }))
        .send()
        .await;
    let access_point_id = resp.json().await.value().object().get("id").string().to_string();

    let resp = client
        .post("/api/visitors")
        .header("Authorization", bearer(&guard_token))
        .body_json(&json!({
            "full_name": "Jane Guest",
            "phone": "+1 555 0100",
            "purpose": "Interview",
            "host_user_id": host.id,
        }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let visitor = json.value().object();
    visitor.get("status").assert_string("registered");
    let visitor_id = visitor.get("id").string().to_string();

    let resp = client
        .get(format!("/api/visitors/{}/qr", visitor_id))
        .header("Authorization", bearer(&guard_token))
        .send()
        .await;
    resp.assert_status_is_ok();
    let payload = resp.json().await.value().object().get("payload").string().to_string();
    assert!(payload.starts_with("visitdesk:checkin:"));

    let resp = client
        .post("/api/visitors/checkin")
        .header("Authorization", bearer(&guard_token))
        .body_json(&json!({ "code": payload, "access_point_id": access_point_id }))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("status").assert_string("active");

    let resp = client
        .post("/api/visitors/checkin")
        .header("Authorization", bearer(&guard_token))
        .body_json(&json!({ "code": payload, "access_point_id": access_point_id }))
        .send()
        .await;
    resp.assert_status(StatusCode::CONFLICT);

    let resp = client.get("/api/dashboard/active").header("Authorization", bearer(&guard_token)).send().await;
    resp.assert_status_is_ok();
    resp.json().await.value().array().assert_len(1);

    let resp = client.get("/api/notifications/unread").header("Authorization", bearer(&host_token)).send().await;
    resp.assert_status_is_ok();
    resp.json().await.value().array().assert_len(1);

    let resp = client
        .post(format!("/api/visitors/{}/checkout", visitor_id))
        .header("Authorization", bearer(&guard_token))
        .body_json(&json!({}))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("status").assert_string("inactive");

    let resp = client.get("/api/dashboard/unactive").header("Authorization", bearer(&guard_token)).send().await;
    resp.assert_status_is_ok();
    resp.json().await.value().array().assert_len(1);

    let resp = client.get("/api/notifications/unread").header("Authorization", bearer(&host_token)).send().await;
    let json = resp.json().await;
    let unread = json.value().array();
    unread.assert_len(2);
    unread.get(0).object().get("message").assert_string("Jane Guest checked out");
    unread.get(1).object().get("message").assert_string("Jane Guest checked in at Lobby");

    let resp = client
        .get(format!("/api/visitors/{}/logs", visitor_id))
        .header("Authorization", bearer(&guard_token))
        .send()
        .await;
    let json = resp.json().await;
    let logs = json.value().array();
    logs.assert_len(2);
    logs.get(0).object().get("event").assert_string("check_in");
    logs.get(1).object().get("event").assert_string("check_out");
}

#[tokio::test]
async fn test_tampered_checkin_code_rejected() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "guard", Role::Staff).await;
    let token = sign_in(&client, "guard").await;

    let resp = client
        .post("/api/visitors/checkin")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "code": "visitdesk:checkin:someone.deadbeef", "access_point_id": "x" }))
        .send()
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.json().await.value().object().get("error").assert_string("invalid_checkin_code");
}

#[tokio::test]
async fn test_register_visitor_rejects_blank_fields() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "guard", Role::Staff).await;
    let token = sign_in(&client, "guard").await;

    let resp = client
        .post("/api/visitors")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "full_name": "Jane", "phone": " ", "purpose": "Visit" }))
        .send()
        .await;

    resp.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_database_failure_returns_fixed_message() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "alice", Role::Staff).await;
    let token = sign_in(&client, "alice").await;
    app_data
        .db
        .execute_unprepared("DROP TABLE notifications")
        .await
        .unwrap();

    let resp = client.get("/api/notifications/unread").header("Authorization", bearer(&token)).send().await;

    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let json = resp.json().await;
    let body = json.value().object();
    body.get("error").assert_string("internal_error");
    body.get("message").assert_string("Failed to fetch notifications");
}

#[tokio::test]
async fn test_access_point_list_failure_returns_fixed_message() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "alice", Role::Staff).await;
    let token = sign_in(&client, "alice").await;
    app_data
        .db
        .execute_unprepared("DROP TABLE access_points")
        .await
        .unwrap();

    let resp = client.get("/api/accesspoint/list").header("Authorization", bearer(&token)).send().await;

    resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    resp.json()
        .await
        .value()
        .object()
        .get("message")
        .assert_string("Failed to fetch access points");
}

/// Drop a table behind the running app so the next query on it fails
async fn drop_table(app_data: &AppData, table: &str) {
    app_data
        .db
        .execute_unprepared("PRAGMA foreign_keys = OFF")
        .await
        .unwrap();
    app_data
        .db
        .execute_unprepared(&format!("DROP TABLE {}", table))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_fixed_failure_messages() {
    let cases = [
        ("/api/dashboard/active", "visitors", "Failed to fetch active visitors"),
        ("/api/dashboard/unactive", "visitors", "Failed to fetch unactive visitors"),
        ("/api/dashboard/summary", "visitors", "Failed to fetch dashboard summary"),
        ("/api/users/list", "users", "Failed to fetch users"),
    ];

    for (path, table, message) in cases {
        let (client, app_data) = setup_app().await;
        create_user(&app_data, "admin", Role::Admin).await;
        let token = sign_in(&client, "admin").await;
        drop_table(&app_data, table).await;

        let resp = client.get(path).header("Authorization", bearer(&token)).send().await;

        resp.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let json = resp.json().await;
        let body = json.value().object();
        body.get("error").assert_string("internal_error");
        body.get("message").assert_string(message);
    }
}

#[tokio::test]
async fn test_dashboard_summary_counts() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "guard", Role::Staff).await;
    let token = sign_in(&client, "guard").await;
    let lobby = app_data
        .access_point_store
        .create_access_point(&app_data.db, "Lobby", None)
        .await
        .unwrap();

    let mut visitor_ids = Vec::new();
    for name in ["Jane Guest", "Sam Guest"] {
        let resp = client
            .post("/api/visitors")
            .header("Authorization", bearer(&token))
            .body_json(&json!({ "full_name": name, "phone": "+1 555 0100", "purpose": "Visit" }))
            .send()
            .await;
        visitor_ids.push(resp.json().await.value().object().get("id").string().to_string());
    }
    let code = app_data.checkin_codes.code_for(&visitor_ids[0]).unwrap();
    let resp = client
        .post("/api/visitors/checkin")
        .header("Authorization", bearer(&token))
        .body_json(&json!({ "code": code, "access_point_id": lobby.id }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = client.get("/api/dashboard/summary").header("Authorization", bearer(&token)).send().await;

    resp.assert_status_is_ok();
    let json = resp.json().await;
    let summary = json.value().object();
    summary.get("registered").assert_i64(1);
    summary.get("active").assert_i64(1);
    summary.get("inactive").assert_i64(0);
    summary.get("checked_in_today").assert_i64(1);
}

#[tokio::test]
async fn test_mark_notifications_read() {
    let (client, app_data) = setup_app().await;
    let alice = create_user(&app_data, "alice", Role::Staff).await;
    create_user(&app_data, "bob", Role::Staff).await;
    let alice_token = sign_in(&client, "alice").await;
    let bob_token = sign_in(&client, "bob").await;
    let mut ids = Vec::new();
    for message in ["Jane Guest checked in at Lobby", "Sam Guest checked in at Lobby", "Jane Guest checked out"] {
        let note = app_data
            .notification_store
            .create_notification(&app_data.db, &alice.id, message.to_string(), None)
            .await
            .unwrap();
        ids.push(note.id);
    }

    let resp = client
        .post(format!("/api/notifications/{}/read", ids[0]))
        .header("Authorization", bearer(&bob_token))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
    resp.json().await.value().object().get("error").assert_string("notification_not_found");

    let resp = client
        .post(format!("/api/notifications/{}/read", ids[0]))
        .header("Authorization", bearer(&alice_token))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = client.get("/api/notifications/unread").header("Authorization", bearer(&alice_token)).send().await;
    resp.json().await.value().array().assert_len(2);

    let resp = client
        .post("/api/notifications/read-all")
        .header("Authorization", bearer(&alice_token))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("updated").assert_i64(2);

    let resp = client.get("/api/notifications/unread").header("Authorization", bearer(&alice_token)).send().await;
    resp.json().await.value().array().assert_len(0);
}

#[tokio::test]
async fn test_change_password_rotates_tokens() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "alice", Role::Staff).await;
    let resp = client
        .post("/api/auth/signin")
        .body_json(&json!({ "username": "alice", "password": PASSWORD }))
        .send()
        .await;
    let json = resp.json().await;
    let access_token = json.value().object().get("access_token").string().to_string();
    let refresh_token = json.value().object().get("refresh_token").string().to_string();

    let resp = client
        .post("/api/auth/password")
        .header("Authorization", bearer(&access_token))
        .body_json(&json!({ "old_password": "not-my-password", "new_password": "a-brand-new-password" }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    resp.json().await.value().object().get("error").assert_string("incorrect_password");

    let resp = client
        .post("/api/auth/password")
        .header("Authorization", bearer(&access_token))
        .body_json(&json!({ "old_password": PASSWORD, "new_password": "a-brand-new-password" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let json = resp.json().await;
    let new_refresh_token = json.value().object().get("refresh_token").string().to_string();

    let resp = client
        .post("/api/auth/refresh")
        .body_json(&json!({ "refresh_token": refresh_token }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);

    let resp = client
        .post("/api/auth/refresh")
        .body_json(&json!({ "refresh_token": new_refresh_token }))
        .send()
        .await;
    resp.assert_status_is_ok();

    let resp = client
        .post("/api/auth/signin")
        .body_json(&json!({ "username": "alice", "password": "a-brand-new-password" }))
        .send()
        .await;
    resp.assert_status_is_ok();
}

#[tokio::test]
async fn test_update_user_role() {
    let (client, app_data) = setup_app().await;
    let admin = create_user(&app_data, "admin", Role::Admin).await;
    let staff = create_user(&app_data, "staff", Role::Staff).await;
    let admin_token = sign_in(&client, "admin").await;
    let staff_token = sign_in(&client, "staff").await;

    let resp = client
        .put(format!("/api/users/{}/role", admin.id))
        .header("Authorization", bearer(&staff_token))
        .body_json(&json!({ "role": "staff" }))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let resp = client
        .put(format!("/api/users/{}/role", admin.id))
        .header("Authorization", bearer(&admin_token))
        .body_json(&json!({ "role": "staff" }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    resp.json().await.value().object().get("error").assert_string("self_modification_denied");

    let resp = client
        .put(format!("/api/users/{}/role", staff.id))
        .header("Authorization", bearer(&admin_token))
        .body_json(&json!({ "role": "admin" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("role").assert_string("admin");

    let resp = client
        .put("/api/users/does-not-exist/role")
        .header("Authorization", bearer(&admin_token))
        .body_json(&json!({ "role": "admin" }))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_access_point_status() {
    let (client, app_data) = setup_app().await;
    create_user(&app_data, "admin", Role::Admin).await;
    create_user(&app_data, "staff", Role::Staff).await;
    let admin_token = sign_in(&client, "admin").await;
    let staff_token = sign_in(&client, "staff").await;
    let lobby = app_data
        .access_point_store
        .create_access_point(&app_data.db, "Lobby", None)
        .await
        .unwrap();

    let resp = client
        .put(format!("/api/accesspoint/{}/status", lobby.id))
        .header("Authorization", bearer(&staff_token))
        .body_json(&json!({ "is_active": false }))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);

    let resp = client
        .put(format!("/api/accesspoint/{}/status", lobby.id))
        .header("Authorization", bearer(&admin_token))
        .body_json(&json!({ "is_active": false }))
        .send()
        .await;
    resp.assert_status_is_ok();
    resp.json().await.value().object().get("is_active").assert_bool(false);

    let resp = client
        .put("/api/accesspoint/does-not-exist/status")
        .header("Authorization", bearer(&admin_token))
        .body_json(&json!({ "is_active": true }))
        .send()
        .await;
    resp.assert_status(StatusCode::NOT_FOUND);
}
