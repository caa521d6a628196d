//! Authorization: permission guards, authority ceilings, delegation,
//! protected principals

mod common;

use http::StatusCode;
use serde_json::json;

use common::{Session, TestApp, spawn_app};

const OPERATOR_PASSWORD: &str = "operator-pass-12";

/// Roles used by the ceiling tests: the operator's own role sits at 60,
/// one target above it, one below
struct RolePack {
    manager: i64,
    senior: i64,
    junior: i64,
}

async fn seed_roles(app: &TestApp, admin: &Session) -> RolePack {
    let manager = app
        .create_role(
            admin,
            "manager",
            60,
            &[
                "VIEW_USERS",
                "EDIT_USER",
                "BIND_ROLE",
                "VIEW_ROLES",
                "CREATE_ROLE",
            ],
        )
        .await;
    assert_eq!(manager.status, StatusCode::CREATED, "{}", manager.body);
    let senior = app.create_role(admin, "senior", 70, &["VIEW_PAGES"]).await;
    assert_eq!(senior.status, StatusCode::CREATED, "{}", senior.body);
    let junior = app.create_role(admin, "junior", 10, &["VIEW_PAGES"]).await;
    assert_eq!(junior.status, StatusCode::CREATED, "{}", junior.body);

    RolePack {
        manager: manager.id(),
        senior: senior.id(),
        junior: junior.id(),
    }
}

/// Admin-created account holding the manager role
async fn create_operator(app: &TestApp, admin: &Session, role_id: i64) -> Session {
    let res = app
        .post(
            "/api/users",
            Some(admin),
            json!({
                "username": "operator",
                "email": "operator@test.local",
                "password": OPERATOR_PASSWORD,
                "role_ids": [role_id],
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    app.login("operator@test.local", OPERATOR_PASSWORD).await
}

#[tokio::test]
async fn test_missing_permission_is_403_even_when_anonymous() {
    let app = spawn_app().await;

    // anonymous: guarded reads answer 403, not 401
    let res = app.get("/api/users", None).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 2001);
    assert_eq!(res.message(), "Forbidden: Insufficient permissions");

    // signed in without the grant: same answer
    let (member, _) = app.signup_member("erin").await;
    let res = app.get("/api/users", Some(&member)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 2001);
    assert_eq!(res.message(), "Forbidden: Insufficient permissions");
}

#[tokio::test]
async fn test_session_only_routes_are_401_when_anonymous() {
    let app = spawn_app().await;

    let res = app.get("/api/inquiry/mine", None).await;
    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.code(), 1001);
}

#[tokio::test]
async fn test_admin_sees_user_and_role_lists() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let users = app.get("/api/users", Some(&admin)).await;
    assert_eq!(users.status, StatusCode::OK);
    let list = users.body.as_array().expect("user list");
    assert!(list.iter().any(|u| u["email"] == common::ADMIN_EMAIL));

    let roles = app.get("/api/roles", Some(&admin)).await;
    assert_eq!(roles.status, StatusCode::OK);
    let list = roles.body.as_array().expect("role list");
    assert!(list.iter().any(|r| r["kind"] == "SYSTEM"));
    assert!(list.iter().any(|r| r["kind"] == "GUEST"));
}

#[tokio::test]
async fn test_role_creation_respects_level_ceiling() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    // admin ceiling is 100: at or above is rejected, below is fine
    let at_ceiling = app.create_role(&admin, "peer", 100, &["VIEW_PAGES"]).await;
    assert_eq!(at_ceiling.status, StatusCode::FORBIDDEN);
    assert_eq!(at_ceiling.code(), 2002);

    let above = app.create_role(&admin, "overlord", 150, &["VIEW_PAGES"]).await;
    assert_eq!(above.status, StatusCode::FORBIDDEN);
    assert_eq!(above.code(), 2002);

    let below = app.create_role(&admin, "deputy", 99, &["VIEW_PAGES"]).await;
    assert_eq!(below.status, StatusCode::CREATED);
    assert_eq!(below.body["kind"], "CUSTOM");
    assert_eq!(below.body["level"], 99);
}

#[tokio::test]
async fn test_role_permissions_must_exist() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let res = app
        .create_role(&admin, "typo", 10, &["VIEW_USRES"])
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), 4005);
}

#[tokio::test]
async fn test_delegation_limited_to_held_permissions() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    let roles = seed_roles(&app, &admin).await;
    let operator = create_operator(&app, &admin, roles.manager).await;

    // SEND_NEWSLETTER is not among the operator's grants
    let res = app
        .create_role(&operator, "mailroom", 10, &["VIEW_USERS", "SEND_NEWSLETTER"])
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), 2003);
    assert_eq!(res.body["details"]["permissions"], json!(["SEND_NEWSLETTER"]));

    // held and free permissions delegate fine
    let res = app
        .create_role(&operator, "helpdesk", 10, &["VIEW_USERS", "ASK_INQUIRY"])
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);

    // level ceiling applies to the operator too
    let res = app
        .create_role(&operator, "rival", 60, &["VIEW_USERS"])
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 2002);
}

#[tokio::test]
async fn test_binding_above_own_ceiling_rejected() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    let roles = seed_roles(&app, &admin).await;
    let operator = create_operator(&app, &admin, roles.manager).await;
    let (_, target_id) = app.signup_member("frank").await;

    // above the operator's level
    let res = app
        .put(
            &format!("/api/users/{target_id}/roles"),
            Some(&operator),
            json!([roles.senior]),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 2002);

    // the operator's own level is not below it either
    let res = app
        .put(
            &format!("/api/users/{target_id}/roles"),
            Some(&operator),
            json!([roles.manager]),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 2002);

    // strictly below works
    let res = app
        .put(
            &format!("/api/users/{target_id}/roles"),
            Some(&operator),
            json!([roles.junior]),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    let bound = res.body["roles"].as_array().expect("roles");
    assert!(bound.iter().any(|r| r["name"] == "junior"));
}

#[tokio::test]
async fn test_rebinding_keeps_roles_granted_by_seniors() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    let roles = seed_roles(&app, &admin).await;
    let operator = create_operator(&app, &admin, roles.manager).await;
    let (_, target_id) = app.signup_member("grace").await;

    // someone senior binds a level-70 role first
    let res = app
        .put(
            &format!("/api/users/{target_id}/roles"),
            Some(&admin),
            json!([roles.senior]),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    // the operator may keep it in the set: only additions are checked
    // against the ceiling
    let res = app
        .put(
            &format!("/api/users/{target_id}/roles"),
            Some(&operator),
            json!([roles.senior, roles.junior]),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    let names: Vec<&str> = res.body["roles"]
        .as_array()
        .expect("roles")
        .iter()
        .filter_map(|r| r["name"].as_str())
        .collect();
    assert!(names.contains(&"senior"));
    assert!(names.contains(&"junior"));
}

#[tokio::test]
async fn test_system_role_cannot_be_edited_or_deleted() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let roles = app.get("/api/roles", Some(&admin)).await;
    let system_id = roles
        .body
        .as_array()
        .expect("roles")
        .iter()
        .find(|r| r["kind"] == "SYSTEM")
        .expect("system role")["id"]
        .as_i64()
        .expect("id");

    let update = app
        .put(
            &format!("/api/roles/{system_id}"),
            Some(&admin),
            json!({ "name": "renamed" }),
        )
        .await;
    assert_eq!(update.status, StatusCode::FORBIDDEN);
    assert_eq!(update.code(), 4003);

    let delete = app
        .delete(&format!("/api/roles/{system_id}"), Some(&admin))
        .await;
    assert_eq!(delete.status, StatusCode::FORBIDDEN);
    assert_eq!(delete.code(), 4003);
}

#[tokio::test]
async fn test_guest_role_permissions_are_locked() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let roles = app.get("/api/roles", Some(&admin)).await;
    let guest = roles
        .body
        .as_array()
        .expect("roles")
        .iter()
        .find(|r| r["kind"] == "GUEST")
        .expect("guest role")
        .clone();
    let guest_id = guest["id"].as_i64().expect("id");

    // changing the permission set is refused
    let res = app
        .put(
            &format!("/api/roles/{guest_id}"),
            Some(&admin),
            json!({ "permissions": ["VIEW_USERS"] }),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 4004);

    // sending the identical set back is a no-op, not an error
    let res = app
        .put(
            &format!("/api/roles/{guest_id}"),
            Some(&admin),
            json!({ "permissions": guest["permissions"] }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    // non-permission fields stay editable
    let res = app
        .put(
            &format!("/api/roles/{guest_id}"),
            Some(&admin),
            json!({ "name": "starter" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    assert_eq!(res.body["name"], "starter");
}

#[tokio::test]
async fn test_system_user_cannot_be_deleted() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    let me = app.get("/api/auth/me", Some(&admin)).await;
    let admin_id = me.id();

    let res = app.delete(&format!("/api/users/{admin_id}"), Some(&admin)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 3004);
}

#[tokio::test]
async fn test_member_deletion_cascades_sessions() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    let (member, member_id) = app.signup_member("henry").await;

    let res = app
        .delete(&format!("/api/users/{member_id}"), Some(&admin))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    // the deleted account's session stops resolving
    let me = app.get("/api/auth/me", Some(&member)).await;
    assert_eq!(me.status, StatusCode::UNAUTHORIZED);

    let gone = app.get(&format!("/api/users/{member_id}"), Some(&admin)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.code(), 3001);
}

#[tokio::test]
async fn test_user_delete_requires_higher_authority() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    // an account that may delete users, at level 60, and a role at the
    // same level for the target
    let deleter = app
        .create_role(&admin, "deleter", 60, &["VIEW_USERS", "DELETE_USER"])
        .await;
    assert_eq!(deleter.status, StatusCode::CREATED, "{}", deleter.body);
    let equal = app.create_role(&admin, "equal", 60, &["VIEW_PAGES"]).await;
    assert_eq!(equal.status, StatusCode::CREATED, "{}", equal.body);

    let res = app
        .post(
            "/api/users",
            Some(&admin),
            json!({
                "username": "janitor",
                "email": "janitor@test.local",
                "password": OPERATOR_PASSWORD,
                "role_ids": [deleter.id()],
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    let janitor = app.login("janitor@test.local", OPERATOR_PASSWORD).await;

    // target whose highest role matches the janitor's level: refused
    let (_, peer_id) = app.signup_member("kara").await;
    let res = app
        .put(
            &format!("/api/users/{peer_id}/roles"),
            Some(&admin),
            json!([equal.id()]),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let res = app
        .delete(&format!("/api/users/{peer_id}"), Some(&janitor))
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 2002);

    // a guest-level member sits strictly below and goes through
    let (_, junior_id) = app.signup_member("lena").await;
    let res = app
        .delete(&format!("/api/users/{junior_id}"), Some(&janitor))
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);
}

#[tokio::test]
async fn test_role_delete_blocked_while_bound() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;
    let roles = seed_roles(&app, &admin).await;
    let (_, target_id) = app.signup_member("iris").await;

    let res = app
        .put(
            &format!("/api/users/{target_id}/roles"),
            Some(&admin),
            json!([roles.junior]),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let blocked = app
        .delete(&format!("/api/roles/{}", roles.junior), Some(&admin))
        .await;
    assert_eq!(blocked.status, StatusCode::CONFLICT);

    // unbind, then deletion goes through
    let res = app
        .put(
            &format!("/api/users/{target_id}/roles"),
            Some(&admin),
            json!([]),
        )
        .await;
    assert_eq!(res.status, StatusCode::OK, "{}", res.body);

    let deleted = app
        .delete(&format!("/api/roles/{}", roles.junior), Some(&admin))
        .await;
    assert_eq!(deleted.status, StatusCode::OK, "{}", deleted.body);

    let gone = app
        .get(&format!("/api/roles/{}", roles.junior), Some(&admin))
        .await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.code(), 4001);
}

#[tokio::test]
async fn test_permission_catalog_lists_all_and_free() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let res = app.get("/api/roles/permissions", Some(&admin)).await;
    assert_eq!(res.status, StatusCode::OK);

    let all = res.body["all"].as_array().expect("all");
    assert!(all.iter().any(|p| p == "VIEW_USERS"));
    assert!(all.iter().any(|p| p == "DELETE_FILE"));
    assert_eq!(
        res.body["free"],
        json!(["VIEW_PAGES", "VIEW_BUSINESSES", "ASK_INQUIRY"])
    );

    // the catalog is reviewer-only
    let anon = app.get("/api/roles/permissions", None).await;
    assert_eq!(anon.status, StatusCode::FORBIDDEN);
}
