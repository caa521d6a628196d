//! Content resources: pages, settings, businesses, inquiries,
//! newsletters and the contact form

mod common;

use http::StatusCode;
use serde_json::json;

use common::{spawn_app, spawn_app_throttled};

#[tokio::test]
async fn test_draft_pages_hidden_from_visitors() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let created = app
        .post(
            "/api/pages",
            Some(&admin),
            json!({
                "slug": "launch",
                "title": "Launch notes",
                "content": { "blocks": [{ "type": "paragraph", "text": "soon" }] },
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let page_id = created.id();
    assert_eq!(created.body["is_published"], false);

    // visitors see neither the listing nor the page itself
    let listing = app.get("/api/pages", None).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert!(listing.body.as_array().expect("pages").is_empty());

    let direct = app.get(&format!("/api/pages/{page_id}"), None).await;
    assert_eq!(direct.status, StatusCode::NOT_FOUND);
    assert_eq!(direct.code(), 5001);

    let by_slug = app.get("/api/pages/slug/launch", None).await;
    assert_eq!(by_slug.status, StatusCode::NOT_FOUND);

    // the author still sees the draft
    let mine = app.get(&format!("/api/pages/{page_id}"), Some(&admin)).await;
    assert_eq!(mine.status, StatusCode::OK);

    // publishing flips visibility
    let published = app
        .put(
            &format!("/api/pages/{page_id}"),
            Some(&admin),
            json!({ "is_published": true }),
        )
        .await;
    assert_eq!(published.status, StatusCode::OK, "{}", published.body);

    let by_slug = app.get("/api/pages/slug/launch", None).await;
    assert_eq!(by_slug.status, StatusCode::OK);
    assert_eq!(by_slug.body["title"], "Launch notes");

    let listing = app.get("/api/pages", None).await;
    assert_eq!(listing.body.as_array().expect("pages").len(), 1);
}

#[tokio::test]
async fn test_page_slugs_are_unique() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let first = app
        .post(
            "/api/pages",
            Some(&admin),
            json!({ "slug": "about", "title": "About", "content": {} }),
        )
        .await;
    assert_eq!(first.status, StatusCode::CREATED);

    let dup = app
        .post(
            "/api/pages",
            Some(&admin),
            json!({ "slug": "about", "title": "About again", "content": {} }),
        )
        .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.code(), 5002);

    // renaming another page onto the taken slug is refused the same way
    let second = app
        .post(
            "/api/pages",
            Some(&admin),
            json!({ "slug": "team", "title": "Team", "content": {} }),
        )
        .await;
    let moved = app
        .put(
            &format!("/api/pages/{}", second.id()),
            Some(&admin),
            json!({ "slug": "about" }),
        )
        .await;
    assert_eq!(moved.status, StatusCode::CONFLICT);
    assert_eq!(moved.code(), 5002);
}

#[tokio::test]
async fn test_page_writes_require_permission() {
    let app = spawn_app().await;
    let (member, _) = app.signup_member("paula").await;

    let res = app
        .post(
            "/api/pages",
            Some(&member),
            json!({ "slug": "spam", "title": "Spam", "content": {} }),
        )
        .await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);
    assert_eq!(res.code(), 2001);
}

#[tokio::test]
async fn test_settings_roundtrip() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let saved = app
        .put(
            "/api/settings/site.title",
            Some(&admin),
            json!({ "value": { "text": "Reef", "locale": "en" } }),
        )
        .await;
    assert_eq!(saved.status, StatusCode::OK, "{}", saved.body);
    assert_eq!(saved.body["value"]["text"], "Reef");

    // replace in place
    let replaced = app
        .put(
            "/api/settings/site.title",
            Some(&admin),
            json!({ "value": { "text": "Reef CMS" } }),
        )
        .await;
    assert_eq!(replaced.status, StatusCode::OK);
    assert_eq!(replaced.body["value"]["text"], "Reef CMS");

    let fetched = app.get("/api/settings/site.title", Some(&admin)).await;
    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body["value"]["text"], "Reef CMS");

    // settings are operator-only, reads included
    let anon = app.get("/api/settings/site.title", None).await;
    assert_eq!(anon.status, StatusCode::FORBIDDEN);

    let deleted = app.delete("/api/settings/site.title", Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body, json!(true));

    let gone = app.get("/api/settings/site.title", Some(&admin)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.code(), 5003);
}

#[tokio::test]
async fn test_business_directory_is_public_read_admin_write() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    let denied = app
        .post("/api/businesses", None, json!({ "name": "Drive-by Inc" }))
        .await;
    assert_eq!(denied.status, StatusCode::FORBIDDEN);

    let created = app
        .post(
            "/api/businesses",
            Some(&admin),
            json!({
                "name": "Coral Works",
                "url": "https://coral.example",
                "description": "Dive gear",
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let id = created.id();

    // visitors read the directory without a session
    let listing = app.get("/api/businesses", None).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert_eq!(listing.body.as_array().expect("businesses").len(), 1);

    let one = app.get(&format!("/api/businesses/{id}"), None).await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.body["name"], "Coral Works");

    let updated = app
        .put(
            &format!("/api/businesses/{id}"),
            Some(&admin),
            json!({ "name": "Coral Works Ltd" }),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["name"], "Coral Works Ltd");
    assert_eq!(updated.body["url"], "https://coral.example");

    let deleted = app.delete(&format!("/api/businesses/{id}"), Some(&admin)).await;
    assert_eq!(deleted.status, StatusCode::OK);

    let gone = app.get(&format!("/api/businesses/{id}"), None).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
    assert_eq!(gone.code(), 5008);
}

#[tokio::test]
async fn test_inquiry_visibility_and_answer_flow() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    // anonymous submission works, authorship stays empty
    let anon_inquiry = app
        .post(
            "/api/inquiry",
            None,
            json!({ "title": "Opening hours?", "content": "Are you open on Sundays?" }),
        )
        .await;
    assert_eq!(anon_inquiry.status, StatusCode::CREATED, "{}", anon_inquiry.body);
    let anon_id = anon_inquiry.id();
    assert!(anon_inquiry.body["author_id"].is_null());

    // a signed-in author is recorded
    let (author, author_id) = app.signup_member("quinn").await;
    let owned = app
        .post(
            "/api/inquiry",
            Some(&author),
            json!({ "title": "Bulk order", "content": "Do you offer bulk pricing?" }),
        )
        .await;
    assert_eq!(owned.status, StatusCode::CREATED);
    let owned_id = owned.id();
    assert_eq!(owned.body["author_id"], author_id);

    // the author reads their own, nobody else's
    let mine = app.get(&format!("/api/inquiry/{owned_id}"), Some(&author)).await;
    assert_eq!(mine.status, StatusCode::OK);
    let not_mine = app.get(&format!("/api/inquiry/{anon_id}"), Some(&author)).await;
    assert_eq!(not_mine.status, StatusCode::FORBIDDEN);
    assert_eq!(not_mine.code(), 2001);

    // /mine lists only the author's inquiries
    let listing = app.get("/api/inquiry/mine", Some(&author)).await;
    assert_eq!(listing.status, StatusCode::OK);
    let items = listing.body.as_array().expect("inquiries");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], owned_id);

    // reviewers see everything
    let all = app.get("/api/inquiry", Some(&admin)).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body.as_array().expect("inquiries").len(), 2);

    let answered = app
        .post(
            &format!("/api/inquiry/{owned_id}/answer"),
            Some(&admin),
            json!({ "answer": "Yes, from 50 units." }),
        )
        .await;
    assert_eq!(answered.status, StatusCode::OK, "{}", answered.body);
    assert_eq!(answered.body["status"], "ANSWERED");
    assert_eq!(answered.body["answer"], "Yes, from 50 units.");
    assert!(answered.body["answered_at"].as_i64().is_some());

    // answering twice is refused
    let again = app
        .post(
            &format!("/api/inquiry/{owned_id}/answer"),
            Some(&admin),
            json!({ "answer": "Replacement answer" }),
        )
        .await;
    assert_eq!(again.status, StatusCode::CONFLICT);
    assert_eq!(again.code(), 6002);

    // the author sees the answer on their copy
    let refreshed = app.get(&format!("/api/inquiry/{owned_id}"), Some(&author)).await;
    assert_eq!(refreshed.body["answer"], "Yes, from 50 units.");
}

#[tokio::test]
async fn test_newsletter_draft_send_lifecycle() {
    let app = spawn_app().await;
    let admin = app.login_admin().await;

    // two subscribers, one duplicate attempt
    for email in ["reader1@test.local", "reader2@test.local"] {
        let res = app
            .post("/api/newsletters/subscribe", None, json!({ "email": email }))
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "{}", res.body);
    }
    let dup = app
        .post(
            "/api/newsletters/subscribe",
            None,
            json!({ "email": "reader1@test.local" }),
        )
        .await;
    assert_eq!(dup.status, StatusCode::CONFLICT);
    assert_eq!(dup.code(), 5006);

    let created = app
        .post(
            "/api/newsletters",
            Some(&admin),
            json!({ "subject": "March news", "body": "<p>Hello</p>" }),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED, "{}", created.body);
    let id = created.id();
    assert_eq!(created.body["status"], "DRAFT");

    // drafts can still be edited
    let edited = app
        .put(
            &format!("/api/newsletters/{id}"),
            Some(&admin),
            json!({ "subject": "April news" }),
        )
        .await;
    assert_eq!(edited.status, StatusCode::OK);
    assert_eq!(edited.body["subject"], "April news");

    let report = app
        .post(&format!("/api/newsletters/{id}/send"), Some(&admin), json!({}))
        .await;
    assert_eq!(report.status, StatusCode::OK, "{}", report.body);
    assert_eq!(report.body["sent"], 2);
    assert_eq!(report.body["failed"], 0);

    // sent newsletters are frozen
    let resend = app
        .post(&format!("/api/newsletters/{id}/send"), Some(&admin), json!({}))
        .await;
    assert_eq!(resend.status, StatusCode::CONFLICT);
    assert_eq!(resend.code(), 5005);

    let reedit = app
        .put(
            &format!("/api/newsletters/{id}"),
            Some(&admin),
            json!({ "subject": "May news" }),
        )
        .await;
    assert_eq!(reedit.status, StatusCode::CONFLICT);
    assert_eq!(reedit.code(), 5005);

    let sent = app.get(&format!("/api/newsletters/{id}"), Some(&admin)).await;
    assert_eq!(sent.body["status"], "SENT");
    assert!(sent.body["sent_at"].as_i64().is_some());
}

#[tokio::test]
async fn test_unsubscribe_is_idempotent() {
    let app = spawn_app().await;

    let res = app
        .post(
            "/api/newsletters/subscribe",
            None,
            json!({ "email": "leaver@test.local" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::CREATED);

    for _ in 0..2 {
        let res = app
            .post(
                "/api/newsletters/unsubscribe",
                None,
                json!({ "email": "leaver@test.local" }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    }

    // subscriber listing is reviewer-only and no longer contains them
    let admin = app.login_admin().await;
    let listing = app.get("/api/newsletters/subscribers", Some(&admin)).await;
    assert_eq!(listing.status, StatusCode::OK);
    assert!(listing.body.as_array().expect("subscribers").is_empty());
}

#[tokio::test]
async fn test_contact_form_delivers_and_throttles() {
    let app = spawn_app_throttled(2).await;

    for _ in 0..2 {
        let res = app
            .post(
                "/api/contact",
                None,
                json!({
                    "name": "Visitor",
                    "email": "visitor@test.local",
                    "message": "Hello there",
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "{}", res.body);
    }

    // same window, same client: third hit is throttled
    let res = app
        .post(
            "/api/contact",
            None,
            json!({
                "name": "Visitor",
                "email": "visitor@test.local",
                "message": "Hello again",
            }),
        )
        .await;
    assert_eq!(res.status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.code(), 8);
}

#[tokio::test]
async fn test_contact_form_validates_input() {
    let app = spawn_app().await;

    let res = app
        .post(
            "/api/contact",
            None,
            json!({ "name": "Visitor", "email": "not-an-email", "message": "hi" }),
        )
        .await;
    assert_eq!(res.status, StatusCode::BAD_REQUEST);
    assert_eq!(res.code(), 2);
}
