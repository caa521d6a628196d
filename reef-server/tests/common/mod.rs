//! Shared helpers for the integration tests
//!
//! Each test builds its own app: temp work directory, fresh database,
//! seeded roles and admin account. Requests run through the full
//! middleware stack in-process via tower, no listener involved.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tempfile::TempDir;
use tower::ServiceExt;

use reef_server::routes::build_app;
use reef_server::services::{AllowAll, MemoryRateLimiter, RateLimiter};
use reef_server::{AppState, Config};

pub const ADMIN_EMAIL: &str = "admin@test.local";
pub const ADMIN_PASSWORD: &str = "admin-secret-1";
pub const MEMBER_PASSWORD: &str = "member-secret-1";

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    _work_dir: TempDir,
}

/// Token pair captured from Set-Cookie headers
#[derive(Debug, Clone)]
pub struct Session {
    pub access: String,
    pub refresh: String,
}

impl Session {
    pub fn cookie_header(&self) -> String {
        format!(
            "access_token={}; refresh_token={}",
            self.access, self.refresh
        )
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

impl TestResponse {
    /// Error code from the error envelope, 0 when absent
    pub fn code(&self) -> u64 {
        self.body["code"].as_u64().unwrap_or(0)
    }

    pub fn message(&self) -> &str {
        self.body["message"].as_str().unwrap_or("")
    }

    pub fn id(&self) -> i64 {
        self.body["id"].as_i64().expect("response has no id")
    }

    pub fn set_cookies(&self) -> Vec<String> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok().map(str::to_owned))
            .collect()
    }

    /// Session from Set-Cookie headers. None when the response set no
    /// tokens or cleared them.
    pub fn session(&self) -> Option<Session> {
        let mut access = None;
        let mut refresh = None;
        for cookie in self.set_cookies() {
            let pair = cookie.split(';').next()?;
            let Some((name, value)) = pair.split_once('=') else {
                continue;
            };
            match name {
                "access_token" if !value.is_empty() => access = Some(value.to_owned()),
                "refresh_token" if !value.is_empty() => refresh = Some(value.to_owned()),
                _ => {}
            }
        }
        Some(Session {
            access: access?,
            refresh: refresh?,
        })
    }
}

pub async fn spawn_app() -> TestApp {
    // Throttling has its own test with a real limiter; everything else
    // runs unthrottled
    spawn_app_inner(Arc::new(AllowAll)).await
}

/// App with a real fixed-window limiter, for the throttling tests
pub async fn spawn_app_throttled(max_requests: u32) -> TestApp {
    spawn_app_inner(Arc::new(MemoryRateLimiter::new(max_requests, 60))).await
}

async fn spawn_app_inner(limiter: Arc<dyn RateLimiter>) -> TestApp {
    let work_dir = TempDir::new().expect("temp work dir");

    let mut config = Config::with_overrides(work_dir.path().display().to_string(), 0)
        .expect("test config");
    config.environment = "test".to_string();
    config.admin_email = ADMIN_EMAIL.to_string();
    config.admin_username = "admin".to_string();
    config.admin_password = ADMIN_PASSWORD.to_string();

    let mut state = AppState::initialize(&config).await.expect("app state");
    state.rate_limiter = limiter;

    TestApp {
        app: build_app(state.clone()),
        state,
        _work_dir: work_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self.app.clone().oneshot(request).await.expect("oneshot");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        session: Option<&Session>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(session) = session {
            builder = builder.header(header::COOKIE, session.cookie_header());
        }
        let request = match body {
            Some(value) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(value.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("request");
        self.send(request).await
    }

    pub async fn get(&self, path: &str, session: Option<&Session>) -> TestResponse {
        self.request(Method::GET, path, session, None).await
    }

    pub async fn post(&self, path: &str, session: Option<&Session>, body: Value) -> TestResponse {
        self.request(Method::POST, path, session, Some(body)).await
    }

    pub async fn put(&self, path: &str, session: Option<&Session>, body: Value) -> TestResponse {
        self.request(Method::PUT, path, session, Some(body)).await
    }

    pub async fn delete(&self, path: &str, session: Option<&Session>) -> TestResponse {
        self.request(Method::DELETE, path, session, None).await
    }

    /// PUT raw bytes; used for signed file uploads
    pub async fn put_bytes(&self, path: &str, bytes: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method(Method::PUT)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(Body::from(bytes))
            .expect("request");
        self.send(request).await
    }

    /// GET a non-JSON response as raw bytes
    pub async fn get_raw(&self, path: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .expect("request");
        let response = self.app.clone().oneshot(request).await.expect("oneshot");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("response body");
        (status, headers, bytes.to_vec())
    }

    pub async fn login(&self, email: &str, password: &str) -> Session {
        let res = self
            .post(
                "/api/auth/login",
                None,
                json!({ "email": email, "password": password }),
            )
            .await;
        assert_eq!(res.status, StatusCode::OK, "login failed: {}", res.body);
        res.session().expect("login set no session cookies")
    }

    pub async fn login_admin(&self) -> Session {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Register a member account; returns its session and user id
    pub async fn signup_member(&self, name: &str) -> (Session, i64) {
        let res = self
            .post(
                "/api/auth/signup",
                None,
                json!({
                    "username": name,
                    "email": format!("{name}@test.local"),
                    "password": MEMBER_PASSWORD,
                }),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED, "signup failed: {}", res.body);
        let id = res.body["user"]["id"].as_i64().expect("user id");
        (res.session().expect("signup set no session cookies"), id)
    }

    /// Create a custom role through the API as the given actor
    pub async fn create_role(
        &self,
        actor: &Session,
        name: &str,
        level: i64,
        permissions: &[&str],
    ) -> TestResponse {
        self.post(
            "/api/roles",
            Some(actor),
            json!({ "name": name, "level": level, "permissions": permissions }),
        )
        .await
    }
}
