//! Common test utilities and fixtures
#![allow(dead_code)]

use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use group_config_admin::{create_router, AppState, Settings};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use std::{path::PathBuf, sync::Arc};
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const ADMIN_USER: &str = "admin";
pub const ADMIN_PASSWORD: &str = "s3cret-pass";

pub const INITIAL_DOCUMENT: &str = r#"{
    "groups": [
        {
            "key": "sales",
            "emails": [
                "s1@x.com",
                "s2@x.com"
            ],
            "groupId": 11,
            "remoteOnly": false,
            "skip": false
        },
        {
            "key": "support",
            "emails": [],
            "groupId": 12,
            "remoteOnly": true,
            "skip": true
        }
    ]
}"#;

/// Argon2id hash with cheap parameters so tests stay fast.
pub fn hash_password(password: &str) -> String {
    let salt = SaltString::encode_b64(b"integration-salt").expect("salt");
    Argon2::new(
        Algorithm::Argon2id,
        Version::V0x13,
        Params::new(1024, 1, 1, None).expect("params"),
    )
    .hash_password(password.as_bytes(), &salt)
    .expect("hash")
    .to_string()
}

/// Test application builder
pub struct TestAppBuilder {
    session_ttl_secs: u64,
    document: Option<String>,
    with_credentials: bool,
    groups_in_missing_dir: bool,
}

impl TestAppBuilder {
    pub fn new() -> Self {
        Self {
            session_ttl_secs: 3600,
            document: Some(INITIAL_DOCUMENT.to_string()),
            with_credentials: true,
            groups_in_missing_dir: false,
        }
    }

    pub fn with_session_ttl(mut self, secs: u64) -> Self {
        self.session_ttl_secs = secs;
        self
    }

    pub fn with_document(mut self, contents: impl Into<String>) -> Self {
        self.document = Some(contents.into());
        self
    }

    pub fn without_document(mut self) -> Self {
        self.document = None;
        self
    }

    pub fn without_credentials(mut self) -> Self {
        self.with_credentials = false;
        self
    }

    /// Points the groups file into a directory that does not exist, so reads and writes fail.
    pub fn with_unwritable_location(mut self) -> Self {
        self.groups_in_missing_dir = true;
        self.document = None;
        self
    }

    pub fn build(self) -> TestApp {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");

        let groups_path = if self.groups_in_missing_dir {
            dir.path().join("missing").join("groups.json")
        } else {
            dir.path().join("groups.json")
        };
        if let Some(contents) = &self.document {
            std::fs::write(&groups_path, contents).expect("write groups file");
        }

        let public_dir = dir.path().join("public");
        std::fs::create_dir_all(&public_dir).expect("create public dir");
        std::fs::write(public_dir.join("index.html"), "<h1>editor</h1>").expect("index");
        std::fs::write(public_dir.join("login.html"), "<h1>login</h1>").expect("login");

        let (admin_user, admin_password_hash) = if self.with_credentials {
            (
                Some(ADMIN_USER.to_string()),
                Some(SecretString::new(hash_password(ADMIN_PASSWORD))),
            )
        } else {
            (None, None)
        };

        let settings = Settings {
            config_file_path: Some(groups_path.clone()),
            admin_user,
            admin_password_hash,
            session_secret: Some(SecretString::new("integration-test-secret".to_string())),
            public_dir,
            session_ttl_secs: self.session_ttl_secs,
            ..Settings::default()
        };

        let state = Arc::new(AppState::new(&settings).expect("state"));
        TestApp {
            router: create_router(state.clone()),
            state,
            groups_path,
            _dir: dir,
        }
    }
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
    pub groups_path: PathBuf,
    _dir: TempDir,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn login(&self, username: &str, password: &str) -> Response<Body> {
        let body = serde_json::json!({ "username": username, "password": password });
        self.send(
            Request::builder()
                .method("POST")
                .uri("/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Logs in with the configured credentials and returns the `Cookie` header value.
    pub async fn login_cookie(&self) -> String {
        let response = self.login(ADMIN_USER, ADMIN_PASSWORD).await;
        assert_eq!(response.status(), 200, "login should succeed");
        session_cookie(&response).expect("login response should set the session cookie")
    }

    pub async fn logout(&self, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("POST").uri("/logout");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method("GET").uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_data(&self, cookie: Option<&str>, body: impl Into<String>) -> Response<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/api/data")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        self.send(builder.body(Body::from(body.into())).unwrap()).await
    }

    pub fn groups_file(&self) -> String {
        std::fs::read_to_string(&self.groups_path).expect("read groups file")
    }
}

/// Extracts `session_id=...` from the response's `Set-Cookie` headers.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session_id="))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

pub fn set_cookie_header(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("session_id="))
        .map(str::to_string)
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
