// Each integration test binary compiles this module separately and uses a
// different subset of it.
#![allow(dead_code)]

//! Shared harness for API integration tests.
//!
//! Tests run the real router over a [`LocalStore`] in a temp directory, so
//! the whole HTTP surface is exercised without a database. The store behind
//! the router is also exposed directly, for seeding and assertions.

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use classfit_api::auth::jwt::{generate_access_token, JwtConfig};
use classfit_api::auth::password::hash_password;
use classfit_api::config::{ServerConfig, StoreConfig};
use classfit_api::routes;
use classfit_api::state::AppState;
use classfit_db::models::user::{NewUser, User, UserPatch};
use classfit_db::store::{LocalStore, Store};

/// Password used by every seeded account.
pub const TEST_PASSWORD: &str = "sup3r-secret";

const TEST_JWT_SECRET: &str = "integration-test-secret-0123456789";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<LocalStore>,
    pub jwt: JwtConfig,
    _dir: TempDir,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let dir = TempDir::new().expect("temp dir");
        let store_path: PathBuf = dir.path().join("classfit-data.json");

        let store = Arc::new(
            LocalStore::open(store_path.clone())
                .await
                .expect("open local store"),
        );

        let jwt = JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 60,
        };

        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["http://localhost:5173".to_string()],
            request_timeout_secs: 30,
            jwt: jwt.clone(),
            store: StoreConfig::Local(store_path),
        };

        let state = AppState {
            store: Arc::clone(&store) as Arc<dyn Store>,
            config: Arc::new(config),
        };

        let router = Router::new()
            .merge(routes::health::router())
            .nest("/api/v1", routes::api_routes())
            .with_state(state);

        TestApp {
            router,
            store,
            jwt,
            _dir: dir,
        }
    }

    /// Insert a user directly into the store with the given roles.
    pub async fn seed_user(&self, name: &str, roles: &[&str]) -> User {
        self.seed_trainer(name, roles, None).await
    }

    /// Insert a user with an explicit commission rate (trainer accounts).
    pub async fn seed_trainer(
        &self,
        name: &str,
        roles: &[&str],
        commission_rate: Option<f64>,
    ) -> User {
        let password_hash = hash_password(TEST_PASSWORD).expect("hash password");
        self.store
            .insert_user(&NewUser {
                display_name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                password_hash,
                phone: None,
                bio: None,
                roles: roles.iter().map(|r| r.to_string()).collect(),
                commission_rate,
                languages: Vec::new(),
            })
            .await
            .expect("seed user")
    }

    /// Replace a user's roles directly, bypassing the management routes.
    pub async fn set_roles(&self, user_id: i64, roles: &[&str]) {
        let patch = UserPatch {
            roles: Some(roles.iter().map(|r| r.to_string()).collect()),
            ..Default::default()
        };
        self.store
            .update_user(user_id, &patch)
            .await
            .expect("update roles")
            .expect("user exists");
    }

    /// Mint an access token for a seeded user.
    pub fn token_for(&self, user: &User) -> String {
        generate_access_token(user.id, &self.jwt).expect("generate token")
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(serde_json::to_vec(&json).expect("serialize body")))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router call");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("response is JSON")
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::GET, uri, token, None).await
    }

    pub async fn post(
        &self,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        self.request(Method::POST, uri, token, body).await
    }

    pub async fn put(&self, uri: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        self.request(Method::DELETE, uri, token, None).await
    }
}

/// A standard booking creation payload against `trainer_id`.
pub fn booking_payload(trainer_id: i64) -> Value {
    serde_json::json!({
        "trainer_id": trainer_id,
        "customer_name": "Mila Petrova",
        "customer_phone": "+359 88 555 0101",
        "customer_email": "mila@example.com",
        "session_date": "2026-09-14",
        "session_time": "10:30:00",
        "duration_minutes": 60,
        "price_cents": 2000,
    })
}
