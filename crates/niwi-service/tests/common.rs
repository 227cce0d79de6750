//! Common test utilities for niwi integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use tempfile::TempDir;

use niwi_core::UserId;
use niwi_service::auth::{JwtClaims, Role};
use niwi_service::{create_router, AppState, ServiceConfig};
use niwi_store::RocksStore;

/// The HS256 secret the harness signs test tokens with.
pub const TEST_JWT_SECRET: &str = "test-secret";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Direct handle on the store, for seeding fixtures.
    pub store: Arc<RocksStore>,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// A professional user for authenticated requests.
    pub professional_id: UserId,
    /// An admin user for privileged requests.
    pub admin_id: UserId,
    /// A customer user for request intake.
    pub customer_id: UserId,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    ///
    /// Stripe and the chat relay are left unconfigured; tests exercising
    /// those paths assert the external-service error instead.
    pub fn new() -> Self {
        Self::with_config_overrides(|_| {})
    }

    /// Create a harness whose chat relay points at the given base URL
    /// (typically a mock server).
    pub fn with_chat(chat_api_url: &str) -> Self {
        let chat_api_url = chat_api_url.to_string();
        Self::with_config_overrides(move |config| {
            config.chat_api_key = Some("test-chat-key".into());
            config.chat_api_url = chat_api_url.clone();
        })
    }

    fn with_config_overrides(overrides: impl Fn(&mut ServiceConfig)) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store =
            Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let mut config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            jwt_secret: TEST_JWT_SECRET.into(),
            ..ServiceConfig::default()
        };
        overrides(&mut config);

        let state = AppState::new(store.clone(), config);
        let router: Router = create_router(state);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            store,
            _temp_dir: temp_dir,
            professional_id: UserId::generate(),
            admin_id: UserId::generate(),
            customer_id: UserId::generate(),
        }
    }

    /// Mint a signed token for an arbitrary user.
    pub fn token_for(user_id: &UserId, email: &str, role: Role) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            sub: email.to_string(),
            user_id: user_id.to_string(),
            user_type: role,
            exp: now + 1800,
            iat: now,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
        )
        .expect("Failed to encode test token")
    }

    /// Authorization header for the harness professional.
    pub fn professional_auth(&self) -> String {
        format!(
            "Bearer {}",
            Self::token_for(&self.professional_id, "pro@example.com", Role::Professional)
        )
    }

    /// Authorization header for the harness admin.
    pub fn admin_auth(&self) -> String {
        format!(
            "Bearer {}",
            Self::token_for(&self.admin_id, "admin@niwi.com", Role::Admin)
        )
    }

    /// Authorization header for the harness customer.
    pub fn customer_auth(&self) -> String {
        format!(
            "Bearer {}",
            Self::token_for(&self.customer_id, "customer@example.com", Role::Customer)
        )
    }

    /// Authorization header for a different professional (isolation tests).
    pub fn other_professional_auth() -> String {
        let other = UserId::generate();
        format!(
            "Bearer {}",
            Self::token_for(&other, "other@example.com", Role::Professional)
        )
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
