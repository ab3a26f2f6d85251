//! Integration tests for Pocket Shop.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p pocket-shop-integration-tests
//! ```
//!
//! Every test gets its own mock Storefront API (`wiremock`) and an in-memory
//! `SQLite` store, wired together through [`AppState`] exactly as the app
//! wires them at startup.
//!
//! # Test Categories
//!
//! - `session_lifecycle` - restore, renewal window, logout
//! - `login_screen` - login flow through the view-model
//! - `catalog` - search, product, price filter

use std::sync::Arc;

use chrono::{DateTime, Duration, SecondsFormat, Utc};
use secrecy::SecretString;
use serde_json::{Value, json};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pocket_shop_storefront::AppState;
use pocket_shop_storefront::config::{ShopifyStorefrontConfig, StorefrontConfig};
use pocket_shop_storefront::shopify::{AccessToken, StoreContext, TokenGrant};
use pocket_shop_storefront::store::{KeyValueStore, SqliteStore, StoredToken, TokenStore};

/// GraphQL endpoint path served by the mock.
pub const GRAPHQL_PATH: &str = "/api/2025-01/graphql.json";

/// A mock shop plus an app wired against it.
pub struct TestContext {
    pub server: MockServer,
    pub app: AppState,
    pub tokens: TokenStore,
    pub kv: Arc<SqliteStore>,
}

impl TestContext {
    /// Start a mock shop and an app with an empty store.
    ///
    /// # Panics
    ///
    /// Panics if the in-memory store cannot be created.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let kv = Arc::new(
            SqliteStore::in_memory()
                .await
                .expect("in-memory store"),
        );
        let app = AppState::with_store(config_for(&server), kv.clone());
        let tokens = TokenStore::new(kv.clone() as Arc<dyn KeyValueStore>);
        Self {
            server,
            app,
            tokens,
            kv,
        }
    }

    /// Persist a token as a previous app run would have.
    ///
    /// # Panics
    ///
    /// Panics if the store write fails.
    #[allow(clippy::expect_used)]
    pub async fn persist_token(&self, token: &str, expires_at: DateTime<Utc>) {
        self.tokens
            .save(&StoredToken::from(TokenGrant {
                access_token: AccessToken::new(token),
                expires_at,
            }))
            .await
            .expect("persist token");
    }

    /// The persisted token, if any.
    ///
    /// # Panics
    ///
    /// Panics if the store read fails.
    #[allow(clippy::expect_used)]
    pub async fn persisted_token(&self) -> Option<String> {
        self.tokens
            .load()
            .await
            .expect("load token")
            .map(|t| t.access_token.expose().to_string())
    }

    /// Respond to `operation` with `data`.
    pub async fn mount(&self, operation: &str, data: Value) {
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({ "operationName": operation })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .mount(&self.server)
            .await;
    }

    /// Respond to `operation` with `data`, expecting exactly `times` calls.
    pub async fn mount_expect(&self, operation: &str, data: Value, times: u64) {
        Mock::given(method("POST"))
            .and(path(GRAPHQL_PATH))
            .and(body_partial_json(json!({ "operationName": operation })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Number of requests the mock received for `operation`.
    ///
    /// # Panics
    ///
    /// Panics if request recording is disabled.
    #[allow(clippy::expect_used)]
    pub async fn calls(&self, operation: &str) -> usize {
        self.server
            .received_requests()
            .await
            .expect("request recording")
            .iter()
            .filter(|r| {
                serde_json::from_slice::<Value>(&r.body)
                    .ok()
                    .and_then(|b| b.get("operationName").cloned())
                    == Some(Value::String(operation.to_string()))
            })
            .count()
    }
}

/// Config pointing at the mock server.
#[must_use]
pub fn config_for(server: &MockServer) -> StorefrontConfig {
    StorefrontConfig {
        shopify: ShopifyStorefrontConfig {
            store: "pocket-test.myshopify.com".to_string(),
            api_version: "2025-01".to_string(),
            storefront_token: SecretString::from("7d1e93b0c4a25f68e0b9d3c1a47f2e5b"),
            endpoint_override: Some(format!("{}{GRAPHQL_PATH}", server.uri())),
        },
        database_url: "sqlite::memory:".to_string(),
        context: StoreContext::default(),
        renewal_window: Duration::days(7),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
    }
}

/// `customerAccessTokenCreate` / `Renew` payload granting `token`.
#[must_use]
pub fn token_payload(token: &str, expires_at: DateTime<Utc>) -> Value {
    json!({
        "customerAccessToken": {
            "accessToken": token,
            "expiresAt": expires_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        },
        "customerUserErrors": [],
        "userErrors": []
    })
}

/// `customer` response for a signed-in customer.
#[must_use]
pub fn customer_data() -> Value {
    json!({ "customer": {
        "id": "gid://shopify/Customer/5",
        "email": "ada@pocket.example",
        "firstName": "Ada",
        "lastName": "Lovelace",
        "displayName": "Ada Lovelace",
        "phone": null,
        "defaultAddress": null
    } })
}
