//! Shared fixtures for the business integration tests.
//!
//! ```ignore
//! let ctx = TestContext::new().await;
//! ctx.mount_users(sample_users(1..=20), 45).await;
//! let mut runtime = ctx.runtime(ctx.config());
//! runtime.apply(|c| c.load(false));
//! runtime.settle().await;
//! ```

#![allow(dead_code)]

use serde_json::{Value, json};
use userdesk_business::users::{TokioClock, UsersController, UsersRuntime};
use userdesk_business::{ApiClient, BusinessConfig, SessionStore};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test_token";

pub struct TestContext {
    pub mock_server: MockServer,
    pub session: SessionStore,
}

impl TestContext {
    /// Fresh mock server and a logged-in session.
    pub async fn new() -> Self {
        let mock_server = MockServer::start().await;
        let session = SessionStore::in_memory();
        session.set_token(TOKEN);
        Self {
            mock_server,
            session,
        }
    }

    /// Default config pointed at the mock server, with short timers.
    pub fn config(&self) -> BusinessConfig {
        BusinessConfig {
            search_debounce_ms: 50,
            status_clear_ms: 200,
            ..BusinessConfig::new(self.mock_server.uri())
        }
    }

    pub fn client(&self, config: BusinessConfig) -> ApiClient {
        ApiClient::new(config, self.session.clone())
    }

    pub fn runtime(&self, config: BusinessConfig) -> UsersRuntime {
        let clock = TokioClock::shared();
        let controller = UsersController::new(&config, self.session.clone(), clock.clone());
        UsersRuntime::new(controller, self.client(config), clock)
    }

    /// Every GET `/api/users` answers with `items` and `total`.
    pub async fn mount_users(&self, items: Vec<Value>, total: u64) {
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "items": items, "total": total })),
            )
            .mount(&self.mock_server)
            .await;
    }

    /// Requests received so far for `method` + `path`.
    pub async fn requests_to(&self, verb: &str, route: &str) -> Vec<wiremock::Request> {
        self.mock_server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == route)
            .collect()
    }
}

pub fn sample_user(id: i64) -> Value {
    json!({
        "id": id,
        "name": format!("User {id}"),
        "email": format!("user{id}@example.com"),
        "lastLoginAt": "2024-05-01T10:20:30Z",
        "status": if id % 5 == 0 { "Blocked" } else { "Active" },
    })
}

pub fn sample_users(ids: std::ops::RangeInclusive<i64>) -> Vec<Value> {
    ids.map(sample_user).collect()
}
