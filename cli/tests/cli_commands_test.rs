//! CLI integration tests using mock servers.
//!
//! These tests spawn the `userdesk` binary against a wiremock server. Each test gets its own
//! config directory, so the credential file starts empty or seeded by the test.

#![cfg(target_os = "linux")]

use std::path::PathBuf;
use std::process::Output;

use serde_json::json;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "cli_token";

/// Test context for CLI integration tests.
struct CliTestContext {
    mock_server: MockServer,
    home: TempDir,
}

impl CliTestContext {
    async fn new() -> Self {
        Self {
            mock_server: MockServer::start().await,
            home: tempfile::tempdir().expect("tempdir"),
        }
    }

    /// Same context with a saved session.
    async fn signed_in() -> Self {
        let ctx = Self::new().await;
        let path = ctx.credentials_path();
        std::fs::create_dir_all(path.parent().expect("parent")).expect("config dir");
        std::fs::write(&path, format!("[auth]\ntoken = \"{TOKEN}\"\n")).expect("seed credentials");
        ctx
    }

    fn config_home(&self) -> PathBuf {
        self.home.path().join("config")
    }

    fn credentials_path(&self) -> PathBuf {
        self.config_home().join("userdesk").join("credentials.toml")
    }

    fn saved_token(&self) -> Option<String> {
        let content = std::fs::read_to_string(self.credentials_path()).ok()?;
        let value: toml::Value = toml::from_str(&content).ok()?;
        value
            .get("auth")?
            .get("token")?
            .as_str()
            .map(str::to_owned)
    }

    async fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_userdesk"))
            .args(args)
            .current_dir(self.home.path())
            .env_clear()
            .env("HOME", self.home.path())
            .env("XDG_CONFIG_HOME", self.config_home())
            .env("USERDESK_API_BASE_URL", self.mock_server.uri())
            .output()
            .await
            .expect("spawn userdesk")
    }

    async fn mount_users(&self, total: u64, items: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "items": items, "total": total })),
            )
            .mount(&self.mock_server)
            .await;
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[tokio::test]
async fn users_prints_table_and_footer() {
    let ctx = CliTestContext::signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(query_param("page", "2"))
        .and(query_param("pageSize", "10"))
        .and(query_param("search", "example"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "id": 11, "name": "Ann", "email": "ann@example.com", "status": "Active",
                  "lastLoginAt": "2024-05-01T10:00:00Z" },
                { "id": 12, "name": "Bob", "email": "bob@example.com", "status": "Blocked",
                  "lastLoginAt": null }
            ],
            "total": 45
        })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let output = ctx
        .run(&["users", "--page", "2", "--page-size", "10", "--search", " example "])
        .await;
    let text = stdout(&output);

    assert!(output.status.success(), "stdout: {text}");
    assert!(text.contains("ann@example.com"));
    assert!(text.contains("Blocked"));
    assert!(text.contains("2024-05-01 10:00:00 UTC"));
    assert!(text.contains("Page 2 / 5 (total: 45)"));
}

#[tokio::test]
async fn users_without_session_asks_for_login() {
    let ctx = CliTestContext::new().await;

    let output = ctx.run(&["users"]).await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("Not signed in"));
    let requests = ctx.mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn invalid_token_removes_saved_session() {
    let ctx = CliTestContext::signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "INVALID_TOKEN",
            "message": "Token is no longer valid"
        })))
        .mount(&ctx.mock_server)
        .await;

    let output = ctx.run(&["users"]).await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("Session expired"));
    assert_eq!(ctx.saved_token(), None);
}

#[tokio::test]
async fn server_error_message_is_reported() {
    let ctx = CliTestContext::signed_in().await;

    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({ "message": "Database unavailable" })),
        )
        .mount(&ctx.mock_server)
        .await;

    let output = ctx.run(&["users"]).await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("Database unavailable"));
    assert_eq!(ctx.saved_token().as_deref(), Some(TOKEN));
}

#[tokio::test]
async fn logout_forgets_the_token() {
    let ctx = CliTestContext::signed_in().await;

    let output = ctx.run(&["logout"]).await;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Signed out"));
    assert_eq!(ctx.saved_token(), None);

    let again = ctx.run(&["logout"]).await;
    assert!(again.status.success());
    assert!(stdout(&again).contains("Not currently signed in"));
}

#[tokio::test]
async fn delete_unverified_reports_affected_rows() {
    let ctx = CliTestContext::signed_in().await;
    ctx.mount_users(0, json!([])).await;

    Mock::given(method("POST"))
        .and(path("/api/users/delete-unverified"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "affected": 4 })))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let output = ctx.run(&["delete-unverified", "--yes"]).await;

    assert!(output.status.success(), "stdout: {}", stdout(&output));
    assert!(stdout(&output).contains("Deleted unverified: 4"));
}

#[tokio::test]
async fn confirm_link_values_are_sent() {
    let ctx = CliTestContext::new().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/confirm"))
        .and(query_param("email", "ann@example.com"))
        .and(query_param("token", "abc"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&ctx.mock_server)
        .await;

    let output = ctx
        .run(&["confirm", "--email", "ann@example.com", "--token", "abc"])
        .await;

    assert!(output.status.success());
    assert!(stdout(&output).contains("Email confirmed"));
}

#[tokio::test]
async fn confirm_without_token_fails_locally() {
    let ctx = CliTestContext::new().await;

    let output = ctx.run(&["confirm", "--email", "ann@example.com"]).await;

    assert!(!output.status.success());
    assert!(stdout(&output).contains("No email/token in link"));
    let requests = ctx.mock_server.received_requests().await.unwrap_or_default();
    assert!(requests.is_empty());
}

#[tokio::test]
async fn completions_do_not_need_configuration() {
    let ctx = CliTestContext::new().await;

    let output = ctx.run(&["completions", "zsh"]).await;

    assert!(output.status.success());
    assert!(stdout(&output).contains("userdesk"));
}
