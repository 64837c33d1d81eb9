//! Transport: every call to the user-management service goes through [`ApiClient::request`].
//!
//! - The bearer credential is attached when the request asks for auth and a token exists.
//! - Bodies are decoded as JSON; a body that is not JSON is an absent payload, never a failure.
//! - Non-2xx responses become [`ApiError::Remote`] with the server's `code` and `message`.
//! - A `401` carrying one of [`SESSION_INVALID_CODES`] clears the Session Store before the
//!   error is returned, so no later request can reuse the dead credential.

use std::sync::Arc;

use log::{debug, warn};
use serde_json::Value;
use thiserror::Error;

use crate::config::BusinessConfig;
use crate::http::{HttpClient, Method};
use crate::session::SessionStore;

/// Error codes that mark the credential as permanently unusable.
pub const SESSION_INVALID_CODES: [&str; 3] = ["USER_BLOCKED", "USER_DELETED", "INVALID_TOKEN"];

const FALLBACK_MESSAGE: &str = "Request error";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    /// The service answered with a non-success status.
    #[error("{message}")]
    Remote {
        status: u16,
        code: Option<String>,
        message: String,
    },
    /// The request never produced a response.
    #[error("{0}")]
    Network(String),
    /// A success response whose JSON did not have the expected shape.
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Remote { status, .. } => Some(*status),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Remote { code, .. } => code.as_deref(),
            Self::Network(_) | Self::Decode(_) => None,
        }
    }

    /// Human-readable text, possibly empty for network errors without detail.
    pub fn message(&self) -> String {
        match self {
            Self::Remote { message, .. } => message.clone(),
            Self::Network(message) => message.clone(),
            Self::Decode(_) => self.to_string(),
        }
    }

    /// The message, or `fallback` when there is no text to show.
    pub fn message_or(&self, fallback: &str) -> String {
        let message = self.message();
        if message.is_empty() {
            fallback.to_owned()
        } else {
            message
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// `401` with a code that invalidates the credential.
    pub fn is_session_invalid(&self) -> bool {
        self.is_unauthorized()
            && self
                .code()
                .is_some_and(|code| SESSION_INVALID_CODES.contains(&code))
    }
}

/// Per-request options; defaults to an authenticated `GET` without body.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub body: Option<Value>,
    pub auth: bool,
    pub query: Vec<(String, String)>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::Get,
            body: None,
            auth: true,
            query: Vec::new(),
        }
    }
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post(body: Option<Value>) -> Self {
        Self {
            method: Method::Post,
            body,
            ..Self::default()
        }
    }

    /// Do not attach the credential, for the auth endpoints.
    pub fn without_auth(mut self) -> Self {
        self.auth = false;
        self
    }

    pub fn with_query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    config: Arc<BusinessConfig>,
    session: SessionStore,
    http: HttpClient,
}

impl ApiClient {
    pub fn new(config: BusinessConfig, session: SessionStore) -> Self {
        Self {
            config: Arc::new(config),
            session,
            http: HttpClient::new(),
        }
    }

    pub fn config(&self) -> &BusinessConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Issue one request and return its decoded JSON payload, if any.
    pub async fn request(
        &self,
        path: &str,
        options: RequestOptions,
    ) -> Result<Option<Value>, ApiError> {
        let url = self.config.endpoint(path);
        debug!("{} {url}", options.method);

        let mut request = self.http.request(options.method, url).query(options.query);

        if let Some(token) = self.session.token().filter(|_| options.auth) {
            request = request.bearer(&token);
        }

        if let Some(body) = &options.body {
            request = request
                .json(body)
                .map_err(|e| ApiError::Network(format!("Failed to encode request: {e}")))?;
        }

        let response = request.send().await.map_err(|e| {
            warn!("Request to {path} failed: {e}");
            ApiError::Network(e.message)
        })?;

        let payload = response.json_payload();

        if response.is_success() {
            return Ok(payload);
        }

        let field = |name: &str| {
            payload
                .as_ref()
                .and_then(|p| p.get(name))
                .and_then(Value::as_str)
                .map(str::to_owned)
        };

        let code = field("code");
        let message = field("message")
            .filter(|m| !m.is_empty())
            .or_else(|| response.reason.map(str::to_owned))
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_owned());

        let error = ApiError::Remote {
            status: response.status,
            code,
            message,
        };

        if error.is_session_invalid() {
            warn!(
                "Session invalidated by {path} ({}), clearing credential",
                error.code().unwrap_or_default()
            );
            self.session.clear();
        } else {
            debug!("{path} returned {}: {error}", response.status);
        }

        Err(error)
    }
}
