//! Authentication flows: login, registration, email confirmation and logout.
//!
//! None of the auth endpoints carry the credential. Failures are reported as [`AuthError`]
//! holding the text to show: the server's message, or a per-flow fallback.

use log::{error, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::SessionStore;
use crate::transport::{ApiClient, ApiError, RequestOptions};

pub const SIGNING_IN_TEXT: &str = "Signing in...";
pub const LOGIN_ERROR_TEXT: &str = "Login error";
pub const REGISTERED_TEXT: &str =
    "Successfully registered! Check your email for the confirmation link.";
pub const REGISTER_ERROR_TEXT: &str = "Registration error occurred.";
pub const CONFIRMED_TEXT: &str = "Email confirmed. You can login now.";
pub const CONFIRM_ERROR_TEXT: &str = "Confirm error";
pub const MISSING_LINK_TEXT: &str = "No email/token in link";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct AuthError {
    pub message: String,
}

impl AuthError {
    fn from_api(err: &ApiError, fallback: &str) -> Self {
        Self {
            message: err.message_or(fallback),
        }
    }

    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginResponse {
    access_token: Option<String>,
}

fn to_body<T: Serialize>(value: &T) -> Result<serde_json::Value, AuthError> {
    serde_json::to_value(value).map_err(|e| AuthError::new(e.to_string()))
}

/// POST `/api/auth/login`, storing the returned access token in the session.
pub async fn login(client: &ApiClient, email: &str, password: &str) -> Result<(), AuthError> {
    info!("Login: signing in as {email}");
    let body = to_body(&LoginRequest { email, password })?;

    let payload = client
        .request(
            "/api/auth/login",
            RequestOptions::post(Some(body)).without_auth(),
        )
        .await
        .map_err(|e| {
            error!("Login: {e}");
            AuthError::from_api(&e, LOGIN_ERROR_TEXT)
        })?;

    let token = payload
        .and_then(|p| serde_json::from_value::<LoginResponse>(p).ok())
        .and_then(|r| r.access_token)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| {
            error!("Login: response carried no access token");
            AuthError::new(LOGIN_ERROR_TEXT)
        })?;

    client.session().set_token(token);
    info!("Login: signed in as {email}");
    Ok(())
}

/// POST `/api/auth/register`. Returns the text to show on success.
pub async fn register(
    client: &ApiClient,
    name: &str,
    email: &str,
    password: &str,
) -> Result<&'static str, AuthError> {
    info!("Register: creating account for {email}");
    let body = to_body(&RegisterRequest {
        name,
        email,
        password,
    })?;

    client
        .request(
            "/api/auth/register",
            RequestOptions::post(Some(body)).without_auth(),
        )
        .await
        .map_err(|e| {
            error!("Register: {e}");
            AuthError::from_api(&e, REGISTER_ERROR_TEXT)
        })?;

    Ok(REGISTERED_TEXT)
}

/// GET `/api/auth/confirm?email=&token=`, the target of the confirmation link.
///
/// Both values must be present; a link missing either fails without a request.
pub async fn confirm_email(
    client: &ApiClient,
    email: &str,
    token: &str,
) -> Result<&'static str, AuthError> {
    if email.is_empty() || token.is_empty() {
        return Err(AuthError::new(MISSING_LINK_TEXT));
    }

    client
        .request(
            "/api/auth/confirm",
            RequestOptions::get()
                .without_auth()
                .with_query([("email", email), ("token", token)]),
        )
        .await
        .map_err(|e| {
            error!("Confirm: {e}");
            AuthError::from_api(&e, CONFIRM_ERROR_TEXT)
        })?;

    info!("Confirm: {email} confirmed");
    Ok(CONFIRMED_TEXT)
}

pub fn logout(session: &SessionStore) {
    session.clear();
    info!("Logout: credential removed");
}
