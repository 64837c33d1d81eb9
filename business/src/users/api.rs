//! User-management endpoints.
//!
//! - GET  `/api/users?page=&pageSize=&search=` -> [`UsersPage`]
//! - POST `/api/users/{block,unblock,delete}` with `{ "ids": [...] }` -> [`ActionOutcome`]
//! - POST `/api/users/delete-unverified` -> [`ActionOutcome`]
//!
//! An absent payload (empty or non-JSON body on success) decodes to the type's default.
//! A mutation reply that does not fit [`ActionOutcome`] still counts as success: the change
//! already happened on the server.

use log::{info, warn};
use serde::Deserialize as _;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use super::model::{ActionOutcome, BulkAction, UserId, UsersPage};
use super::query::QueryParams;
use crate::transport::{ApiClient, ApiError, RequestOptions};

pub const USERS_PATH: &str = "/api/users";
pub const DELETE_UNVERIFIED_PATH: &str = "/api/users/delete-unverified";

fn decode<T: DeserializeOwned + Default>(payload: Option<Value>) -> Result<T, ApiError> {
    match payload {
        None => Ok(T::default()),
        Some(value) => serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string())),
    }
}

fn decode_outcome(payload: Option<Value>) -> ActionOutcome {
    let Some(value) = payload else {
        return ActionOutcome::default();
    };
    ActionOutcome::deserialize(&value).unwrap_or_else(|e| {
        warn!("Mutation reply has an unexpected shape ({e}), reading it field by field");
        ActionOutcome::from_value_lenient(&value)
    })
}

pub async fn list_users(client: &ApiClient, query: &QueryParams) -> Result<UsersPage, ApiError> {
    let payload = client
        .request(
            USERS_PATH,
            RequestOptions::get().with_query(query.query_pairs()),
        )
        .await?;
    decode(payload)
}

pub async fn bulk_action(
    client: &ApiClient,
    action: BulkAction,
    ids: &[UserId],
) -> Result<ActionOutcome, ApiError> {
    info!("{} {} user(s)", action.label(), ids.len());
    let payload = client
        .request(action.path(), RequestOptions::post(Some(json!({ "ids": ids }))))
        .await?;
    Ok(decode_outcome(payload))
}

pub async fn delete_unverified(client: &ApiClient) -> Result<ActionOutcome, ApiError> {
    info!("Deleting unverified users");
    let payload = client
        .request(DELETE_UNVERIFIED_PATH, RequestOptions::post(None))
        .await?;
    Ok(decode_outcome(payload))
}
