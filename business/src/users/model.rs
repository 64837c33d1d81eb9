use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ustr::Ustr;

/// A user id as the service sends it: a number or a string.
///
/// Ids are serialized back in the form they arrived in, so bulk payloads echo them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserId {
    Num(i64),
    Text(Ustr),
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Num(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id.as_str()),
        }
    }
}

impl From<i64> for UserId {
    fn from(id: i64) -> Self {
        Self::Num(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::Text(Ustr::from(id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserStatus {
    Active,
    Blocked,
    Unverified,
    Other(String),
}

impl Default for UserStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for UserStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Active" => Self::Active,
            "Blocked" => Self::Blocked,
            "Unverified" => Self::Unverified,
            _ => Self::Other(value),
        }
    }
}

impl From<UserStatus> for String {
    fn from(status: UserStatus) -> Self {
        match status {
            UserStatus::Active => "Active".to_owned(),
            UserStatus::Blocked => "Blocked".to_owned(),
            UserStatus::Unverified => "Unverified".to_owned(),
            UserStatus::Other(other) => other,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => f.write_str("Active"),
            Self::Blocked => f.write_str("Blocked"),
            Self::Unverified => f.write_str("Unverified"),
            Self::Other(other) => f.write_str(other),
        }
    }
}

/// One row of the user list. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// Kept verbatim; see [`UserSummary::last_login`].
    #[serde(default)]
    pub last_login_at: Option<String>,
    #[serde(default)]
    pub status: UserStatus,
}

impl UserSummary {
    pub fn last_login(&self) -> Option<DateTime<Utc>> {
        let raw = self.last_login_at.as_deref()?;
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|at| at.with_timezone(&Utc))
    }

    /// Formatted last login; unparseable timestamps are shown as sent.
    pub fn last_login_display(&self) -> String {
        match (self.last_login(), self.last_login_at.as_deref()) {
            (Some(at), _) => at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            (None, Some(raw)) => raw.to_owned(),
            (None, None) => String::new(),
        }
    }

    /// Blocked rows are rendered highlighted.
    pub fn is_highlighted(&self) -> bool {
        self.status == UserStatus::Blocked
    }
}

#[derive(Debug, Deserialize)]
struct RawUsersPage {
    #[serde(default)]
    items: Option<Vec<UserSummary>>,
    #[serde(default)]
    total: Option<u64>,
}

/// One fetched page. Replaces the previous page entirely.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "RawUsersPage")]
pub struct UsersPage {
    pub items: Vec<UserSummary>,
    pub total: u64,
}

impl From<RawUsersPage> for UsersPage {
    fn from(raw: RawUsersPage) -> Self {
        Self {
            items: raw.items.unwrap_or_default(),
            total: raw.total.unwrap_or_default(),
        }
    }
}

/// Reply of a mutation endpoint. Both fields are optional on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct ActionOutcome {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub affected: Option<u64>,
}

impl ActionOutcome {
    /// Read a reply field by field. A field of the wrong type counts as absent; a count sent
    /// as a numeric string is accepted.
    pub fn from_value_lenient(value: &Value) -> Self {
        Self {
            message: value
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
            affected: value.get("affected").and_then(|affected| {
                affected
                    .as_u64()
                    .or_else(|| affected.as_str()?.trim().parse().ok())
            }),
        }
    }
}

/// A mutation applied to the selected ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkAction {
    Block,
    Unblock,
    Delete,
}

impl BulkAction {
    pub fn path(self) -> &'static str {
        match self {
            Self::Block => "/api/users/block",
            Self::Unblock => "/api/users/unblock",
            Self::Delete => "/api/users/delete",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Block => "Block",
            Self::Unblock => "Unblock",
            Self::Delete => "Delete",
        }
    }
}
