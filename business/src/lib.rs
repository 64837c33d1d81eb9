//! Business layer of the userdesk console.
//!
//! - [`SessionStore`]: the credential, shared by everything that talks to the service
//! - [`ApiClient`]: transport with credential attachment and error classification
//! - [`StatusChannel`]: the transient status line with auto-clear
//! - [`users`]: the user list controller and the runtime that drives it
//! - [`auth`]: login, registration, email confirmation, logout

pub mod auth;
mod config;
pub mod http;
pub mod route;
mod session;
mod status;
mod transport;
pub mod users;

pub use config::{BusinessConfig, ConfigError, ENV_PREFIX, FetchOrdering};
pub use route::Route;
pub use session::{MemoryTokenStorage, SessionStore, StorageError, TokenStorage};
pub use status::{Status, StatusChannel, StatusKind};
pub use transport::{ApiClient, ApiError, RequestOptions, SESSION_INVALID_CODES};
