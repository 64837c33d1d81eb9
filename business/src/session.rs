//! Session Store.
//!
//! Holds the opaque credential token. The store is an explicitly owned handle that is
//! injected into the transport and the list controller; clones share one token.
//!
//! Lifecycle:
//! - init-on-load: [`SessionStore::new`] reads the token from its [`TokenStorage`]
//! - mutate-on-login/logout: [`SessionStore::set_token`] / [`SessionStore::clear`]
//! - read-on-every-request: [`SessionStore::token`]
//!
//! Storage writes go through immediately. A failing write is logged; the in-memory token
//! still changes so a cleared session can never keep authenticating requests.

use std::sync::{Arc, Mutex, PoisonError, RwLock};

use log::{info, warn};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access token storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("Token storage is corrupt: {0}")]
    Corrupt(String),
}

/// Where the token survives between runs.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>, StorageError>;
    fn save(&self, token: &str) -> Result<(), StorageError>;
    fn remove(&self) -> Result<(), StorageError>;
}

/// Keeps the token for the lifetime of the process only.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>, StorageError> {
        Ok(self
            .token
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    fn save(&self, token: &str) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_owned());
        Ok(())
    }

    fn remove(&self) -> Result<(), StorageError> {
        *self.token.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

#[derive(Clone)]
pub struct SessionStore {
    token: Arc<RwLock<Option<String>>>,
    storage: Arc<dyn TokenStorage>,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("logged_in", &self.is_logged_in())
            .finish()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::in_memory()
    }
}

impl SessionStore {
    /// Create a store and load the persisted token, if any.
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let token = match storage.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!("SessionStore: ignoring unreadable token storage: {e}");
                None
            }
        };

        Self {
            token: Arc::new(RwLock::new(token)),
            storage,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryTokenStorage::default()))
    }

    pub fn token(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        if let Err(e) = self.storage.save(&token) {
            warn!("SessionStore: failed to persist token: {e}");
        }
        *self.token.write().unwrap_or_else(PoisonError::into_inner) = Some(token);
        info!("SessionStore: session started");
    }

    pub fn clear(&self) {
        if let Err(e) = self.storage.remove() {
            warn!("SessionStore: failed to remove persisted token: {e}");
        }
        let previous = self
            .token
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if previous.is_some() {
            info!("SessionStore: session cleared");
        }
    }

    /// Whether a non-empty token is present.
    pub fn is_logged_in(&self) -> bool {
        self.token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingStorage;

    impl TokenStorage for FailingStorage {
        fn load(&self) -> Result<Option<String>, StorageError> {
            Err(StorageError::Corrupt("not toml".to_owned()))
        }

        fn save(&self, _token: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }

        fn remove(&self) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("read-only")))
        }
    }

    #[test]
    fn starts_logged_out_by_default() {
        let session = SessionStore::default();
        assert!(!session.is_logged_in());
        assert_eq!(session.token(), None);
    }

    #[test]
    fn loads_token_from_storage() {
        let session = SessionStore::new(Arc::new(MemoryTokenStorage::with_token("abc")));
        assert!(session.is_logged_in());
        assert_eq!(session.token().as_deref(), Some("abc"));
    }

    #[test]
    fn empty_persisted_token_is_not_a_session() {
        let session = SessionStore::new(Arc::new(MemoryTokenStorage::with_token("")));
        assert!(!session.is_logged_in());
    }

    #[test]
    fn clones_share_the_token() {
        let session = SessionStore::default();
        let other = session.clone();

        session.set_token("t1");
        assert_eq!(other.token().as_deref(), Some("t1"));

        other.clear();
        assert!(!session.is_logged_in());
    }

    #[test]
    fn writes_through_to_storage() {
        let storage = Arc::new(MemoryTokenStorage::default());
        let session = SessionStore::new(storage.clone());

        session.set_token("persisted");
        assert_eq!(
            storage.load().expect("memory storage").as_deref(),
            Some("persisted")
        );

        session.clear();
        assert_eq!(storage.load().expect("memory storage"), None);
    }

    #[test]
    fn storage_failures_do_not_block_state_changes() {
        let session = SessionStore::new(Arc::new(FailingStorage));
        assert!(!session.is_logged_in());

        session.set_token("t");
        assert!(session.is_logged_in());

        session.clear();
        assert!(!session.is_logged_in());
    }
}
