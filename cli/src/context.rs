//! Shared handles every command works with.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use tracing::{debug, instrument};
use userdesk_business::users::{QueryParams, TokioClock, UsersController, UsersRuntime};
use userdesk_business::{ApiClient, BusinessConfig, SessionStore, TokenStorage};

use crate::config::FileTokenStorage;

/// Configuration plus the session and the client built on it.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: BusinessConfig,
    pub session: SessionStore,
    pub client: ApiClient,
}

impl AppContext {
    pub fn new(config: BusinessConfig, storage: Arc<dyn TokenStorage>) -> Self {
        let session = SessionStore::new(storage);
        let client = ApiClient::new(config.clone(), session.clone());
        Self {
            config,
            session,
            client,
        }
    }

    /// Read `USERDESK_*` variables, apply the `--api-url` override and open the credential file.
    #[instrument(skip_all, name = "context")]
    pub fn from_env(api_url: Option<String>) -> Result<Self> {
        let mut config = BusinessConfig::from_env().context("Invalid USERDESK_* configuration")?;
        if let Some(url) = api_url {
            config.api_base_url = url;
        }
        let storage = FileTokenStorage::open_default()?;
        debug!(
            api = %config.api_base_url,
            credentials = %storage.path().display(),
            "Loaded configuration"
        );
        Ok(Self::new(config, Arc::new(storage)))
    }

    /// A runtime for the user list, starting at `query`.
    pub fn users_runtime(&self, query: Option<QueryParams>) -> UsersRuntime {
        let clock = TokioClock::shared();
        let mut controller = UsersController::new(&self.config, self.session.clone(), clock.clone());
        if let Some(query) = query {
            controller = controller.with_query(query);
        }
        UsersRuntime::new(controller, self.client.clone(), clock)
    }
}
