use std::sync::Arc;
use tokio::sync::RwLock;

use crate::config::Config;
use crate::db::Store;
use crate::services::{AccountService, SeaOrmAccountService};

/// Per-process application state handed to every request handler.
///
/// The store handle lives here rather than in a process-wide global so that
/// tests can build their own state (including with an `AccountService`
/// double) without touching shared statics.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Config>>,

    pub store: Store,

    pub accounts: Arc<dyn AccountService>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let store = Store::new(&config.general.database_url()).await?;

        let accounts: Arc<dyn AccountService> = Arc::new(SeaOrmAccountService::new(
            store.clone(),
            config.security.clone(),
        ));

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            store,
            accounts,
        })
    }

    #[must_use]
    pub fn store(&self) -> &Store {
        &self.store
    }

    #[must_use]
    pub fn accounts(&self) -> &Arc<dyn AccountService> {
        &self.accounts
    }
}
