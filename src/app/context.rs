use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{DashboardError, Result};
use crate::config::Config;
use crate::engine::{Aggregator, SearchEngine};
use crate::provider::ProviderGateway;
use crate::store::sqlite::SqliteStore;

pub struct AppContext {
    pub config: Config,
    pub store: Arc<SqliteStore>,
    pub gateway: ProviderGateway,
    pub aggregator: Aggregator,
    pub search: SearchEngine,
}

impl AppContext {
    pub fn new(config: Config, db_path: Option<PathBuf>) -> Result<Self> {
        let db_path = match db_path {
            Some(p) => p,
            None => Self::default_db_path()?,
        };

        let store = Arc::new(SqliteStore::new(&db_path)?);
        let gateway = ProviderGateway::from_config(&config.providers)?;
        Ok(Self::assemble(config, store, gateway))
    }

    /// Context backed by an in-memory database and the given providers.
    pub fn in_memory(gateway: ProviderGateway) -> Result<Self> {
        let store = Arc::new(SqliteStore::in_memory()?);
        Ok(Self::assemble(Config::default(), store, gateway))
    }

    fn assemble(config: Config, store: Arc<SqliteStore>, gateway: ProviderGateway) -> Self {
        let timeout = config.providers.provider_timeout();
        let aggregator = Aggregator::new(gateway.clone(), timeout)
            .with_concurrency(config.providers.max_concurrency);
        let search = SearchEngine::new(gateway.clone(), timeout);

        Self {
            config,
            store,
            gateway,
            aggregator,
            search,
        }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| DashboardError::Config("Could not find data directory".into()))?;
        let panorama_dir = data_dir.join("panorama");
        std::fs::create_dir_all(&panorama_dir)?;
        Ok(panorama_dir.join("panorama.db"))
    }
}
