use std::sync::Arc;

use arrshim_core::{AssociationStore, Config, DownloadEngine, StateMapper};

/// Shared application state
pub struct AppState {
    config: Config,
    store: Arc<dyn AssociationStore>,
    engine: Arc<dyn DownloadEngine>,
    mapper: StateMapper,
}

impl AppState {
    pub fn new(
        config: Config,
        store: Arc<dyn AssociationStore>,
        engine: Arc<dyn DownloadEngine>,
    ) -> Self {
        let mapper = StateMapper::from_config(&config);
        Self {
            config,
            store,
            engine,
            mapper,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &dyn AssociationStore {
        self.store.as_ref()
    }

    pub fn engine(&self) -> &dyn DownloadEngine {
        self.engine.as_ref()
    }

    pub fn mapper(&self) -> &StateMapper {
        &self.mapper
    }

    pub fn default_category(&self) -> &str {
        self.mapper.default_category()
    }

    pub fn download_dir(&self) -> &str {
        self.mapper.download_dir()
    }
}
