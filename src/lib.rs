pub mod config;
pub mod models;
pub mod catalog;
pub mod storage;
pub mod services;

use tracing::info;

use catalog::SeatCatalog;
use services::{LoggingObserver, SeatSelectionEngine};
use storage::MemoryStore;

pub type Engine = SeatSelectionEngine<MemoryStore, LoggingObserver>;

// Состояние страницы: явно созданный движок вместо глобального синглтона
pub struct App {
    pub config: config::Config,
    pub engine: Engine,
}

impl App {
    pub fn new(config: config::Config, catalog: SeatCatalog) -> Self {
        let store = MemoryStore::from_config(&config.storage);
        let engine = SeatSelectionEngine::with_observer(catalog, store, LoggingObserver)
            .with_storage_key(config.storage.selection_key.clone());

        info!(
            "Seat selection ready: {} seats, storage key '{}'",
            engine.catalog().len(),
            engine.storage_key()
        );

        Self { config, engine }
    }

    /// Схема зала из конфига
    pub fn from_config(config: config::Config) -> Result<Self, config::ConfigError> {
        let catalog = SeatCatalog::from_hall(&config.hall)?;
        Ok(Self::new(config, catalog))
    }
}
