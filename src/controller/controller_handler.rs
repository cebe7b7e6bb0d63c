use std::sync::Arc;

use log::{error, info};
use tokio::task;

use crate::configuration::config::Config;
use crate::configuration::types::BackendKind;
use crate::error_handling::types::{ControllerError, StorageError};
use crate::storage::database_storage::DatabaseStorage;
use crate::storage::file_storage::FileStorage;
use crate::storage::memory_storage::MemoryStorage;
use crate::storage::storage_trait::ProductStore;
use crate::web_interface::web_server::WebServer;

/// Wires the configured storage backend to the web panel and keeps it running.
pub struct Controller {
    pub config: Config,
}

impl Controller {
    pub fn new(config: Config) -> Result<Self, ControllerError> {
        info!("[+] Creating controller");
        config.validate().map_err(|err| {
            error!("[!] Rejected configuration: {}", err);
            err
        })?;
        Ok(Self { config })
    }

    /// Builds the storage backend the configuration selects.
    ///
    /// The database backend owns its own runtime, so this must run on a plain
    /// thread, never on an async executor.
    fn build_store(config: &Config) -> Result<Arc<dyn ProductStore>, StorageError> {
        let store: Arc<dyn ProductStore> = match config.storage.backend {
            BackendKind::Memory => Arc::new(MemoryStorage::new()),
            BackendKind::File => Arc::new(FileStorage::new(config.storage.file_path.clone())?),
            BackendKind::Database => {
                Arc::new(DatabaseStorage::new_file(config.storage.database_path.clone())?)
            }
        };
        Ok(store)
    }

    pub async fn run(&mut self) -> Result<(), ControllerError> {
        info!(
            "[+] Starting with {:?} storage backend",
            self.config.storage.backend
        );

        let config = self.config.clone();
        let storage = task::spawn_blocking(move || Self::build_store(&config))
            .await
            .map_err(|e| ControllerError::InitializationFailed(e.to_string()))??;

        let server = WebServer::new(
            storage,
            self.config.auth.clone(),
            self.config.inventory.clone(),
        );
        server
            .start(&self.config.bind_address, self.config.web_ui_port)
            .await?;
        Ok(())
    }
}
