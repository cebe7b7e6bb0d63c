use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use log::info;

use super::routes::panel_routes;
use super::types::AuthFlag;
use crate::configuration::types::{AuthSettings, InventorySettings};
use crate::error_handling::types::WebError;
use crate::storage::storage_trait::ProductStore;

/// Web server for the panel API and its embedded frontend
pub struct WebServer {
    storage: Arc<dyn ProductStore>,
    auth: AuthFlag,
    auth_settings: AuthSettings,
    inventory: InventorySettings,
}

impl WebServer {
    /// Create a new WebServer instance
    pub fn new(
        storage: Arc<dyn ProductStore>,
        auth_settings: AuthSettings,
        inventory: InventorySettings,
    ) -> Self {
        Self {
            storage,
            auth: AuthFlag::new(),
            auth_settings,
            inventory,
        }
    }

    /// Start the web server on the given address and port
    pub async fn start(&self, bind_address: &str, port: u16) -> Result<(), WebError> {
        let ip: IpAddr = bind_address.parse().map_err(|_| {
            WebError::StartupFailed(format!("invalid bind address: {bind_address}"))
        })?;

        let routes = panel_routes(
            self.storage.clone(),
            self.auth.clone(),
            self.auth_settings.clone(),
            self.inventory.clone(),
        );

        let addr: SocketAddr = (ip, port).into();
        info!("Panel listening on http://{addr}");

        // Start server (warp 0.4)
        warp::serve(routes).run(addr).await;

        Ok(())
    }
}
