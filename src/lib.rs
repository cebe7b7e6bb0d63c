pub mod configuration;
pub mod controller;
pub mod error_handling;
pub mod storage;
pub mod web_interface;

pub use configuration::config::Config;
pub use controller::controller_handler::Controller;
pub use storage::storage_trait::ProductStore;
pub use storage::types::Product;
