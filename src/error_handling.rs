//! Error types shared across the application.
//!
//! One enum per subsystem, each implementing `Display` and
//! `std::error::Error` so they compose into `ControllerError` at the top
//! level.

pub mod types;

pub use types::{ConfigError, ControllerError, StorageError, WebError};
