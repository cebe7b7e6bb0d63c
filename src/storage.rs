//! Storage subsystem
//!
//! This module provides abstractions and implementations for persisting
//! the product catalog.
//!
//! Components:
//! - `storage_trait`: the ProductStore trait defining a uniform API.
//! - `types`: shared data types used by storage backends.
//! - `memory_storage`: in-memory implementation for tests and ephemeral runs.
//! - `file_storage`: filesystem-backed implementation persisting a JSON document.
//! - `database_storage`: ORM-based SQLite implementation using SeaORM.
//! - `db_entities`: SeaORM entity models for the database backend.

pub mod database_storage;
pub mod db_entities;
pub mod file_storage;
pub mod memory_storage;
pub mod storage_trait;
pub mod types;
