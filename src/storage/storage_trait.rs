//! Storage Trait
//!
//! This module defines the `ProductStore` trait, which provides an interface
//! for inventory persistence backends.
//!
//! Implementors of this trait are responsible for:
//! - Persisting and retrieving the product collection
//! - Assigning ids and creation timestamps on add
//! - Applying partial updates, deletions and dispatches
//!
//! All methods return a `Result` to handle not-found, out-of-stock and
//! backend I/O conditions.

use crate::error_handling::types::StorageError;
use crate::storage::types::{Product, ProductDraft, ProductPatch};

/// The `ProductStore` trait defines the interface for inventory persistence
/// backends.
///
/// Every operation is a synchronous read-modify-write over the full
/// collection; implementors serialize concurrent callers behind a single
/// guard so interleaved operations cannot lose updates.
pub trait ProductStore: Send + Sync {
    /// Returns the full current collection, in insertion order. An empty
    /// store yields an empty vector.
    fn list_products(&self) -> Result<Vec<Product>, StorageError>;

    /// Assigns a unique time-derived id and a creation timestamp to the
    /// draft, appends it to the collection and persists. Returns the
    /// created product. Field values are stored as given; validation is
    /// the caller's concern.
    fn add_product(&self, draft: ProductDraft) -> Result<Product, StorageError>;

    /// Shallow-merges the patch over the product with the given id and
    /// persists. `NotFound` if no product matches; an empty patch on an
    /// existing id succeeds without changing anything.
    fn update_product(&self, id: &str, patch: ProductPatch) -> Result<(), StorageError>;

    /// Removes the product with the given id and persists. `NotFound` if
    /// no product matches (the collection is left unchanged).
    fn delete_product(&self, id: &str) -> Result<(), StorageError>;

    /// Marks the product as dispatched and decrements its quantity by
    /// exactly one. `NotFound` if no product matches, `OutOfStock` if the
    /// quantity is already zero; in both cases nothing is persisted.
    fn dispatch_product(&self, id: &str) -> Result<(), StorageError>;
}
