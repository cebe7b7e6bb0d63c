use std::sync::{Mutex, MutexGuard};

use log::{debug, info};

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::ProductStore;
use crate::storage::types::{next_product_id, Product, ProductDraft, ProductPatch};

/// Volatile backend keeping the collection in a mutex-guarded vector.
/// Used by tests and as the zero-setup backend; contents vanish on drop.
pub struct MemoryStorage {
    products: Mutex<Vec<Product>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self {
            products: Mutex::new(Vec::new()),
        }
    }

    fn guard(&self) -> Result<MutexGuard<'_, Vec<Product>>, StorageError> {
        self.products.lock().map_err(|_| StorageError::ReadFailed)
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl ProductStore for MemoryStorage {
    fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        let products = self.guard()?;
        debug!("Listing {} product(s) from memory", products.len());
        Ok(products.clone())
    }

    fn add_product(&self, draft: ProductDraft) -> Result<Product, StorageError> {
        let mut products = self.guard()?;
        let id = next_product_id(|candidate| products.iter().any(|p| p.id == candidate));
        let product = draft.into_product(id);
        products.push(product.clone());
        info!("Added product {} ({})", product.id, product.name);
        Ok(product)
    }

    fn update_product(&self, id: &str, patch: ProductPatch) -> Result<(), StorageError> {
        let mut products = self.guard()?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StorageError::NotFound)?;
        patch.apply_to(product);
        info!("Updated product {}", id);
        Ok(())
    }

    fn delete_product(&self, id: &str) -> Result<(), StorageError> {
        let mut products = self.guard()?;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(StorageError::NotFound);
        }
        info!("Deleted product {}", id);
        Ok(())
    }

    fn dispatch_product(&self, id: &str) -> Result<(), StorageError> {
        let mut products = self.guard()?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StorageError::NotFound)?;
        if product.quantity == 0 {
            return Err(StorageError::OutOfStock);
        }
        product.dispatched = true;
        product.quantity -= 1;
        info!("Dispatched product {} ({} left)", id, product.quantity);
        Ok(())
    }
}
