use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, error, info};

use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::ProductStore;
use crate::storage::types::{next_product_id, Product, ProductDraft, ProductPatch};

/// File-backed store keeping the whole collection as one JSON array in a
/// single document, the file-system analogue of the original one-key
/// layout. Every operation reads the full document, mutates it in memory
/// and rewrites it, serialized behind one guard.
pub struct FileStorage {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileStorage {
    /// Default document filename used inside the storage directory.
    const DEFAULT_DOCUMENT: &'static str = "products.json";

    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    error!("Failed to create storage dir {}: {}", parent.display(), e);
                    StorageError::WriteFailed
                })?;
            }
        }
        info!("FileStorage initialized at {}", path.display());
        Ok(Self {
            path,
            guard: Mutex::new(()),
        })
    }

    /// Construct FileStorage using env var SHOPKEEP_STORE_DIR if set,
    /// otherwise the current directory, with the default document name.
    pub fn new_default() -> Result<Self, StorageError> {
        if let Ok(dir) = std::env::var("SHOPKEEP_STORE_DIR") {
            info!("Using FileStorage from SHOPKEEP_STORE_DIR: {}", dir);
            return Self::new(PathBuf::from(dir).join(Self::DEFAULT_DOCUMENT));
        }
        let cwd = std::env::current_dir().map_err(|e| {
            error!("Failed to get current dir: {}", e);
            StorageError::ReadFailed
        })?;
        info!("Using FileStorage at current directory: {}", cwd.display());
        Self::new(cwd.join(Self::DEFAULT_DOCUMENT))
    }

    fn load_document(&self) -> Result<Vec<Product>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = fs::read_to_string(&self.path).map_err(|e| {
            error!("Failed to read {}: {}", self.path.display(), e);
            StorageError::ReadFailed
        })?;
        let products: Vec<Product> = serde_json::from_str(&raw).map_err(|e| {
            error!("Failed to decode {}: {}", self.path.display(), e);
            StorageError::ReadFailed
        })?;
        debug!(
            "Loaded {} product(s) from {}",
            products.len(),
            self.path.display()
        );
        Ok(products)
    }

    fn store_document(&self, products: &[Product]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(products).map_err(|e| {
            error!("Failed to encode product document: {}", e);
            StorageError::WriteFailed
        })?;
        fs::write(&self.path, raw).map_err(|e| {
            error!("Failed to write {}: {}", self.path.display(), e);
            StorageError::WriteFailed
        })?;
        debug!(
            "Saved {} product(s) to {}",
            products.len(),
            self.path.display()
        );
        Ok(())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StorageError> {
        self.guard.lock().map_err(|_| StorageError::ReadFailed)
    }
}

impl ProductStore for FileStorage {
    fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        let _guard = self.lock()?;
        self.load_document()
    }

    fn add_product(&self, draft: ProductDraft) -> Result<Product, StorageError> {
        let _guard = self.lock()?;
        let mut products = self.load_document()?;
        let id = next_product_id(|candidate| products.iter().any(|p| p.id == candidate));
        let product = draft.into_product(id);
        products.push(product.clone());
        self.store_document(&products)?;
        info!("Added product {} ({})", product.id, product.name);
        Ok(product)
    }

    fn update_product(&self, id: &str, patch: ProductPatch) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        let mut products = self.load_document()?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StorageError::NotFound)?;
        patch.apply_to(product);
        self.store_document(&products)?;
        info!("Updated product {}", id);
        Ok(())
    }

    fn delete_product(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        let mut products = self.load_document()?;
        let before = products.len();
        products.retain(|p| p.id != id);
        if products.len() == before {
            return Err(StorageError::NotFound);
        }
        self.store_document(&products)?;
        info!("Deleted product {}", id);
        Ok(())
    }

    fn dispatch_product(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        let mut products = self.load_document()?;
        let product = products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(StorageError::NotFound)?;
        if product.quantity == 0 {
            return Err(StorageError::OutOfStock);
        }
        product.dispatched = true;
        product.quantity -= 1;
        let remaining = product.quantity;
        self.store_document(&products)?;
        info!("Dispatched product {} ({} left)", id, remaining);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn draft(name: &str, quantity: u32) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: format!("{} description", name),
            category: "general".to_string(),
            price: 4.25,
            quantity,
            dispatched: false,
        }
    }

    #[test]
    fn test_absent_document_lists_empty() {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(dir.path().join("products.json")).unwrap();
        assert!(storage.list_products().unwrap().is_empty());
    }

    #[test]
    fn test_collection_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");

        let created = {
            let storage = FileStorage::new(&path).unwrap();
            storage.add_product(draft("shelf", 4)).unwrap()
        };

        let reopened = FileStorage::new(&path).unwrap();
        let all = reopened.list_products().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, created.id);
        assert_eq!(all[0].name, "shelf");
        assert_eq!(all[0].created_at, created.created_at);
    }

    #[test]
    fn test_update_missing_leaves_document_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        let storage = FileStorage::new(&path).unwrap();
        storage.add_product(draft("bin", 1)).unwrap();
        let before = fs::read_to_string(&path).unwrap();

        let result = storage.update_product("absent", ProductPatch::default());
        assert_eq!(result, Err(StorageError::NotFound));
        assert_eq!(fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_malformed_document_is_read_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("products.json");
        fs::write(&path, "{not json").unwrap();
        let storage = FileStorage::new(&path).unwrap();
        assert_eq!(storage.list_products(), Err(StorageError::ReadFailed));
    }

    #[test]
    #[serial]
    fn test_new_default_honors_env_dir() {
        let dir = TempDir::new().unwrap();
        std::env::set_var("SHOPKEEP_STORE_DIR", dir.path());
        let storage = FileStorage::new_default().unwrap();
        std::env::remove_var("SHOPKEEP_STORE_DIR");

        storage.add_product(draft("pallet", 2)).unwrap();
        assert!(dir.path().join("products.json").exists());
    }
}
