use std::env;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    Order, QueryOrder, Schema,
};

use crate::error_handling::types::StorageError;
use crate::storage::db_entities;
use crate::storage::storage_trait::ProductStore;
use crate::storage::types::{next_product_id, Product, ProductDraft, ProductPatch};

fn into_product(model: db_entities::Model) -> Result<Product, StorageError> {
    Ok(Product {
        id: model.id,
        name: model.name,
        description: model.description,
        category: model.category,
        price: model.price,
        quantity: u32::try_from(model.quantity).map_err(|_| StorageError::ReadFailed)?,
        dispatched: model.dispatched,
        created_at: DateTime::parse_from_rfc3339(&model.created_at)
            .map_err(|_| StorageError::ReadFailed)?
            .with_timezone(&Utc),
    })
}

fn active_from_product(product: &Product) -> db_entities::ActiveModel {
    db_entities::ActiveModel {
        id: Set(product.id.clone()),
        name: Set(product.name.clone()),
        description: Set(product.description.clone()),
        category: Set(product.category.clone()),
        price: Set(product.price),
        quantity: Set(i64::from(product.quantity)),
        dispatched: Set(product.dispatched),
        created_at: Set(product.created_at.to_rfc3339()),
    }
}

/// SQLite-backed store using SeaORM over a `products` table.
///
/// The synchronous trait is bridged to the async driver through a private
/// current-thread runtime, which blocks the calling thread; construct and
/// invoke this store off any async executor (e.g. via `spawn_blocking`).
/// The runtime alone does not exclude concurrent callers, so every
/// operation's read-modify-write runs behind one guard.
pub struct DatabaseStorage {
    rt: tokio::runtime::Runtime,
    conn: DatabaseConnection,
    guard: Mutex<()>,
}

impl DatabaseStorage {
    /// Default database filename used in the application's working directory
    const DEFAULT_DB_FILE: &'static str = "shopkeep.sqlite3";

    /// Create or open the database in the current working directory with the
    /// default filename
    pub fn new() -> Result<Self, StorageError> {
        let cwd = env::current_dir().map_err(|_| StorageError::ConnectionFailed)?;
        let path = cwd.join(Self::DEFAULT_DB_FILE);
        Self::new_file(path)
    }

    pub fn new_file<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|_| StorageError::ConnectionFailed)?;
        let path_ref = path.as_ref();
        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|_| StorageError::WriteFailed)?;
            }
        }
        let url = format!("sqlite://{}?mode=rwc", path_ref.display());
        let conn = rt.block_on(async {
            let conn = Database::connect(&url)
                .await
                .map_err(|_| StorageError::ConnectionFailed)?;
            let builder = conn.get_database_backend();
            let schema = Schema::new(builder);
            let mut create = schema.create_table_from_entity(db_entities::Entity);
            create.if_not_exists();
            conn.execute(builder.build(&create))
                .await
                .map_err(|_| StorageError::WriteFailed)?;
            Ok::<_, StorageError>(conn)
        })?;
        Ok(Self {
            rt,
            conn,
            guard: Mutex::new(()),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, ()>, StorageError> {
        self.guard.lock().map_err(|_| StorageError::ReadFailed)
    }
}

impl ProductStore for DatabaseStorage {
    fn list_products(&self) -> Result<Vec<Product>, StorageError> {
        let _guard = self.lock()?;
        self.rt.block_on(async {
            // rowid keeps insertion order; the string pk does not
            let rows = db_entities::Entity::find()
                .order_by(Expr::cust("rowid"), Order::Asc)
                .all(&self.conn)
                .await
                .map_err(|_| StorageError::ReadFailed)?;
            rows.into_iter().map(into_product).collect()
        })
    }

    fn add_product(&self, draft: ProductDraft) -> Result<Product, StorageError> {
        let _guard = self.lock()?;
        self.rt.block_on(async {
            let rows = db_entities::Entity::find()
                .all(&self.conn)
                .await
                .map_err(|_| StorageError::ReadFailed)?;
            let id = next_product_id(|candidate| rows.iter().any(|m| m.id == candidate));
            let product = draft.into_product(id);
            active_from_product(&product)
                .insert(&self.conn)
                .await
                .map_err(|_| StorageError::WriteFailed)?;
            Ok(product)
        })
    }

    fn update_product(&self, id: &str, patch: ProductPatch) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        self.rt.block_on(async {
            let model = db_entities::Entity::find_by_id(id.to_string())
                .one(&self.conn)
                .await
                .map_err(|_| StorageError::ReadFailed)?
                .ok_or(StorageError::NotFound)?;
            let mut product = into_product(model)?;
            patch.apply_to(&mut product);
            active_from_product(&product)
                .update(&self.conn)
                .await
                .map_err(|_| StorageError::WriteFailed)?;
            Ok(())
        })
    }

    fn delete_product(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        self.rt.block_on(async {
            let result = db_entities::Entity::delete_by_id(id.to_string())
                .exec(&self.conn)
                .await
                .map_err(|_| StorageError::WriteFailed)?;
            if result.rows_affected == 0 {
                return Err(StorageError::NotFound);
            }
            Ok(())
        })
    }

    fn dispatch_product(&self, id: &str) -> Result<(), StorageError> {
        let _guard = self.lock()?;
        self.rt.block_on(async {
            let model = db_entities::Entity::find_by_id(id.to_string())
                .one(&self.conn)
                .await
                .map_err(|_| StorageError::ReadFailed)?
                .ok_or(StorageError::NotFound)?;
            let mut product = into_product(model)?;
            if product.quantity == 0 {
                return Err(StorageError::OutOfStock);
            }
            product.dispatched = true;
            product.quantity -= 1;
            active_from_product(&product)
                .update(&self.conn)
                .await
                .map_err(|_| StorageError::WriteFailed)?;
            Ok(())
        })
    }
}
