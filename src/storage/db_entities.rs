//! SeaORM entity models used by the database storage backend.
//!
//! These structs map to the SQLite table created by `database_storage`:
//! - `products`: the full inventory collection, one row per product

use sea_orm::entity::prelude::*;

/// Products table entity model.
///
/// Stores timestamps as RFC3339 strings and quantity as a 64-bit integer
/// for portability.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    /// Time-derived decimal string primary key
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    /// Product name
    pub name: String,
    /// Free-text description
    pub description: String,
    /// Free-text category
    pub category: String,
    /// Unit price
    pub price: f64,
    /// Units in stock as 64-bit integer
    pub quantity: i64,
    /// Set once the product has ever been dispatched
    pub dispatched: bool,
    /// RFC3339 creation timestamp
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
