use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One inventory item. Field names keep the camelCase layout of the
/// persisted JSON document, so `createdAt` round-trips unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub dispatched: bool,
    pub created_at: DateTime<Utc>,
}

/// A product as submitted by the operator: everything except the
/// store-assigned `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub quantity: u32,
    pub dispatched: bool,
}

impl ProductDraft {
    /// Promote the draft to a full product under the given id, stamping
    /// the creation time.
    pub fn into_product(self, id: String) -> Product {
        Product {
            id,
            name: self.name,
            description: self.description,
            category: self.category,
            price: self.price,
            quantity: self.quantity,
            dispatched: self.dispatched,
            created_at: Utc::now(),
        }
    }
}

/// Partial update for a product. Unset fields keep their current value;
/// `id`, `created_at` and `dispatched` are never touched by an update.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<u32>,
}

impl ProductPatch {
    /// Shallow-merge the set fields over an existing product.
    pub fn apply_to(&self, product: &mut Product) {
        if let Some(ref name) = self.name {
            product.name = name.clone();
        }
        if let Some(ref description) = self.description {
            product.description = description.clone();
        }
        if let Some(ref category) = self.category {
            product.category = category.clone();
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(quantity) = self.quantity {
            product.quantity = quantity;
        }
    }
}

/// Allocate a new product id derived from the current time (Unix
/// milliseconds as a decimal string). `taken` reports whether a candidate
/// already exists in the collection; collisions bump the candidate until
/// it is unique.
pub fn next_product_id<F>(mut taken: F) -> String
where
    F: FnMut(&str) -> bool,
{
    let mut candidate = Utc::now().timestamp_millis();
    while taken(&candidate.to_string()) {
        candidate += 1;
    }
    candidate.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_allocation_bumps_on_collision() {
        let existing = vec![Utc::now().timestamp_millis().to_string()];
        let id = next_product_id(|candidate| existing.iter().any(|e| e == candidate));
        assert!(!existing.contains(&id));
        assert!(id.parse::<i64>().is_ok());
    }

    #[test]
    fn test_patch_merges_only_set_fields() {
        let draft = ProductDraft {
            name: "Desk lamp".into(),
            description: "Warm white".into(),
            category: "Lighting".into(),
            price: 24.5,
            quantity: 7,
            dispatched: false,
        };
        let mut product = draft.into_product("1".into());

        let patch = ProductPatch {
            price: Some(19.99),
            ..Default::default()
        };
        patch.apply_to(&mut product);

        assert_eq!(product.price, 19.99);
        assert_eq!(product.name, "Desk lamp");
        assert_eq!(product.quantity, 7);
        assert!(!product.dispatched);
    }

    #[test]
    fn test_product_json_uses_camel_case_created_at() {
        let product = ProductDraft {
            name: "Mug".into(),
            description: "Ceramic".into(),
            category: "Kitchen".into(),
            price: 8.0,
            quantity: 3,
            dispatched: false,
        }
        .into_product("1700000000000".into());

        let json = serde_json::to_string(&product).unwrap();
        assert!(json.contains("\"createdAt\""));
        assert!(!json.contains("\"created_at\""));

        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, "1700000000000");
        assert_eq!(back.quantity, 3);
    }
}
