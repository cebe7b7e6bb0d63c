use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::storage::types::{Product, ProductDraft, ProductPatch};

/// API error payload
#[derive(Serialize)]
pub struct ApiError {
    pub message: String,
}

/// API success payload for mutations that return no resource
#[derive(Serialize)]
pub struct ApiMessage {
    pub message: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body of POST /api/products.
#[derive(Deserialize)]
pub struct NewProductRequest {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub quantity: i64,
    pub dispatched: Option<bool>,
}

impl NewProductRequest {
    /// Validates the payload and converts it into a draft the store accepts.
    ///
    /// Numeric bounds are enforced here, at the boundary, so no backend ever
    /// sees a negative, non-finite or overflowing value.
    pub fn into_draft(self) -> Result<ProductDraft, String> {
        if self.name.trim().is_empty() {
            return Err(String::from("name must not be empty"));
        }
        let price = check_price(self.price)?;
        let quantity = check_quantity(self.quantity)?;
        Ok(ProductDraft {
            name: self.name,
            description: self.description,
            category: self.category,
            price,
            quantity,
            dispatched: self.dispatched.unwrap_or(false),
        })
    }
}

/// Body of PATCH /api/products/:id. Absent fields are left unchanged.
///
/// The dispatched flag is deliberately not editable here; it only moves
/// through the dispatch route.
#[derive(Deserialize, Default)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub quantity: Option<i64>,
}

impl UpdateProductRequest {
    pub fn into_patch(self) -> Result<ProductPatch, String> {
        if let Some(name) = &self.name {
            if name.trim().is_empty() {
                return Err(String::from("name must not be empty"));
            }
        }
        let price = self.price.map(check_price).transpose()?;
        let quantity = self.quantity.map(check_quantity).transpose()?;
        Ok(ProductPatch {
            name: self.name,
            description: self.description,
            category: self.category,
            price,
            quantity,
        })
    }
}

fn check_price(price: f64) -> Result<f64, String> {
    if !price.is_finite() || price < 0.0 {
        return Err(String::from("price must be a non-negative finite number"));
    }
    Ok(price)
}

fn check_quantity(quantity: i64) -> Result<u32, String> {
    u32::try_from(quantity).map_err(|_| String::from("quantity must be a non-negative integer"))
}

/// Aggregated catalog figures served by GET /api/stats.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventorySummary {
    pub total_products: usize,
    pub total_value: f64,
    pub low_stock_count: usize,
    pub dispatched_count: usize,
    pub low_stock_threshold: u32,
}

impl InventorySummary {
    /// Derives the summary from the current catalog; nothing here is stored.
    pub fn from_products(products: &[Product], low_stock_threshold: u32) -> Self {
        Self {
            total_products: products.len(),
            total_value: products
                .iter()
                .map(|p| p.price * f64::from(p.quantity))
                .sum(),
            low_stock_count: products
                .iter()
                .filter(|p| p.quantity < low_stock_threshold)
                .count(),
            dispatched_count: products.iter().filter(|p| p.dispatched).count(),
            low_stock_threshold,
        }
    }
}

/// Shared sign-in flag checked by every gated route.
///
/// A single boolean covers the whole panel; there are no per-client
/// sessions. Cloning hands out another handle to the same flag.
#[derive(Clone, Default)]
pub struct AuthFlag {
    signed_in: Arc<AtomicBool>,
}

impl AuthFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(&self) -> bool {
        self.signed_in.load(Ordering::SeqCst)
    }

    pub fn sign_in(&self) {
        self.signed_in.store(true, Ordering::SeqCst);
    }

    pub fn sign_out(&self) {
        self.signed_in.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(price: f64, quantity: u32, dispatched: bool) -> Product {
        Product {
            id: String::from("1"),
            name: String::from("item"),
            description: String::new(),
            category: String::from("general"),
            price,
            quantity,
            dispatched,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_new_product_request_bounds() {
        let request = NewProductRequest {
            name: String::from("lamp"),
            description: String::from("desk lamp"),
            category: String::from("Electronics"),
            price: 20.0,
            quantity: 3,
            dispatched: None,
        };
        let draft = request.into_draft().unwrap();
        assert_eq!(draft.quantity, 3);
        assert!(!draft.dispatched);

        let negative_price = NewProductRequest {
            name: String::from("lamp"),
            description: String::new(),
            category: String::new(),
            price: -1.0,
            quantity: 3,
            dispatched: None,
        };
        assert!(negative_price.into_draft().is_err());

        let nan_price = NewProductRequest {
            name: String::from("lamp"),
            description: String::new(),
            category: String::new(),
            price: f64::NAN,
            quantity: 3,
            dispatched: None,
        };
        assert!(nan_price.into_draft().is_err());

        let negative_quantity = NewProductRequest {
            name: String::from("lamp"),
            description: String::new(),
            category: String::new(),
            price: 1.0,
            quantity: -4,
            dispatched: None,
        };
        assert!(negative_quantity.into_draft().is_err());

        let blank_name = NewProductRequest {
            name: String::from("   "),
            description: String::new(),
            category: String::new(),
            price: 1.0,
            quantity: 0,
            dispatched: None,
        };
        assert!(blank_name.into_draft().is_err());
    }

    #[test]
    fn test_update_request_checks_only_given_fields() {
        let request = UpdateProductRequest {
            price: Some(9.5),
            ..Default::default()
        };
        let patch = request.into_patch().unwrap();
        assert_eq!(patch.price, Some(9.5));
        assert_eq!(patch.quantity, None);

        let request = UpdateProductRequest {
            quantity: Some(-1),
            ..Default::default()
        };
        assert!(request.into_patch().is_err());

        let request = UpdateProductRequest {
            price: Some(f64::INFINITY),
            ..Default::default()
        };
        assert!(request.into_patch().is_err());
    }

    #[test]
    fn test_summary_counts() {
        let products = vec![
            product(10.0, 2, false),
            product(5.0, 20, true),
            product(1.0, 0, true),
        ];
        let summary = InventorySummary::from_products(&products, 10);
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.total_value, 120.0);
        assert_eq!(summary.low_stock_count, 2);
        assert_eq!(summary.dispatched_count, 2);
        assert_eq!(summary.low_stock_threshold, 10);
    }

    #[test]
    fn test_auth_flag_is_shared_between_clones() {
        let flag = AuthFlag::new();
        let other = flag.clone();
        assert!(!flag.signed_in());

        other.sign_in();
        assert!(flag.signed_in());

        flag.sign_out();
        assert!(!other.signed_in());
    }
}
