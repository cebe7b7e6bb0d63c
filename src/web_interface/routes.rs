use std::sync::Arc;

use log::{info, warn};
use tokio::task;
use warp::{http::StatusCode, reply, Filter, Rejection, Reply};

use super::assets::serve_asset;
use super::types::{
    ApiError, ApiMessage, AuthFlag, InventorySummary, LoginRequest, NewProductRequest,
    UpdateProductRequest,
};
use crate::configuration::types::{AuthSettings, InventorySettings};
use crate::error_handling::types::StorageError;
use crate::storage::storage_trait::ProductStore;

fn require_sign_in(auth: &AuthFlag) -> Option<warp::reply::Response> {
    if auth.signed_in() {
        return None;
    }
    Some(
        reply::with_status(
            reply::json(&ApiError {
                message: "Not signed in".to_string(),
            }),
            StatusCode::UNAUTHORIZED,
        )
        .into_response(),
    )
}

/// GET /
pub fn index_route() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path::end()
        .and(warp::get())
        .and_then(|| async move { Ok::<_, Rejection>(serve_asset("index.html")) })
}

/// GET /assets/:file
pub fn asset_route() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path("assets")
        .and(warp::path::tail())
        .and(warp::get())
        .and_then(|tail: warp::path::Tail| async move {
            Ok::<_, Rejection>(serve_asset(tail.as_str()))
        })
}

/// POST /api/login
pub fn login_route(
    auth: AuthFlag,
    settings: AuthSettings,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "login")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(move |request: LoginRequest| {
            let auth = auth.clone();
            let settings = settings.clone();
            async move {
                if request.username == settings.username && request.password == settings.password {
                    auth.sign_in();
                    info!("Panel sign-in for {}", request.username);
                    Ok::<_, Rejection>(reply::with_status(
                        reply::json(&ApiMessage {
                            message: "Signed in".to_string(),
                        }),
                        StatusCode::OK,
                    ))
                } else {
                    warn!("Rejected sign-in attempt for {}", request.username);
                    Ok::<_, Rejection>(reply::with_status(
                        reply::json(&ApiError {
                            message: "Invalid credentials".to_string(),
                        }),
                        StatusCode::UNAUTHORIZED,
                    ))
                }
            }
        })
}

/// POST /api/logout
pub fn logout_route(auth: AuthFlag) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "logout")
        .and(warp::post())
        .and_then(move || {
            let auth = auth.clone();
            async move {
                auth.sign_out();
                info!("Panel sign-out");
                Ok::<_, Rejection>(reply::with_status(
                    reply::json(&ApiMessage {
                        message: "Signed out".to_string(),
                    }),
                    StatusCode::OK,
                ))
            }
        })
}

/// GET /api/products
pub fn list_products_route(
    storage: Arc<dyn ProductStore>,
    auth: AuthFlag,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "products")
        .and(warp::get())
        .and_then(move || {
            let storage = storage.clone();
            let auth = auth.clone();
            async move {
                if let Some(denied) = require_sign_in(&auth) {
                    return Ok::<_, Rejection>(denied);
                }
                let loaded = task::spawn_blocking(move || storage.list_products()).await;
                let res = match loaded {
                    Ok(Ok(list)) => {
                        reply::with_status(reply::json(&list), StatusCode::OK).into_response()
                    }
                    _ => reply::with_status(
                        reply::json(&ApiError {
                            message: "Failed to load products".to_string(),
                        }),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into_response(),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// POST /api/products
pub fn add_product_route(
    storage: Arc<dyn ProductStore>,
    auth: AuthFlag,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "products")
        .and(warp::post())
        .and(warp::body::json())
        .and_then(move |request: NewProductRequest| {
            let storage = storage.clone();
            let auth = auth.clone();
            async move {
                if let Some(denied) = require_sign_in(&auth) {
                    return Ok::<_, Rejection>(denied);
                }
                let draft = match request.into_draft() {
                    Ok(draft) => draft,
                    Err(message) => {
                        return Ok::<_, Rejection>(
                            reply::with_status(
                                reply::json(&ApiError { message }),
                                StatusCode::BAD_REQUEST,
                            )
                            .into_response(),
                        )
                    }
                };
                let added = task::spawn_blocking(move || storage.add_product(draft)).await;
                let res = match added {
                    Ok(Ok(product)) => {
                        reply::with_status(reply::json(&product), StatusCode::CREATED)
                            .into_response()
                    }
                    _ => reply::with_status(
                        reply::json(&ApiError {
                            message: "Failed to add product".to_string(),
                        }),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into_response(),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// PATCH /api/products/:id
pub fn update_product_route(
    storage: Arc<dyn ProductStore>,
    auth: AuthFlag,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "products" / String)
        .and(warp::patch())
        .and(warp::body::json())
        .and_then(move |id: String, request: UpdateProductRequest| {
            let storage = storage.clone();
            let auth = auth.clone();
            async move {
                if let Some(denied) = require_sign_in(&auth) {
                    return Ok::<_, Rejection>(denied);
                }
                let patch = match request.into_patch() {
                    Ok(patch) => patch,
                    Err(message) => {
                        return Ok::<_, Rejection>(
                            reply::with_status(
                                reply::json(&ApiError { message }),
                                StatusCode::BAD_REQUEST,
                            )
                            .into_response(),
                        )
                    }
                };
                let updated =
                    task::spawn_blocking(move || storage.update_product(&id, patch)).await;
                let res = match updated {
                    Ok(Ok(())) => reply::with_status(
                        reply::json(&ApiMessage {
                            message: "Product updated".to_string(),
                        }),
                        StatusCode::OK,
                    )
                    .into_response(),
                    Ok(Err(StorageError::NotFound)) => reply::with_status(
                        reply::json(&ApiError {
                            message: "Product not found".to_string(),
                        }),
                        StatusCode::NOT_FOUND,
                    )
                    .into_response(),
                    _ => reply::with_status(
                        reply::json(&ApiError {
                            message: "Failed to update product".to_string(),
                        }),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into_response(),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// DELETE /api/products/:id
pub fn delete_product_route(
    storage: Arc<dyn ProductStore>,
    auth: AuthFlag,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "products" / String)
        .and(warp::delete())
        .and_then(move |id: String| {
            let storage = storage.clone();
            let auth = auth.clone();
            async move {
                if let Some(denied) = require_sign_in(&auth) {
                    return Ok::<_, Rejection>(denied);
                }
                let deleted = task::spawn_blocking(move || storage.delete_product(&id)).await;
                let res = match deleted {
                    Ok(Ok(())) => reply::with_status(
                        reply::json(&ApiMessage {
                            message: "Product deleted".to_string(),
                        }),
                        StatusCode::OK,
                    )
                    .into_response(),
                    Ok(Err(StorageError::NotFound)) => reply::with_status(
                        reply::json(&ApiError {
                            message: "Product not found".to_string(),
                        }),
                        StatusCode::NOT_FOUND,
                    )
                    .into_response(),
                    _ => reply::with_status(
                        reply::json(&ApiError {
                            message: "Failed to delete product".to_string(),
                        }),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into_response(),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// POST /api/products/:id/dispatch
pub fn dispatch_product_route(
    storage: Arc<dyn ProductStore>,
    auth: AuthFlag,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "products" / String / "dispatch")
        .and(warp::post())
        .and_then(move |id: String| {
            let storage = storage.clone();
            let auth = auth.clone();
            async move {
                if let Some(denied) = require_sign_in(&auth) {
                    return Ok::<_, Rejection>(denied);
                }
                let dispatched = task::spawn_blocking(move || storage.dispatch_product(&id)).await;
                let res = match dispatched {
                    Ok(Ok(())) => reply::with_status(
                        reply::json(&ApiMessage {
                            message: "Product dispatched".to_string(),
                        }),
                        StatusCode::OK,
                    )
                    .into_response(),
                    Ok(Err(StorageError::NotFound)) => reply::with_status(
                        reply::json(&ApiError {
                            message: "Product not found".to_string(),
                        }),
                        StatusCode::NOT_FOUND,
                    )
                    .into_response(),
                    Ok(Err(StorageError::OutOfStock)) => reply::with_status(
                        reply::json(&ApiError {
                            message: "Insufficient stock for dispatch".to_string(),
                        }),
                        StatusCode::CONFLICT,
                    )
                    .into_response(),
                    _ => reply::with_status(
                        reply::json(&ApiError {
                            message: "Failed to dispatch product".to_string(),
                        }),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into_response(),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// GET /api/stats
pub fn stats_route(
    storage: Arc<dyn ProductStore>,
    auth: AuthFlag,
    low_stock_threshold: u32,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    warp::path!("api" / "stats")
        .and(warp::get())
        .and_then(move || {
            let storage = storage.clone();
            let auth = auth.clone();
            async move {
                if let Some(denied) = require_sign_in(&auth) {
                    return Ok::<_, Rejection>(denied);
                }
                let loaded = task::spawn_blocking(move || storage.list_products()).await;
                let res = match loaded {
                    Ok(Ok(products)) => reply::with_status(
                        reply::json(&InventorySummary::from_products(
                            &products,
                            low_stock_threshold,
                        )),
                        StatusCode::OK,
                    )
                    .into_response(),
                    _ => reply::with_status(
                        reply::json(&ApiError {
                            message: "Failed to load products".to_string(),
                        }),
                        StatusCode::INTERNAL_SERVER_ERROR,
                    )
                    .into_response(),
                };
                Ok::<_, Rejection>(res)
            }
        })
}

/// Composes every panel route into the tree the server binds.
pub fn panel_routes(
    storage: Arc<dyn ProductStore>,
    auth: AuthFlag,
    auth_settings: AuthSettings,
    inventory: InventorySettings,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    index_route()
        .or(asset_route())
        .or(login_route(auth.clone(), auth_settings))
        .or(logout_route(auth.clone()))
        .or(list_products_route(storage.clone(), auth.clone()))
        .or(add_product_route(storage.clone(), auth.clone()))
        .or(update_product_route(storage.clone(), auth.clone()))
        .or(delete_product_route(storage.clone(), auth.clone()))
        .or(dispatch_product_route(storage.clone(), auth.clone()))
        .or(stats_route(storage, auth, inventory.low_stock_threshold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory_storage::MemoryStorage;
    use serde_json::{json, Value};

    fn panel(auth: AuthFlag) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        let storage: Arc<dyn ProductStore> = Arc::new(MemoryStorage::new());
        panel_routes(
            storage,
            auth,
            AuthSettings::default(),
            InventorySettings::default(),
        )
    }

    fn body_json(body: &[u8]) -> Value {
        serde_json::from_slice(body).unwrap()
    }

    #[tokio::test]
    async fn test_index_serves_the_panel_page() {
        let routes = panel(AuthFlag::new());

        let response = warp::test::request().path("/").reply(&routes).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("Content-Type").unwrap(),
            "text/html"
        );
        let page = String::from_utf8_lossy(response.body());
        assert!(page.contains("Inventory"));
    }

    #[tokio::test]
    async fn test_login_round_trip() {
        let auth = AuthFlag::new();
        let routes = panel(auth.clone());

        let rejected = warp::test::request()
            .method("POST")
            .path("/api/login")
            .json(&json!({"username": "vivekjadhav", "password": "wrong"}))
            .reply(&routes)
            .await;
        assert_eq!(rejected.status(), StatusCode::UNAUTHORIZED);
        assert!(!auth.signed_in());

        let accepted = warp::test::request()
            .method("POST")
            .path("/api/login")
            .json(&json!({"username": "vivekjadhav", "password": "vivek123"}))
            .reply(&routes)
            .await;
        assert_eq!(accepted.status(), StatusCode::OK);
        assert!(auth.signed_in());

        let out = warp::test::request()
            .method("POST")
            .path("/api/logout")
            .reply(&routes)
            .await;
        assert_eq!(out.status(), StatusCode::OK);
        assert!(!auth.signed_in());
    }

    #[tokio::test]
    async fn test_catalog_routes_require_sign_in() {
        let routes = panel(AuthFlag::new());

        let listed = warp::test::request().path("/api/products").reply(&routes).await;
        assert_eq!(listed.status(), StatusCode::UNAUTHORIZED);

        let added = warp::test::request()
            .method("POST")
            .path("/api/products")
            .json(&json!({
                "name": "lamp", "description": "", "category": "Electronics",
                "price": 10.0, "quantity": 1
            }))
            .reply(&routes)
            .await;
        assert_eq!(added.status(), StatusCode::UNAUTHORIZED);

        let stats = warp::test::request().path("/api/stats").reply(&routes).await;
        assert_eq!(stats.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_add_rejects_out_of_bounds_numbers() {
        let auth = AuthFlag::new();
        auth.sign_in();
        let routes = panel(auth);

        let negative_price = warp::test::request()
            .method("POST")
            .path("/api/products")
            .json(&json!({
                "name": "lamp", "description": "", "category": "Electronics",
                "price": -5.0, "quantity": 1
            }))
            .reply(&routes)
            .await;
        assert_eq!(negative_price.status(), StatusCode::BAD_REQUEST);

        let negative_quantity = warp::test::request()
            .method("POST")
            .path("/api/products")
            .json(&json!({
                "name": "lamp", "description": "", "category": "Electronics",
                "price": 5.0, "quantity": -1
            }))
            .reply(&routes)
            .await;
        assert_eq!(negative_quantity.status(), StatusCode::BAD_REQUEST);

        let blank_name = warp::test::request()
            .method("POST")
            .path("/api/products")
            .json(&json!({
                "name": " ", "description": "", "category": "Electronics",
                "price": 5.0, "quantity": 1
            }))
            .reply(&routes)
            .await;
        assert_eq!(blank_name.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_dispatch_conflict_and_not_found() {
        let auth = AuthFlag::new();
        auth.sign_in();
        let routes = panel(auth);

        let added = warp::test::request()
            .method("POST")
            .path("/api/products")
            .json(&json!({
                "name": "chair", "description": "", "category": "Other",
                "price": 30.0, "quantity": 1
            }))
            .reply(&routes)
            .await;
        assert_eq!(added.status(), StatusCode::CREATED);
        let id = body_json(added.body())["id"].as_str().unwrap().to_string();

        let first = warp::test::request()
            .method("POST")
            .path(&format!("/api/products/{id}/dispatch"))
            .reply(&routes)
            .await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = warp::test::request()
            .method("POST")
            .path(&format!("/api/products/{id}/dispatch"))
            .reply(&routes)
            .await;
        assert_eq!(second.status(), StatusCode::CONFLICT);

        let missing = warp::test::request()
            .method("POST")
            .path("/api/products/absent/dispatch")
            .reply(&routes)
            .await;
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_full_panel_flow() {
        let auth = AuthFlag::new();
        let routes = panel(auth);

        let signed_in = warp::test::request()
            .method("POST")
            .path("/api/login")
            .json(&json!({"username": "vivekjadhav", "password": "vivek123"}))
            .reply(&routes)
            .await;
        assert_eq!(signed_in.status(), StatusCode::OK);

        let added = warp::test::request()
            .method("POST")
            .path("/api/products")
            .json(&json!({
                "name": "monitor", "description": "27 inch", "category": "Electronics",
                "price": 120.0, "quantity": 4
            }))
            .reply(&routes)
            .await;
        assert_eq!(added.status(), StatusCode::CREATED);
        let created = body_json(added.body());
        assert!(created["createdAt"].is_string());
        let id = created["id"].as_str().unwrap().to_string();

        let listed = warp::test::request().path("/api/products").reply(&routes).await;
        assert_eq!(listed.status(), StatusCode::OK);
        let list = body_json(listed.body());
        assert_eq!(list.as_array().unwrap().len(), 1);

        let updated = warp::test::request()
            .method("PATCH")
            .path(&format!("/api/products/{id}"))
            .json(&json!({"price": 99.0}))
            .reply(&routes)
            .await;
        assert_eq!(updated.status(), StatusCode::OK);

        let stats = warp::test::request().path("/api/stats").reply(&routes).await;
        assert_eq!(stats.status(), StatusCode::OK);
        let summary = body_json(stats.body());
        assert_eq!(summary["totalProducts"], 1);
        assert_eq!(summary["totalValue"], 396.0);
        assert_eq!(summary["lowStockCount"], 1);
        assert_eq!(summary["dispatchedCount"], 0);

        let dispatched = warp::test::request()
            .method("POST")
            .path(&format!("/api/products/{id}/dispatch"))
            .reply(&routes)
            .await;
        assert_eq!(dispatched.status(), StatusCode::OK);

        let deleted = warp::test::request()
            .method("DELETE")
            .path(&format!("/api/products/{id}"))
            .reply(&routes)
            .await;
        assert_eq!(deleted.status(), StatusCode::OK);

        let update_missing = warp::test::request()
            .method("PATCH")
            .path(&format!("/api/products/{id}"))
            .json(&json!({"price": 1.0}))
            .reply(&routes)
            .await;
        assert_eq!(update_missing.status(), StatusCode::NOT_FOUND);

        let signed_out = warp::test::request()
            .method("POST")
            .path("/api/logout")
            .reply(&routes)
            .await;
        assert_eq!(signed_out.status(), StatusCode::OK);

        let gated = warp::test::request().path("/api/products").reply(&routes).await;
        assert_eq!(gated.status(), StatusCode::UNAUTHORIZED);
    }
}
