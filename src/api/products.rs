//! Product endpoints - the read-only group

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;

use crate::api::{AppState, ErrorResponse};
use crate::entity::Product;

#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub products: Vec<Product>,
    pub count: usize,
}

/// GET /api/products
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProductListResponse>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    let products = store.get_products().map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )
    })?;
    let count = products.len();
    Ok(Json(ProductListResponse { products, count }))
}

/// GET /api/products/{id}
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(product_id): Path<i64>,
) -> Result<Json<Product>, (StatusCode, Json<ErrorResponse>)> {
    let store = state.store.lock().await;
    match store.get_product(product_id) {
        Ok(Some(product)) => Ok(Json(product)),
        Ok(None) => Err((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse::new("Product not found")),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse::new(&e.to_string())),
        )),
    }
}
