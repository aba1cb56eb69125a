//! # Product Routes
//!
//! Catalog CRUD under `/api/produk`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use kasir_core::validation::validate_product_input;
use kasir_core::{Product, ProductId, ProductInput};

use super::MessageResponse;
use crate::error::ApiError;
use crate::state::AppState;

/// `GET /api/produk`
pub async fn list(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Product>>, ApiError> {
    Ok(Json(state.catalog.list_products().await?))
}

/// `GET /api/produk/{id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>, ApiError> {
    state
        .catalog
        .get_product(id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Product", id))
}

/// `POST /api/produk`
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let Json(input) = payload?;
    validate_product_input(&input)?;

    let product = state.catalog.create_product(input).await?;
    info!(id = product.id, name = %product.name, "Product created");
    Ok((StatusCode::CREATED, Json(product)))
}

/// `PUT /api/produk/{id}`
pub async fn update(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProductId>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let Json(input) = payload?;
    validate_product_input(&input)?;

    let product = state.catalog.update_product(id, input).await?;
    info!(id = id, "Product updated");
    Ok(Json(product))
}

/// `DELETE /api/produk/{id}`
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<ProductId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.catalog.delete_product(id).await?;
    info!(id = id, "Product deleted");
    Ok(Json(MessageResponse::new("Product deleted")))
}
