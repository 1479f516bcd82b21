//! Product routes: CRUD, stock adjustment, and low-stock alerts.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{
    CreateProduct, LowStockFilter, LowStockProduct, ProductListFilter, ProductWithCategory,
    UpdateProduct, UpdateStock,
};
use crate::services::product as product_service;
use crate::AppState;

/// Default for the low-stock endpoint when no threshold is supplied.
const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

/// GET /api/v1/products — list products with filters, search, and pagination.
pub async fn list(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
    Query(filters): Query<ProductListFilter>,
) -> Result<Json<ApiResponse<PagedResult<ProductWithCategory>>>, AppError> {
    let result = product_service::list(&state.db, &filters, &pagination).await?;
    Ok(ApiResponse::success(result))
}

/// POST /api/v1/products — create a new product.
pub async fn create(
    State(state): State<AppState>,
    Json(body): Json<CreateProduct>,
) -> Result<Json<ApiResponse<ProductWithCategory>>, AppError> {
    body.validate()?;
    let product = product_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(product))
}

/// GET /api/v1/products/low-stock — products at or below a stock threshold.
pub async fn low_stock(
    State(state): State<AppState>,
    Query(filter): Query<LowStockFilter>,
) -> Result<Json<ApiResponse<Vec<LowStockProduct>>>, AppError> {
    let threshold = filter.minimum_stock.unwrap_or(DEFAULT_LOW_STOCK_THRESHOLD);
    let products = product_service::low_stock(&state.db, threshold).await?;
    Ok(ApiResponse::success(products))
}

/// GET /api/v1/products/{id} — get product by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ProductWithCategory>>, AppError> {
    let product = product_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(product))
}

/// PUT /api/v1/products/{id} — update product.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateProduct>,
) -> Result<Json<ApiResponse<ProductWithCategory>>, AppError> {
    body.validate()?;
    let product = product_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(product))
}

/// DELETE /api/v1/products/{id} — delete product.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, AppError> {
    product_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success_with_message(
        true,
        "Product deleted successfully",
    ))
}

/// PUT /api/v1/products/{id}/stock — set the stock level of a product.
pub async fn update_stock(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStock>,
) -> Result<Json<ApiResponse<ProductWithCategory>>, AppError> {
    body.validate()?;
    let product = product_service::update_stock(&state.db, id, &body).await?;
    Ok(ApiResponse::success_with_message(
        product,
        "Stock updated successfully",
    ))
}
