//! Category routes: CRUD over the category catalog.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::category::{Category, CategoryListFilter, CreateCategory, UpdateCategory};
use crate::services::category as category_service;
use crate::AppState;

/// GET /api/v1/categories — list categories, active only by default.
pub async fn list(
    State(state): State<AppState>,
    _user: CurrentUser,
    Query(filter): Query<CategoryListFilter>,
) -> Result<Json<ApiResponse<Vec<Category>>>, AppError> {
    let categories =
        category_service::list(&state.db, filter.include_inactive.unwrap_or(false)).await?;
    Ok(ApiResponse::success(categories))
}

/// POST /api/v1/categories — create a new category.
pub async fn create(
    State(state): State<AppState>,
    _user: CurrentUser,
    Json(body): Json<CreateCategory>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    body.validate()?;
    let category = category_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(category))
}

/// GET /api/v1/categories/{id} — get category by ID.
pub async fn get_by_id(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    let category = category_service::find_by_id(&state.db, id).await?;
    Ok(ApiResponse::success(category))
}

/// PUT /api/v1/categories/{id} — update category.
pub async fn update(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCategory>,
) -> Result<Json<ApiResponse<Category>>, AppError> {
    body.validate()?;
    let category = category_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(category))
}

/// DELETE /api/v1/categories/{id} — delete category if no products reference it.
pub async fn delete(
    State(state): State<AppState>,
    _user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<bool>>, AppError> {
    category_service::delete(&state.db, id).await?;
    Ok(ApiResponse::success_with_message(
        true,
        "Category deleted successfully",
    ))
}
