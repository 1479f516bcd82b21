//! Category service: CRUD over the categories table.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::category::{Category, CreateCategory, UpdateCategory};

/// List categories, active-only unless `include_inactive` is set.
pub async fn list(pool: &PgPool, include_inactive: bool) -> Result<Vec<Category>, AppError> {
    let rows = if include_inactive {
        sqlx::query_as::<_, Category>("SELECT * FROM categories ORDER BY name ASC")
            .fetch_all(pool)
            .await?
    } else {
        sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE is_active = true ORDER BY name ASC",
        )
        .fetch_all(pool)
        .await?
    };
    Ok(rows)
}

/// Find category by ID.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Category, AppError> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
}

/// Create a new category.
pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, AppError> {
    let category = sqlx::query_as::<_, Category>(
        r#"
        INSERT INTO categories (name, description)
        VALUES ($1, $2)
        RETURNING *
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Full update of a category. The body id must match the path id; a missing
/// `isActive` keeps the stored flag.
pub async fn update(pool: &PgPool, id: Uuid, input: &UpdateCategory) -> Result<Category, AppError> {
    if input.id != id {
        return Err(AppError::Validation("ID mismatch".to_string()));
    }

    let existing = find_by_id(pool, id).await?;

    let category = sqlx::query_as::<_, Category>(
        r#"
        UPDATE categories SET
            name = $2,
            description = $3,
            is_active = $4,
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(existing.id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.is_active.unwrap_or(existing.is_active))
    .fetch_one(pool)
    .await?;

    Ok(category)
}

/// Delete a category. Refused while products still reference it; the FK is
/// ON DELETE RESTRICT, so a concurrent insert still cannot orphan products.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let product_count =
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products WHERE category_id = $1")
            .bind(id)
            .fetch_one(pool)
            .await?;

    if product_count > 0 {
        return Err(AppError::Conflict(format!(
            "Category cannot be deleted: {product_count} products still reference it"
        )));
    }

    let result = sqlx::query("DELETE FROM categories WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
                AppError::Conflict(
                    "Category cannot be deleted: products still reference it".to_string(),
                )
            }
            _ => AppError::Database(e),
        })?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Category not found".to_string()));
    }

    Ok(())
}
