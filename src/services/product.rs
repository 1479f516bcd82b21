//! Product service: CRUD, search, stock updates, and low-stock queries.

use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::pagination::{PagedResult, Pagination};
use crate::models::product::{
    CreateProduct, LowStockProduct, ProductListFilter, ProductWithCategory, UpdateProduct,
    UpdateStock,
};

/// Select list for the product-with-category projection.
const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.price, p.category_id, \
     COALESCE(c.name, 'Unknown') AS category_name, p.stock_quantity, p.minimum_stock, \
     p.is_active, p.sku, p.barcode, p.weight, p.dimensions, \
     p.created_at, p.updated_at, p.created_by, p.updated_by";

const PRODUCT_JOIN: &str = "FROM products p LEFT JOIN categories c ON c.id = p.category_id";

/// List products with filters, search, sort, and pagination.
pub async fn list(
    pool: &PgPool,
    filters: &ProductListFilter,
    pagination: &Pagination,
) -> Result<PagedResult<ProductWithCategory>, AppError> {
    let mut conditions: Vec<String> = Vec::new();
    let mut param_index = 0u32;

    // Build dynamic WHERE clauses
    if !filters.include_inactive.unwrap_or(false) {
        conditions.push("p.is_active = true".to_string());
    }
    if filters.category_id.is_some() {
        param_index += 1;
        conditions.push(format!("p.category_id = ${param_index}"));
    }
    if filters.search_term.is_some() {
        param_index += 1;
        conditions.push(format!(
            "(p.name ILIKE ${param_index} OR p.sku ILIKE ${param_index})"
        ));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    let order_by = order_clause(filters)?;

    let count_sql = format!("SELECT COUNT(*) FROM products p {where_clause}");
    let data_sql = format!(
        "SELECT {PRODUCT_COLUMNS} {PRODUCT_JOIN} {where_clause} {order_by} LIMIT {} OFFSET {}",
        pagination.limit(),
        pagination.offset()
    );

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    let mut data_query = sqlx::query_as::<_, ProductWithCategory>(&data_sql);

    // Bind parameters in the same order for both queries
    macro_rules! bind_both {
        ($val:expr) => {
            count_query = count_query.bind($val);
            data_query = data_query.bind($val);
        };
    }

    if let Some(category_id) = filters.category_id {
        bind_both!(category_id);
    }
    if let Some(ref term) = filters.search_term {
        let pattern = format!("%{term}%");
        count_query = count_query.bind(pattern.clone());
        data_query = data_query.bind(pattern);
    }

    let total = count_query.fetch_one(pool).await?;
    let items = data_query.fetch_all(pool).await?;

    Ok(PagedResult::new(items, total, pagination))
}

/// Find product by ID, with its category name joined in.
pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<ProductWithCategory, AppError> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} {PRODUCT_JOIN} WHERE p.id = $1");
    sqlx::query_as::<_, ProductWithCategory>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))
}

/// Create a new product.
pub async fn create(pool: &PgPool, input: &CreateProduct) -> Result<ProductWithCategory, AppError> {
    let id = sqlx::query_scalar::<_, Uuid>(
        r#"
        INSERT INTO products (name, description, price, category_id, stock_quantity,
            minimum_stock, sku, barcode, weight, dimensions)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING id
        "#,
    )
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.category_id)
    .bind(input.stock_quantity)
    .bind(input.minimum_stock)
    .bind(&input.sku)
    .bind(&input.barcode)
    .bind(input.weight)
    .bind(input.dimensions.as_ref().map(sqlx::types::Json))
    .fetch_one(pool)
    .await
    .map_err(|e| constraint_error(e, &input.sku))?;

    find_by_id(pool, id).await
}

/// Full update of a product. The body id must match the path id; a missing
/// `isActive` keeps the stored flag.
pub async fn update(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateProduct,
) -> Result<ProductWithCategory, AppError> {
    if input.id != id {
        return Err(AppError::Validation("ID mismatch".to_string()));
    }

    let existing = find_by_id(pool, id).await?;

    sqlx::query(
        r#"
        UPDATE products SET
            name = $2,
            description = $3,
            price = $4,
            category_id = $5,
            stock_quantity = $6,
            minimum_stock = $7,
            is_active = $8,
            sku = $9,
            barcode = $10,
            weight = $11,
            dimensions = $12,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(existing.id)
    .bind(&input.name)
    .bind(&input.description)
    .bind(input.price)
    .bind(input.category_id)
    .bind(input.stock_quantity)
    .bind(input.minimum_stock)
    .bind(input.is_active.unwrap_or(existing.is_active))
    .bind(&input.sku)
    .bind(&input.barcode)
    .bind(input.weight)
    .bind(input.dimensions.as_ref().map(sqlx::types::Json))
    .execute(pool)
    .await
    .map_err(|e| constraint_error(e, &input.sku))?;

    find_by_id(pool, id).await
}

/// Delete a product by ID.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<(), AppError> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    Ok(())
}

/// Set the absolute stock quantity of a product, recording the reason.
/// Returns the updated product.
pub async fn update_stock(
    pool: &PgPool,
    id: Uuid,
    input: &UpdateStock,
) -> Result<ProductWithCategory, AppError> {
    if input.product_id != id {
        return Err(AppError::Validation("ID mismatch".to_string()));
    }

    let result =
        sqlx::query("UPDATE products SET stock_quantity = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(input.quantity)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound("Product not found".to_string()));
    }

    tracing::info!(
        product_id = %id,
        quantity = input.quantity,
        reason = %input.reason,
        "Stock updated"
    );

    find_by_id(pool, id).await
}

/// List products at or below the given stock threshold, active or not.
pub async fn low_stock(pool: &PgPool, threshold: i32) -> Result<Vec<LowStockProduct>, AppError> {
    let rows = sqlx::query_as::<_, LowStockProduct>(
        "SELECT p.id, p.name, p.sku, p.stock_quantity, p.minimum_stock, \
         COALESCE(c.name, 'Unknown') AS category_name \
         FROM products p LEFT JOIN categories c ON c.id = p.category_id \
         WHERE p.stock_quantity <= $1 \
         ORDER BY p.stock_quantity ASC",
    )
    .bind(threshold)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Map constraint violations from product writes to API errors.
fn constraint_error(e: sqlx::Error, sku: &str) -> AppError {
    match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(format!("Product with SKU '{sku}' already exists"))
        }
        sqlx::Error::Database(ref db_err) if db_err.is_foreign_key_violation() => {
            AppError::Validation("Category not found".to_string())
        }
        _ => AppError::Database(e),
    }
}

/// Whitelisted ORDER BY clause for the list endpoint.
fn order_clause(filters: &ProductListFilter) -> Result<String, AppError> {
    let column = match filters.sort_by.as_deref() {
        None | Some("name") => "p.name",
        Some("price") => "p.price",
        Some("stockQuantity") => "p.stock_quantity",
        Some("createdAt") => "p.created_at",
        Some(other) => return Err(AppError::Validation(format!("Cannot sort by '{other}'"))),
    };
    let direction = if filters.sort_descending.unwrap_or(false) {
        "DESC"
    } else {
        "ASC"
    };
    Ok(format!("ORDER BY {column} {direction}"))
}
