//! Dashboard aggregation over the product and category stores.
//!
//! The summary is served through a process-wide single-slot TTL cache. A
//! fresh hit performs zero store queries; an expired or empty slot triggers
//! exactly one recomputation even under concurrent callers. Failed
//! recomputations leave the slot untouched.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;
use tokio::time::Duration;
use uuid::Uuid;

use crate::cache::CacheSlot;
use crate::errors::AppError;
use crate::models::category::Category;
use crate::models::product::{LowStockProduct, Product};

/// How long a computed summary stays fresh.
const FRESHNESS_WINDOW: Duration = Duration::from_secs(60);

/// Stock threshold for the dashboard's alerts. Fixed: independent of both
/// per-product `minimum_stock` and the low-stock endpoint's query parameter.
const LOW_STOCK_THRESHOLD: i32 = 10;

/// Aggregated dashboard summary for the overview page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_products: i64,
    pub total_stock_value: Decimal,
    pub low_stock_products_count: i64,
    pub low_stock_products: Vec<LowStockProduct>,
    pub category_stats: Vec<CategoryStats>,
}

/// Product count and stock value for one active category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category_id: Uuid,
    pub category_name: String,
    pub product_count: i64,
    pub total_value: Decimal,
}

/// Read surface over products as consumed by the aggregation.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Count of all products, active or not.
    async fn count_all(&self) -> Result<i64, AppError>;

    /// Sum of price × stock quantity over all products, active or not.
    async fn total_stock_value(&self) -> Result<Decimal, AppError>;

    /// Products with stock at or below the threshold, active or not.
    async fn low_stock(&self, threshold: i32) -> Result<Vec<Product>, AppError>;

    /// All products of one category, active or not.
    async fn by_category(&self, category_id: Uuid) -> Result<Vec<Product>, AppError>;
}

/// Read surface over categories as consumed by the aggregation.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// Active categories only.
    async fn active(&self) -> Result<Vec<Category>, AppError>;
}

/// PostgreSQL-backed product store.
pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn count_all(&self) -> Result<i64, AppError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn total_stock_value(&self) -> Result<Decimal, AppError> {
        let value = sqlx::query_scalar::<_, Option<Decimal>>(
            "SELECT SUM(price * stock_quantity) FROM products",
        )
        .fetch_one(&self.pool)
        .await?;
        Ok(value.unwrap_or(Decimal::ZERO))
    }

    async fn low_stock(&self, threshold: i32) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE stock_quantity <= $1 ORDER BY stock_quantity ASC",
        )
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn by_category(&self, category_id: Uuid) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE category_id = $1")
            .bind(category_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

/// PostgreSQL-backed category store.
pub struct PgCategoryStore {
    pool: PgPool,
}

impl PgCategoryStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryStore for PgCategoryStore {
    async fn active(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT * FROM categories WHERE is_active = true ORDER BY name ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

/// Dashboard service owning the store handles and the cache slot.
///
/// Built once per process; the slot is shared by every request handler.
pub struct DashboardService {
    products: Arc<dyn ProductStore>,
    categories: Arc<dyn CategoryStore>,
    cache: CacheSlot<DashboardSummary>,
}

impl DashboardService {
    /// Production service over a connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self::with_stores(
            Arc::new(PgProductStore::new(pool.clone())),
            Arc::new(PgCategoryStore::new(pool)),
        )
    }

    /// Service over explicit stores with the standard freshness window.
    pub fn with_stores(
        products: Arc<dyn ProductStore>,
        categories: Arc<dyn CategoryStore>,
    ) -> Self {
        Self::with_window(products, categories, FRESHNESS_WINDOW)
    }

    /// Service with a caller-chosen freshness window (test constructor).
    pub fn with_window(
        products: Arc<dyn ProductStore>,
        categories: Arc<dyn CategoryStore>,
        window: Duration,
    ) -> Self {
        Self {
            products,
            categories,
            cache: CacheSlot::new(window),
        }
    }

    /// Serve the dashboard summary, recomputing only when the cached copy
    /// has expired. Store failures surface as a data-access error carrying
    /// the underlying message; nothing partial is ever returned or cached.
    pub async fn get_summary(&self) -> Result<DashboardSummary, AppError> {
        self.cache.get_or_compute(|| self.compute_summary()).await
    }

    async fn compute_summary(&self) -> Result<DashboardSummary, AppError> {
        // The four top-level reads are independent; run them concurrently.
        let (total_products, total_stock_value, low_stock, active_categories) = tokio::try_join!(
            self.products.count_all(),
            self.products.total_stock_value(),
            self.products.low_stock(LOW_STOCK_THRESHOLD),
            self.categories.active(),
        )
        .map_err(|e| AppError::DataAccess(e.to_string()))?;

        let category_names: HashMap<Uuid, String> = active_categories
            .iter()
            .map(|c| (c.id, c.name.clone()))
            .collect();

        let low_stock_products: Vec<LowStockProduct> = low_stock
            .iter()
            .map(|p| LowStockProduct {
                id: p.id,
                name: p.name.clone(),
                sku: p.sku.clone(),
                stock_quantity: p.stock_quantity,
                minimum_stock: p.minimum_stock,
                category_name: category_names
                    .get(&p.category_id)
                    .cloned()
                    .unwrap_or_else(|| "Unknown".to_string()),
            })
            .collect();

        let mut category_stats = Vec::with_capacity(active_categories.len());
        for category in &active_categories {
            let products = self
                .products
                .by_category(category.id)
                .await
                .map_err(|e| AppError::DataAccess(e.to_string()))?;

            let total_value = products
                .iter()
                .map(|p| p.price * Decimal::from(p.stock_quantity))
                .sum::<Decimal>();

            category_stats.push(CategoryStats {
                category_id: category.id,
                category_name: category.name.clone(),
                product_count: products.len() as i64,
                total_value,
            });
        }

        Ok(DashboardSummary {
            total_products,
            total_stock_value,
            low_stock_products_count: low_stock_products.len() as i64,
            low_stock_products,
            category_stats,
        })
    }
}
