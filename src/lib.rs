pub mod cache;
pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use services::dashboard::DashboardService;

/// Shared application state passed to all Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub dashboard: Arc<DashboardService>,
}

impl AppState {
    pub fn new(db: PgPool, config: config::AppConfig) -> Self {
        let dashboard = Arc::new(DashboardService::new(db.clone()));
        Self {
            db,
            config,
            dashboard,
        }
    }
}
