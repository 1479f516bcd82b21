//! Seed script for development — populates a fresh database with sample data.
//!
//! Usage: `cargo run --bin seed`
//!
//! Requires `DATABASE_URL` (reads .env). Safe to re-run: existing rows are
//! left alone.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sqlx::PgPool;
use stockroom::models::product::Dimensions;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let db_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&db_url)
        .await?;

    // Run migrations first
    sqlx::migrate!("./migrations").run(&pool).await?;

    println!("=== Stockroom Seed Script ===");

    let category_ids = seed_categories(&pool).await?;
    seed_products(&pool, &category_ids).await?;

    println!("\n=== Seed complete! ===");

    Ok(())
}

async fn seed_categories(pool: &PgPool) -> anyhow::Result<HashMap<String, Uuid>> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM categories")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Categories already exist ({count})");
        let rows: Vec<(Uuid, String)> = sqlx::query_as("SELECT id, name FROM categories")
            .fetch_all(pool)
            .await?;
        return Ok(rows.into_iter().map(|(id, name)| (name, id)).collect());
    }

    let categories = vec![
        ("Electronics", "Electronic devices and accessories"),
        ("Clothing", "Apparel and fashion items"),
        ("Books", "Books and educational materials"),
    ];

    let mut ids = HashMap::new();
    for (name, description) in categories {
        let id: Uuid = sqlx::query_scalar(
            "INSERT INTO categories (name, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(name)
        .bind(description)
        .fetch_one(pool)
        .await?;
        ids.insert(name.to_string(), id);
    }

    println!("[done] Created {} sample categories", ids.len());
    Ok(ids)
}

struct SeedProduct {
    name: &'static str,
    description: &'static str,
    price: &'static str,
    category: &'static str,
    stock_quantity: i32,
    minimum_stock: i32,
    sku: &'static str,
    barcode: &'static str,
    weight: f64,
    dimensions: Option<Dimensions>,
}

async fn seed_products(pool: &PgPool, category_ids: &HashMap<String, Uuid>) -> anyhow::Result<()> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        println!("[skip] Products already exist ({count})");
        return Ok(());
    }

    let products = vec![
        SeedProduct {
            name: "Smartphone",
            description: "Latest generation smartphone with advanced features",
            price: "699.99",
            category: "Electronics",
            stock_quantity: 50,
            minimum_stock: 10,
            sku: "SMART-001",
            barcode: "1234567890123",
            weight: 0.2,
            dimensions: Some(Dimensions {
                length: 15.0,
                width: 7.5,
                height: 0.8,
                unit: "cm".to_string(),
            }),
        },
        SeedProduct {
            name: "Laptop",
            description: "High-performance laptop for professionals",
            price: "1299.99",
            category: "Electronics",
            stock_quantity: 25,
            minimum_stock: 5,
            sku: "LAPTOP-001",
            barcode: "1234567890124",
            weight: 2.1,
            dimensions: Some(Dimensions {
                length: 35.0,
                width: 24.0,
                height: 2.0,
                unit: "cm".to_string(),
            }),
        },
        SeedProduct {
            name: "T-Shirt",
            description: "Comfortable cotton t-shirt",
            price: "19.99",
            category: "Clothing",
            stock_quantity: 100,
            minimum_stock: 20,
            sku: "TSHIRT-001",
            barcode: "1234567890125",
            weight: 0.15,
            dimensions: None,
        },
        // Two products below the default low-stock threshold for dashboard
        // and alert testing.
        SeedProduct {
            name: "Programming Book",
            description: "Complete guide to modern programming",
            price: "49.99",
            category: "Books",
            stock_quantity: 5,
            minimum_stock: 10,
            sku: "BOOK-001",
            barcode: "1234567890126",
            weight: 0.8,
            dimensions: None,
        },
        SeedProduct {
            name: "Headphones",
            description: "Wireless noise-cancelling headphones",
            price: "199.99",
            category: "Electronics",
            stock_quantity: 3,
            minimum_stock: 8,
            sku: "HEADPHONES-001",
            barcode: "1234567890127",
            weight: 0.3,
            dimensions: None,
        },
    ];

    let total = products.len();
    for product in products {
        let category_id = category_ids
            .get(product.category)
            .ok_or_else(|| anyhow::anyhow!("Unknown seed category: {}", product.category))?;

        sqlx::query(
            "INSERT INTO products (name, description, price, category_id, stock_quantity,
             minimum_stock, sku, barcode, weight, dimensions)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)",
        )
        .bind(product.name)
        .bind(product.description)
        .bind(product.price.parse::<Decimal>()?)
        .bind(category_id)
        .bind(product.stock_quantity)
        .bind(product.minimum_stock)
        .bind(product.sku)
        .bind(product.barcode)
        .bind(product.weight)
        .bind(product.dimensions.map(sqlx::types::Json))
        .execute(pool)
        .await?;
    }

    println!("[done] Created {total} sample products (2 below low-stock threshold)");
    Ok(())
}
