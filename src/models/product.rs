//! Product model and request DTOs.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

static SKU_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9\-_]+$").unwrap());
static BARCODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Physical dimensions stored as a JSONB blob on the product row.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct Dimensions {
    #[validate(range(exclusive_min = 0.0, message = "Length must be greater than 0"))]
    pub length: f64,
    #[validate(range(exclusive_min = 0.0, message = "Width must be greater than 0"))]
    pub width: f64,
    #[validate(range(exclusive_min = 0.0, message = "Height must be greater than 0"))]
    pub height: f64,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: Uuid,
    pub stock_quantity: i32,
    pub minimum_stock: i32,
    pub is_active: bool,
    pub sku: String,
    pub barcode: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<Json<Dimensions>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

/// API product with its category name joined in.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithCategory {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category_id: Uuid,
    pub category_name: String,
    pub stock_quantity: i32,
    pub minimum_stock: i32,
    pub is_active: bool,
    pub sku: String,
    pub barcode: Option<String>,
    pub weight: Option<f64>,
    pub dimensions: Option<Json<Dimensions>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(
        min = 1,
        max = 200,
        message = "Product name must be between 1 and 200 characters"
    ))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = validate_price))]
    pub price: Decimal,
    pub category_id: Uuid,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    #[serde(default)]
    pub stock_quantity: i32,
    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    #[serde(default)]
    pub minimum_stock: i32,
    #[validate(
        length(min = 1, max = 50, message = "SKU must be between 1 and 50 characters"),
        regex(
            path = *SKU_RE,
            message = "SKU must contain only uppercase letters, numbers, hyphens, and underscores"
        )
    )]
    pub sku: String,
    #[validate(
        length(max = 50, message = "Barcode cannot exceed 50 characters"),
        regex(path = *BARCODE_RE, message = "Barcode must contain only numbers")
    )]
    pub barcode: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Weight must be greater than 0"))]
    pub weight: Option<f64>,
    #[validate(nested)]
    pub dimensions: Option<Dimensions>,
}

/// Full-update payload. The body carries the entity id, which must match the
/// path id. A missing `isActive` keeps the stored flag.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub id: Uuid,
    #[validate(length(
        min = 1,
        max = 200,
        message = "Product name must be between 1 and 200 characters"
    ))]
    pub name: String,
    #[validate(length(max = 1000, message = "Description cannot exceed 1000 characters"))]
    #[serde(default)]
    pub description: String,
    #[validate(custom(function = validate_price))]
    pub price: Decimal,
    pub category_id: Uuid,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    #[serde(default)]
    pub stock_quantity: i32,
    #[validate(range(min = 0, message = "Minimum stock cannot be negative"))]
    #[serde(default)]
    pub minimum_stock: i32,
    pub is_active: Option<bool>,
    #[validate(
        length(min = 1, max = 50, message = "SKU must be between 1 and 50 characters"),
        regex(
            path = *SKU_RE,
            message = "SKU must contain only uppercase letters, numbers, hyphens, and underscores"
        )
    )]
    pub sku: String,
    #[validate(
        length(max = 50, message = "Barcode cannot exceed 50 characters"),
        regex(path = *BARCODE_RE, message = "Barcode must contain only numbers")
    )]
    pub barcode: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Weight must be greater than 0"))]
    pub weight: Option<f64>,
    #[validate(nested)]
    pub dimensions: Option<Dimensions>,
}

/// Absolute stock adjustment with a mandatory audit reason. The body carries
/// the product id, which must match the path id.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStock {
    pub product_id: Uuid,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: i32,
    #[validate(length(min = 1, max = 200, message = "Reason is required"))]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListFilter {
    pub category_id: Option<Uuid>,
    pub include_inactive: Option<bool>,
    pub search_term: Option<String>,
    pub sort_by: Option<String>,
    pub sort_descending: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LowStockFilter {
    pub minimum_stock: Option<i32>,
}

/// Low-stock alert entry, shared by the low-stock endpoint and the dashboard.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LowStockProduct {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub stock_quantity: i32,
    pub minimum_stock: i32,
    pub category_name: String,
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        let mut err = ValidationError::new("price_min");
        err.message = Some("Price must be greater than 0".into());
        return Err(err);
    }
    if *price >= Decimal::from(1_000_000) {
        let mut err = ValidationError::new("price_max");
        err.message = Some("Price cannot exceed 1,000,000".into());
        return Err(err);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn valid_create() -> CreateProduct {
        CreateProduct {
            name: "Smartphone".to_string(),
            description: "Latest model".to_string(),
            price: dec!(699.99),
            category_id: Uuid::new_v4(),
            stock_quantity: 50,
            minimum_stock: 10,
            sku: "PHONE-001".to_string(),
            barcode: Some("7891234567890".to_string()),
            weight: Some(0.18),
            dimensions: Some(Dimensions {
                length: 15.0,
                width: 7.5,
                height: 0.8,
                unit: "cm".to_string(),
            }),
        }
    }

    #[test]
    fn create_product_accepts_valid_payload() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn create_product_rejects_zero_price() {
        let mut body = valid_create();
        body.price = Decimal::ZERO;
        let err = body.validate().unwrap_err();
        assert!(err.to_string().contains("price"));
    }

    #[test]
    fn create_product_rejects_million_price() {
        let mut body = valid_create();
        body.price = dec!(1000000);
        assert!(body.validate().is_err());
    }

    #[test]
    fn create_product_rejects_lowercase_sku() {
        let mut body = valid_create();
        body.sku = "phone-001".to_string();
        assert!(body.validate().is_err());
    }

    #[test]
    fn create_product_rejects_alpha_barcode() {
        let mut body = valid_create();
        body.barcode = Some("ABC123".to_string());
        assert!(body.validate().is_err());
    }

    #[test]
    fn create_product_rejects_flat_dimensions() {
        let mut body = valid_create();
        body.dimensions = Some(Dimensions {
            length: 0.0,
            width: 7.5,
            height: 0.8,
            unit: "cm".to_string(),
        });
        assert!(body.validate().is_err());
    }

    #[test]
    fn create_product_without_optionals_is_valid() {
        let mut body = valid_create();
        body.barcode = None;
        body.weight = None;
        body.dimensions = None;
        assert!(body.validate().is_ok());
    }

    #[test]
    fn update_stock_requires_reason() {
        let body = UpdateStock {
            product_id: Uuid::new_v4(),
            quantity: 5,
            reason: String::new(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn product_serializes_camel_case() {
        let json = serde_json::to_value(ProductWithCategory {
            id: Uuid::nil(),
            name: "Laptop".to_string(),
            description: String::new(),
            price: dec!(1299.99),
            category_id: Uuid::nil(),
            category_name: "Electronics".to_string(),
            stock_quantity: 3,
            minimum_stock: 5,
            is_active: true,
            sku: "LAPTOP-001".to_string(),
            barcode: None,
            weight: None,
            dimensions: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: "system".to_string(),
            updated_by: "system".to_string(),
        })
        .unwrap();
        assert!(json.get("categoryName").is_some());
        assert!(json.get("stockQuantity").is_some());
        assert!(json.get("minimumStock").is_some());
    }
}
