//! Category model and request DTOs.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

static CATEGORY_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9\s\-_&]+$").unwrap());

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategory {
    #[validate(
        length(min = 1, max = 100, message = "Category name must be between 1 and 100 characters"),
        regex(
            path = *CATEGORY_NAME_RE,
            message = "Category name contains invalid characters"
        )
    )]
    pub name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    #[serde(default)]
    pub description: String,
}

/// Full-update payload. The body carries the entity id, which must match the
/// path id. A missing `isActive` keeps the stored flag.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategory {
    pub id: Uuid,
    #[validate(
        length(min = 1, max = 100, message = "Category name must be between 1 and 100 characters"),
        regex(
            path = *CATEGORY_NAME_RE,
            message = "Category name contains invalid characters"
        )
    )]
    pub name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    #[serde(default)]
    pub description: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryListFilter {
    pub include_inactive: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_serializes_camel_case() {
        let category = Category {
            id: Uuid::nil(),
            name: "Electronics".to_string(),
            description: String::new(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
            created_by: "system".to_string(),
            updated_by: "system".to_string(),
        };
        let json = serde_json::to_value(&category).unwrap();
        assert!(json.get("isActive").is_some());
        assert!(json.get("createdAt").is_some());
        assert!(json.get("is_active").is_none());
    }

    #[test]
    fn create_category_accepts_valid_name() {
        let body = CreateCategory {
            name: "Home & Garden".to_string(),
            description: "Outdoor tools".to_string(),
        };
        assert!(body.validate().is_ok());
    }

    #[test]
    fn create_category_rejects_invalid_characters() {
        let body = CreateCategory {
            name: "Books<script>".to_string(),
            description: String::new(),
        };
        assert!(body.validate().is_err());
    }

    #[test]
    fn create_category_rejects_overlong_description() {
        let body = CreateCategory {
            name: "Books".to_string(),
            description: "x".repeat(501),
        };
        assert!(body.validate().is_err());
    }
}
