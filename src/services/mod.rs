//! Business logic services.

pub mod auth;
pub mod category;
pub mod dashboard;
pub mod product;
