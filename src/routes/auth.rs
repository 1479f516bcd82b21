//! Authentication routes: current-user profile and auth status.
//!
//! Token issuance belongs to the external identity provider; these routes
//! only read the bearer token presented with the request.

use axum::Json;
use serde::Serialize;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::{CurrentUser, MaybeUser};
use crate::services::auth::UserInfo;

/// Authentication state as reported to anonymous callers.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthStatus {
    pub is_authenticated: bool,
}

/// GET /api/v1/auth/me — profile of the authenticated user.
pub async fn me(user: CurrentUser) -> Result<Json<ApiResponse<UserInfo>>, AppError> {
    let info = UserInfo::from(user.claims);
    Ok(ApiResponse::success_with_message(
        info,
        "User information retrieved successfully",
    ))
}

/// GET /api/v1/auth/check — report whether the request carries a valid token.
pub async fn check(user: MaybeUser) -> Json<ApiResponse<AuthStatus>> {
    let is_authenticated = user.claims.is_some();
    let message = if is_authenticated {
        "User is authenticated"
    } else {
        "User is not authenticated"
    };

    ApiResponse::success_with_message(AuthStatus { is_authenticated }, message)
}
