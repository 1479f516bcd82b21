//! JWT authentication extractors for axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::services::auth as auth_service;
use crate::services::auth::Claims;
use crate::AppState;

/// Authenticated user extracted from the JWT Bearer token.
///
/// Use as an axum extractor in handlers that require authentication:
/// ```ignore
/// async fn handler(user: CurrentUser) -> impl IntoResponse { ... }
/// ```
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub claims: Claims,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(AppError::Unauthorized)?;

        let claims = auth_service::validate_token(token, &state.config.jwt_secret)?;

        Ok(CurrentUser { claims })
    }
}

/// Optional variant for endpoints that report authentication state
/// instead of requiring it.
#[derive(Debug, Clone)]
pub struct MaybeUser {
    pub claims: Option<Claims>,
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let claims = CurrentUser::from_request_parts(parts, state)
            .await
            .ok()
            .map(|user| user.claims);

        Ok(MaybeUser { claims })
    }
}
