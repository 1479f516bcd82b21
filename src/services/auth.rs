//! Bearer-token validation against the identity provider's signing secret.
//!
//! Token issuance lives with the external identity provider; this service
//! only verifies HS256 signatures and expiry, and maps claims to the API's
//! user payload.

use jsonwebtoken::{DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// JWT claims as issued by the identity provider.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub preferred_username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: i64,
    pub iat: i64,
}

/// Current-user payload derived from validated claims.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
}

impl From<Claims> for UserInfo {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            username: claims.preferred_username,
            email: claims.email,
            roles: claims.roles,
        }
    }
}

/// Validate a JWT and return the claims.
pub fn validate_token(token: &str, jwt_secret: &str) -> Result<Claims, AppError> {
    let decoding_key = DecodingKey::from_secret(jwt_secret.as_bytes());
    let validation = Validation::default();

    jsonwebtoken::decode::<Claims>(token, &decoding_key, &validation)
        .map(|data| data.claims)
        .map_err(|_| AppError::Unauthorized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use jsonwebtoken::{EncodingKey, Header};

    fn issue(secret: &str, expiry_secs: i64) -> String {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: "7f2c3b1a-9d6e-4f0a-8c5d-2e1b4a6c8d0f".to_string(),
            preferred_username: "admin".to_string(),
            email: "admin@example.com".to_string(),
            roles: vec!["manager".to_string()],
            exp: now + expiry_secs,
            iat: now,
        };
        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_round_trips_claims() {
        let secret = "test-secret-key-for-jwt";
        let token = issue(secret, 900);

        let claims = validate_token(&token, secret).unwrap();
        assert_eq!(claims.preferred_username, "admin");
        assert_eq!(claims.roles, vec!["manager".to_string()]);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue("right-secret", 900);
        assert!(validate_token(&token, "wrong-secret").is_err());
    }

    #[test]
    fn garbage_token_rejected() {
        assert!(validate_token("garbage.token.here", "secret").is_err());
    }

    #[test]
    fn expired_token_rejected() {
        let secret = "test-secret";
        // Expired well beyond the 60s leeway window
        let token = issue(secret, -3600);
        assert!(validate_token(&token, secret).is_err());
    }

    #[test]
    fn user_info_from_claims() {
        let claims = Claims {
            sub: "abc".to_string(),
            preferred_username: "stock_clerk".to_string(),
            email: "clerk@example.com".to_string(),
            roles: vec![],
            exp: 0,
            iat: 0,
        };
        let info = UserInfo::from(claims);
        assert_eq!(info.id, "abc");
        assert_eq!(info.username, "stock_clerk");
    }
}
