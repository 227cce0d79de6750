//! Authentication middleware and extractors.
//!
//! The auth service (external to this system) issues HS256 JWTs carrying
//! `sub` (email), `user_id`, and `user_type` claims. This module provides
//! extractors for:
//!
//! - `AuthUser` - any signed-in user
//! - `Professional` - a user with the professional role
//! - `Admin` - a user with the admin role
//!
//! Handlers that also serve anonymous callers take `Option<AuthUser>`.

use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use niwi_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Role carried by the `user_type` claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// A customer posting service requests.
    Customer,
    /// A service professional buying leads.
    Professional,
    /// A platform administrator.
    Admin,
}

/// JWT claims structure for Niwi auth tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject (user email).
    pub sub: String,
    /// User ID.
    pub user_id: String,
    /// User role.
    pub user_type: Role,
    /// Expiration time.
    pub exp: i64,
    /// Issued at.
    pub iat: i64,
}

/// An authenticated user extracted from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user ID.
    pub user_id: UserId,
    /// The user's email (the `sub` claim).
    pub email: String,
    /// The user's role.
    pub role: Role,
}

/// Validate the bearer token of a request and build the `AuthUser`.
fn authenticate(parts: &Parts, state: &AppState) -> Result<AuthUser, ApiError> {
    // Extract the Authorization header
    let auth_header = parts
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Unauthorized)?;

    // Extract the Bearer token
    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or(ApiError::Unauthorized)?;

    let key = DecodingKey::from_secret(state.config.jwt_secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = decode::<JwtClaims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(error = %e, "JWT validation failed");
        ApiError::Unauthorized
    })?;

    let claims = token_data.claims;
    let user_id = claims
        .user_id
        .parse::<UserId>()
        .map_err(|_| ApiError::Unauthorized)?;

    Ok(AuthUser {
        user_id,
        email: claims.sub,
        role: claims.user_type,
    })
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move { authenticate(parts, state) })
    }
}

/// An authenticated user holding the professional role.
#[derive(Debug, Clone)]
pub struct Professional(pub AuthUser);

impl FromRequestParts<Arc<AppState>> for Professional {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = authenticate(parts, state)?;
            if user.role != Role::Professional {
                return Err(ApiError::Forbidden(
                    "Access forbidden: Professional access required".into(),
                ));
            }
            Ok(Professional(user))
        })
    }
}

/// An authenticated user holding the admin role.
#[derive(Debug, Clone)]
pub struct Admin(pub AuthUser);

impl FromRequestParts<Arc<AppState>> for Admin {
    type Rejection = ApiError;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> ::core::pin::Pin<
        Box<
            dyn ::core::future::Future<Output = Result<Self, Self::Rejection>>
                + ::core::marker::Send
                + 'async_trait,
        >,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let user = authenticate(parts, state)?;
            if user.role != Role::Admin {
                return Err(ApiError::Forbidden(
                    "Access forbidden: Admin access required".into(),
                ));
            }
            Ok(Admin(user))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn make_token(secret: &str, role: Role, user_id: &UserId) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            sub: "pro@example.com".into(),
            user_id: user_id.to_string(),
            user_type: role,
            exp: now + 1800,
            iat: now,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("token encoding")
    }

    fn parts_with_token(token: &str) -> Parts {
        let request = axum::http::Request::builder()
            .header("authorization", format!("Bearer {token}"))
            .body(())
            .expect("request");
        request.into_parts().0
    }

    fn test_state(secret: &str) -> (AppState, tempfile::TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = std::sync::Arc::new(
            niwi_store::RocksStore::open(dir.path()).expect("store"),
        );
        let config = crate::config::ServiceConfig {
            jwt_secret: secret.into(),
            ..crate::config::ServiceConfig::default()
        };
        (AppState::new(store, config), dir)
    }

    #[test]
    fn valid_token_authenticates() {
        let (state, _dir) = test_state("test-secret");
        let user_id = UserId::generate();
        let token = make_token("test-secret", Role::Professional, &user_id);
        let parts = parts_with_token(&token);

        let user = authenticate(&parts, &state).expect("authenticated");
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role, Role::Professional);
        assert_eq!(user.email, "pro@example.com");
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let (state, _dir) = test_state("test-secret");
        let token = make_token("other-secret", Role::Professional, &UserId::generate());
        let parts = parts_with_token(&token);

        assert!(matches!(
            authenticate(&parts, &state),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn missing_header_is_rejected() {
        let (state, _dir) = test_state("test-secret");
        let request = axum::http::Request::builder().body(()).expect("request");
        let parts = request.into_parts().0;

        assert!(matches!(
            authenticate(&parts, &state),
            Err(ApiError::Unauthorized)
        ));
    }

    #[test]
    fn role_serde_names() {
        assert_eq!(
            serde_json::to_string(&Role::Professional).unwrap(),
            "\"professional\""
        );
        let parsed: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(parsed, Role::Admin);
    }
}
