use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app_state::AppState;
use crate::db::Role;
use crate::error::AppError;

/// Claims minted by the external identity service. This service verifies the
/// signature and expiry with the shared secret and trusts the resolution;
/// identities are never re-verified here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the caller's user id.
    pub sub: Uuid,
    /// Caller role at the time of token issuance.
    pub role: Role,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
}

/// Authenticated caller context available in handlers.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: Uuid,
    pub role: Role,
}

impl AuthUser {
    pub fn require_professor(&self) -> Result<(), AppError> {
        if self.role != Role::Professor {
            return Err(AppError::Forbidden("Professor role required".to_string()));
        }
        Ok(())
    }

    pub fn require_student(&self) -> Result<(), AppError> {
        if self.role != Role::Student {
            return Err(AppError::Forbidden("Student role required".to_string()));
        }
        Ok(())
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing Authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Authentication("Invalid Authorization header format".to_string())
        })?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 5; // seconds of clock-skew tolerance

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(state.env.auth.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| AppError::Authentication(format!("Invalid token: {e}")))?;

        Ok(AuthUser {
            id: data.claims.sub,
            role: data.claims.role,
        })
    }
}
