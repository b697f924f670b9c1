// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! User identity extraction.
//!
//! Authentication itself lives in front of this service; here we only
//! establish *who* a request belongs to. With a JWT secret configured,
//! identity comes from `Authorization: Bearer` claims. Without one (local
//! development), an `X-User-Id` header is honored instead.

use crate::error::ServerError;
use crate::state::AppState;
use axum::{extract::FromRequestParts, http::header, http::request::Parts};
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
}

/// JWT claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time
    pub exp: usize,
}

impl AuthConfig {
    /// Validate a JWT and return its claims.
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, ServerError> {
        let secret = self
            .jwt_secret
            .as_ref()
            .ok_or_else(|| ServerError::Auth("JWT authentication not configured".to_string()))?;

        let decoding_key = DecodingKey::from_secret(secret.as_ref());
        let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
            .map_err(|_| ServerError::Auth("Invalid JWT token".to_string()))?;

        Ok(token_data.claims)
    }
}

/// The requesting user, when the request identifies one.
///
/// An invalid credential is a hard 401; a missing one yields `None` so the
/// public flows stay anonymous.
pub struct MaybeUser(pub Option<String>);

#[axum::async_trait]
impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        if let Some(bearer) = auth_header.and_then(|value| value.strip_prefix("Bearer ")) {
            let claims = state.auth.validate_jwt(bearer)?;
            return Ok(MaybeUser(Some(claims.sub)));
        }

        if state.auth.jwt_secret.is_none() {
            let dev_user = parts
                .headers
                .get("x-user-id")
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string());
            return Ok(MaybeUser(dev_user));
        }

        Ok(MaybeUser(None))
    }
}

/// The requesting user; rejects with 401 when the request is anonymous.
pub struct AuthenticatedUser(pub String);

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = ServerError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match MaybeUser::from_request_parts(parts, state).await? {
            MaybeUser(Some(user_id)) => Ok(AuthenticatedUser(user_id)),
            MaybeUser(None) => Err(ServerError::Auth(
                "This endpoint requires an authenticated user".to_string(),
            )),
        }
    }
}
