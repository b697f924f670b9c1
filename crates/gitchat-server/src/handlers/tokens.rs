// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Token management handlers.
//!
//! Each handler derives the user from auth claims, so a caller can only
//! ever touch their own token row. The secret is write-only from the
//! outside: the status endpoint reports presence, never the value.

use crate::auth::AuthenticatedUser;
use crate::error::{ServerError, ServerResult};
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub struct TokenStatusResponse {
    pub configured: bool,
}

#[derive(Deserialize)]
pub struct PutTokenRequest {
    pub token: String,
}

/// Report whether the caller has a chat API token on file.
pub async fn token_status(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> ServerResult<Json<TokenStatusResponse>> {
    let configured = state.tokens.has_token(&user_id).await?;
    Ok(Json(TokenStatusResponse { configured }))
}

/// Store or replace the caller's chat API token.
pub async fn put_token(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    Json(request): Json<PutTokenRequest>,
) -> ServerResult<StatusCode> {
    let token = request.token.trim();
    if token.is_empty() {
        return Err(ServerError::BadRequest("token must not be empty".to_string()));
    }

    state.tokens.put_token(&user_id, token).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete the caller's chat API token.
pub async fn delete_token(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> ServerResult<StatusCode> {
    state.tokens.delete_token(&user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
