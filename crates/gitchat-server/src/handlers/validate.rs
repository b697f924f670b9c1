// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository URL validation endpoint

use crate::error::ServerResult;
use crate::state::AppState;
use axum::{extract::Query, extract::State, Json};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct ValidateQuery {
    /// URL-encoded repository URL to validate
    pub url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidateResponse {
    pub is_valid: bool,
}

/// Validate a repository URL's shape; verdicts are cached indefinitely.
pub async fn validate_repository(
    State(state): State<AppState>,
    Query(query): Query<ValidateQuery>,
) -> ServerResult<Json<ValidateResponse>> {
    let is_valid = state.validator.is_valid(&query.url).await;
    Ok(Json(ValidateResponse { is_valid }))
}
