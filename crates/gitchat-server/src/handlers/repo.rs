// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository-facing handlers: root redirect, branch selection, and the
//! tree flow that ends in a chat redirect.

use crate::auth::MaybeUser;
use crate::error::ServerResult;
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use gitchat_core::{RootOutcome, TreeOutcome, TreeRequest};
use gitchat_domain::{PrivacyLevel, RepositoryRef};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Default)]
pub struct TreeQuery {
    /// Explicit commit; when present, commit resolution is skipped.
    pub commit: Option<String>,
    /// Request a private chat created under the caller's own token.
    #[serde(default)]
    pub private: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchSelectionResponse {
    pub repository: String,
    pub default_branch: Option<String>,
    pub branches: Vec<String>,
}

/// `GET /{owner}/{repo}` — resolve the default branch and redirect into the
/// tree flow, or fall back to branch selection.
pub async fn repository_root(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> ServerResult<Response> {
    let repo = RepositoryRef::from_parts(&owner, &repo)?;

    match state.orchestrator.resolve_repository_root(&repo).await? {
        RootOutcome::RedirectToTree { branch, commit } => {
            let target = format!("/{}/{}/tree/{}?commit={}", repo.owner, repo.name, branch, commit);
            Ok(Redirect::temporary(&target).into_response())
        }
        RootOutcome::SelectBranch => branch_selection_body(&state, &repo).await,
    }
}

/// `GET /{owner}/{repo}/branches` — the branch-selection state.
pub async fn branch_selection(
    State(state): State<AppState>,
    Path((owner, repo)): Path<(String, String)>,
) -> ServerResult<Response> {
    let repo = RepositoryRef::from_parts(&owner, &repo)?;
    branch_selection_body(&state, &repo).await
}

async fn branch_selection_body(state: &AppState, repo: &RepositoryRef) -> ServerResult<Response> {
    let list = state.orchestrator.list_branches(repo).await?;
    Ok(Json(BranchSelectionResponse {
        repository: repo.to_string(),
        default_branch: list.default_branch,
        branches: list.branches,
    })
    .into_response())
}

/// `GET /{owner}/{repo}/tree/*branch` — the chat-bootstrapping flow.
///
/// The wildcard keeps branch names containing `/` intact as path segments.
pub async fn tree(
    State(state): State<AppState>,
    Path((owner, repo, branch_path)): Path<(String, String, String)>,
    Query(query): Query<TreeQuery>,
    MaybeUser(user_id): MaybeUser,
) -> ServerResult<Response> {
    let repo = RepositoryRef::from_parts(&owner, &repo)?;
    let branch_segments: Vec<String> = branch_path
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .collect();

    let request = TreeRequest {
        repo: repo.clone(),
        branch_segments,
        commit: query.commit,
        privacy: if query.private {
            PrivacyLevel::Private
        } else {
            PrivacyLevel::Public
        },
        user_id,
    };

    match state.orchestrator.resolve_tree(&request).await? {
        TreeOutcome::RedirectToChat { url } => Ok(Redirect::temporary(&url).into_response()),
        TreeOutcome::SelectBranch => {
            let target = format!("/{}/{}/branches", repo.owner, repo.name);
            Ok(Redirect::temporary(&target).into_response())
        }
    }
}
