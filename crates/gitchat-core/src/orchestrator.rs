// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The resolution orchestrator.
//!
//! One instance serves all requests; each call runs its own sequential state
//! machine. There is no cross-request coordination per cache key: two
//! concurrent identical requests on a cold cache may both create a chat,
//! which is duplicate, not corrupted, work — the cache keeps whichever write
//! lands last and either URL is usable.

use crate::chat_cache::ChatCache;
use crate::credential::resolve_credential;
use crate::error::CoreResult;
use crate::lookup_cache::LookupCache;
use gitchat_chat_client::{ChatCreator, CreateChatRequest};
use gitchat_credentials::TokenStore;
use gitchat_domain::{BranchList, PrivacyLevel, RepositoryRef};
use std::sync::Arc;

/// A normalized tree request.
#[derive(Debug, Clone)]
pub struct TreeRequest {
    pub repo: RepositoryRef,
    /// Branch path segments as they arrived in the URL; a branch name
    /// containing literal `/` (e.g. `release/1.0`) arrives split.
    pub branch_segments: Vec<String>,
    /// Explicit commit from the query string, when supplied.
    pub commit: Option<String>,
    pub privacy: PrivacyLevel,
    /// Authenticated user, when the request carries one.
    pub user_id: Option<String>,
}

impl TreeRequest {
    /// Join the path segments back into the branch name.
    pub fn branch(&self) -> String {
        self.branch_segments.join("/")
    }
}

/// Where a tree request ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeOutcome {
    /// Redirect to an existing or freshly created chat session.
    RedirectToChat { url: String },
    /// The branch does not exist; send the caller to branch selection.
    SelectBranch,
}

/// Where a repository-root request ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootOutcome {
    /// Redirect to `/{owner}/{name}/tree/{branch}?commit={commit}`.
    RedirectToTree { branch: String, commit: String },
    /// The repository (or its default branch ref) could not be resolved;
    /// offer branch selection instead.
    SelectBranch,
}

/// Top-level resolution flow.
#[derive(Clone)]
pub struct Orchestrator {
    lookup: LookupCache,
    chats: ChatCache,
    chat_creator: Arc<dyn ChatCreator>,
    tokens: Arc<dyn TokenStore>,
    system_key: Option<String>,
}

impl Orchestrator {
    pub fn new(
        lookup: LookupCache,
        chats: ChatCache,
        chat_creator: Arc<dyn ChatCreator>,
        tokens: Arc<dyn TokenStore>,
        system_key: Option<String>,
    ) -> Self {
        Self {
            lookup,
            chats,
            chat_creator,
            tokens,
            system_key,
        }
    }

    /// Resolve a tree request to a chat redirect or a branch-selection
    /// outcome.
    pub async fn resolve_tree(&self, request: &TreeRequest) -> CoreResult<TreeOutcome> {
        let branch = request.branch();
        let repo_url = request.repo.url();

        // A held token opts the user into the private path even without the
        // explicit privacy flag: chats under a personal key are scoped to
        // that key and must not share the public commit-keyed cache.
        let user_token = match &request.user_id {
            Some(user_id) => self.tokens.get_token(user_id).await?,
            None => None,
        };
        let private_path = request.privacy.is_private() || user_token.is_some();

        if private_path {
            let credential =
                resolve_credential(true, user_token, self.system_key.as_deref())?;
            let session = self
                .chat_creator
                .create_chat(&CreateChatRequest {
                    repository_url: repo_url,
                    branch,
                    credential: credential.secret().to_string(),
                    privacy_level: request.privacy,
                })
                .await?;
            tracing::info!(repo = %request.repo, chat_id = %session.id, "created private-path chat");
            return Ok(TreeOutcome::RedirectToChat { url: session.url });
        }

        // Public path: resolve the commit unless the caller pinned one.
        let commit = match &request.commit {
            Some(commit) => Some(commit.clone()),
            None => match self.lookup.branch_commit(&request.repo, &branch).await? {
                Some(commit) => Some(commit),
                None => return Ok(TreeOutcome::SelectBranch),
            },
        };

        if let Some(url) = self.chats.get(&repo_url, &branch, commit.as_deref()).await {
            tracing::debug!(repo = %request.repo, %branch, "chat served from cache");
            return Ok(TreeOutcome::RedirectToChat { url });
        }

        let credential = resolve_credential(false, None, self.system_key.as_deref())?;
        let session = self
            .chat_creator
            .create_chat(&CreateChatRequest {
                repository_url: repo_url.clone(),
                branch: branch.clone(),
                credential: credential.secret().to_string(),
                privacy_level: PrivacyLevel::Public,
            })
            .await?;

        self.chats.put(&repo_url, &branch, commit.as_deref(), &session.url).await;
        tracing::info!(repo = %request.repo, chat_id = %session.id, "created public chat");
        Ok(TreeOutcome::RedirectToChat { url: session.url })
    }

    /// Resolve a bare `owner/name` request to its default-branch tree URL.
    pub async fn resolve_repository_root(&self, repo: &RepositoryRef) -> CoreResult<RootOutcome> {
        use gitchat_directory::DirectoryError;

        match self.lookup.default_branch(repo).await {
            Ok(info) => Ok(RootOutcome::RedirectToTree {
                branch: info.default_branch_name,
                commit: info.default_commit,
            }),
            Err(crate::CoreError::Directory(DirectoryError::RepositoryNotFound { .. })) => {
                Ok(RootOutcome::SelectBranch)
            }
            Err(err) => Err(err),
        }
    }

    /// Enumerate branches for the branch-selection state.
    pub async fn list_branches(&self, repo: &RepositoryRef) -> CoreResult<BranchList> {
        Ok(self.lookup.resolver().list_branches(repo).await?)
    }
}
