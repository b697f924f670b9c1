// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Read-through cache over the branch resolver.

use crate::error::CoreResult;
use crate::CACHE_TTL;
use gitchat_cache::{keys, Cache};
use gitchat_directory::BranchResolver;
use gitchat_domain::{DefaultBranchInfo, RepositoryRef};
use std::sync::Arc;

/// Memoizes Directory lookups under `default-branch-info:*` and `commit:*`
/// keys with a 1-hour expiry.
///
/// Cache reads that fail are treated as misses and cache writes are
/// best-effort; only resolver errors propagate to the caller.
#[derive(Clone)]
pub struct LookupCache {
    cache: Arc<dyn Cache>,
    resolver: BranchResolver,
}

impl LookupCache {
    pub fn new(cache: Arc<dyn Cache>, resolver: BranchResolver) -> Self {
        Self { cache, resolver }
    }

    pub fn resolver(&self) -> &BranchResolver {
        &self.resolver
    }

    /// Resolve a repository's default branch info, cache-first.
    ///
    /// Only fully successful resolutions are written back; a not-found
    /// result is never cached.
    pub async fn default_branch(&self, repo: &RepositoryRef) -> CoreResult<DefaultBranchInfo> {
        let key = keys::default_branch_info(&repo.owner, &repo.name);

        if let Some(value) = self.read(&key).await {
            match serde_json::from_str(&value) {
                Ok(info) => {
                    tracing::debug!(repo = %repo, "default branch served from cache");
                    return Ok(info);
                }
                Err(err) => {
                    tracing::warn!(%key, error = %err, "discarding malformed cache entry");
                }
            }
        }

        let info = self.resolver.resolve_default_branch(repo).await?;
        match serde_json::to_string(&info) {
            Ok(serialized) => self.write(&key, &serialized).await,
            Err(err) => tracing::warn!(%key, error = %err, "failed to serialize cache value"),
        }
        Ok(info)
    }

    /// Resolve a branch's head commit, cache-first. `Ok(None)` (branch not
    /// found) is returned to the caller but never cached.
    pub async fn branch_commit(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> CoreResult<Option<String>> {
        let key = keys::branch_commit(branch, &repo.owner, &repo.name);

        if let Some(commit) = self.read(&key).await {
            tracing::debug!(repo = %repo, branch, "branch commit served from cache");
            return Ok(Some(commit));
        }

        let commit = self.resolver.resolve_branch_commit(repo, branch).await?;
        if let Some(commit) = &commit {
            self.write(&key, commit).await;
        }
        Ok(commit)
    }

    async fn read(&self, key: &str) -> Option<String> {
        match self.cache.get(key).await {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(%key, error = %err, "cache read failed; treating as miss");
                None
            }
        }
    }

    async fn write(&self, key: &str, value: &str) {
        if let Err(err) = self.cache.set(key, value, Some(CACHE_TTL)).await {
            tracing::warn!(%key, error = %err, "cache write failed; value served uncached");
        }
    }
}
