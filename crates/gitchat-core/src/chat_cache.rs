// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Cache of previously created chat URLs.

use crate::CACHE_TTL;
use gitchat_cache::{keys, Cache};
use std::sync::Arc;

/// Maps `(repository URL, branch, commit)` to the chat URL created for it,
/// with a 1-hour expiry. A hit short-circuits chat creation entirely.
///
/// The commit slot may be unknown; that yields a distinct `:null` key which
/// is never promoted to a definite-commit key. The stored value is the URL
/// string only — the minimal artifact needed to redirect.
#[derive(Clone)]
pub struct ChatCache {
    cache: Arc<dyn Cache>,
}

impl ChatCache {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    pub async fn get(
        &self,
        repository_url: &str,
        branch: &str,
        commit: Option<&str>,
    ) -> Option<String> {
        let key = keys::chat(repository_url, branch, commit);
        match self.cache.get(&key).await {
            Ok(hit) => hit,
            Err(err) => {
                tracing::warn!(%key, error = %err, "chat cache read failed; treating as miss");
                None
            }
        }
    }

    /// Best-effort write-through; a failure is logged and the chat URL is
    /// still served for the current request.
    pub async fn put(&self, repository_url: &str, branch: &str, commit: Option<&str>, url: &str) {
        let key = keys::chat(repository_url, branch, commit);
        if let Err(err) = self.cache.set(&key, url, Some(CACHE_TTL)).await {
            tracing::warn!(%key, error = %err, "chat cache write failed; chat will not be reused");
        }
    }
}
