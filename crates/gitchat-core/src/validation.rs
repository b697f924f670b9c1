// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository URL validation.

use gitchat_cache::{keys, Cache};
use gitchat_domain::RepositoryRef;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Cache-backed repository URL validator.
///
/// The verdict depends only on the URL's shape, so entries carry no expiry.
#[derive(Clone)]
pub struct RepoUrlValidator {
    cache: Arc<dyn Cache>,
}

impl RepoUrlValidator {
    pub fn new(cache: Arc<dyn Cache>) -> Self {
        Self { cache }
    }

    pub async fn is_valid(&self, repository_url: &str) -> bool {
        let key = keys::repo_valid(repository_url);

        match self.cache.get(&key).await {
            Ok(Some(cached)) => return cached == "true",
            Ok(None) => {}
            Err(err) => {
                tracing::warn!(%key, error = %err, "validation cache read failed; revalidating");
            }
        }

        let valid = RepositoryRef::parse(repository_url).is_ok();
        if let Err(err) = self.cache.set(&key, if valid { "true" } else { "false" }, None).await {
            tracing::warn!(%key, error = %err, "validation cache write failed");
        }
        valid
    }
}

/// Supersession guard for in-flight validations.
///
/// Each new input takes a fresh generation token; a result settling under a
/// stale token is discarded unconditionally, even a success, so stale
/// responses can never overwrite state derived from newer input.
#[derive(Debug, Default)]
pub struct ValidationGuard {
    generation: AtomicU64,
}

impl ValidationGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new validation attempt, superseding all earlier ones.
    pub fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// True while `token` is still the newest attempt.
    pub fn is_current(&self, token: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == token
    }

    /// Keep `result` only if its originating attempt was not superseded.
    pub fn settle<T>(&self, token: u64, result: T) -> Option<T> {
        if self.is_current(token) {
            Some(result)
        } else {
            None
        }
    }
}
