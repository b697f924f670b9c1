// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! GitHub repository directory client for GitChat.
//!
//! The Directory is the remote service exposing repository metadata: default
//! branch, branch→commit mapping, and paginated branch enumeration. This
//! crate provides the low-level [`Directory`] transport trait with a GitHub
//! implementation (GraphQL when a token is configured, REST otherwise) and
//! the [`BranchResolver`] that drives pagination and shapes results for the
//! rest of the pipeline.

pub mod error;
pub mod github;
pub mod resolver;
pub mod types;

pub use error::{DirectoryError, DirectoryResult};
pub use github::GithubDirectory;
pub use resolver::BranchResolver;
pub use types::{BranchPage, PageInfo};

use async_trait::async_trait;
use gitchat_domain::{DefaultBranchInfo, RepositoryRef};

/// Low-level Directory transport.
///
/// Implementations perform one remote round trip per call; pagination and
/// accumulation live in [`BranchResolver`].
#[async_trait]
pub trait Directory: Send + Sync {
    /// Fetch the repository's default branch ref and its head commit.
    async fn fetch_default_branch(
        &self,
        repo: &RepositoryRef,
    ) -> DirectoryResult<DefaultBranchInfo>;

    /// Fetch a named branch's head commit; `Ok(None)` when the branch does
    /// not exist.
    async fn fetch_branch_commit(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> DirectoryResult<Option<String>>;

    /// Fetch one page of branch names. `cursor` is opaque and must be passed
    /// back verbatim from the previous page's `end_cursor`.
    async fn fetch_branch_page(
        &self,
        repo: &RepositoryRef,
        cursor: Option<&str>,
    ) -> DirectoryResult<BranchPage>;
}
