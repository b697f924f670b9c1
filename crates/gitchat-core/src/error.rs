// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Pipeline error taxonomy.
//!
//! Branch-not-found is deliberately absent: it is an outcome (redirect to
//! branch selection), not an error. Cache failures never appear here either;
//! they are logged and absorbed where they happen.

use gitchat_chat_client::ChatClientError;
use gitchat_directory::DirectoryError;

/// Result type alias for pipeline operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Errors surfaced by the resolution pipeline
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    InvalidRepositoryUrl(#[from] gitchat_domain::RepositoryUrlError),

    #[error(transparent)]
    Directory(#[from] DirectoryError),

    #[error(transparent)]
    ChatService(#[from] ChatClientError),

    #[error("no chat API token configured for this user")]
    NoTokenConfigured,

    #[error("system chat API key is not configured")]
    MissingSystemKey,

    #[error("token store error: {0}")]
    TokenStore(#[from] gitchat_credentials::Error),
}

impl CoreError {
    /// True when the failure is the upstream quota; surfaced verbatim with a
    /// retry-later message and never silently retried.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            CoreError::Directory(DirectoryError::RateLimited)
                | CoreError::ChatService(ChatClientError::RateLimited)
        )
    }
}
