// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Directory error taxonomy.

use reqwest::StatusCode;

/// Result type alias for Directory operations
pub type DirectoryResult<T> = std::result::Result<T, DirectoryError>;

/// Errors surfaced by the Directory client
#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("repository not found: {repo}")]
    RepositoryNotFound { repo: String },

    #[error("upstream rate limit exceeded")]
    RateLimited,

    #[error("upstream directory error{}: {message}", status.map(|s| format!(" (status {s})")).unwrap_or_default())]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("directory transport error: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Classify a non-success upstream response into a Directory error.
///
/// Rate-limit detection matches on the status code first and falls back to a
/// substring check on the upstream message. The message wording is not
/// contractually guaranteed by GitHub, so a text-only match is logged for
/// monitoring instead of being trusted silently.
pub fn classify_github_failure(repo: &str, status: StatusCode, message: &str) -> DirectoryError {
    if status == StatusCode::NOT_FOUND {
        return DirectoryError::RepositoryNotFound {
            repo: repo.to_string(),
        };
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        return DirectoryError::RateLimited;
    }

    let message_lower = message.to_ascii_lowercase();
    if status == StatusCode::FORBIDDEN && message_lower.contains("rate limit") {
        tracing::warn!(
            repo,
            status = status.as_u16(),
            "classified 403 as rate limit from message text"
        );
        return DirectoryError::RateLimited;
    }

    DirectoryError::Upstream {
        status: Some(status.as_u16()),
        message: message.to_string(),
    }
}

/// Classify a GraphQL-level error (HTTP 200 with an `errors` array).
pub fn classify_graphql_error(repo: &str, error_type: Option<&str>, message: &str) -> DirectoryError {
    match error_type {
        Some("NOT_FOUND") => DirectoryError::RepositoryNotFound {
            repo: repo.to_string(),
        },
        Some("RATE_LIMITED") => DirectoryError::RateLimited,
        _ => {
            let message_lower = message.to_ascii_lowercase();
            if message_lower.contains("rate limit") {
                tracing::warn!(repo, "classified GraphQL error as rate limit from message text");
                return DirectoryError::RateLimited;
            }
            DirectoryError::Upstream {
                status: None,
                message: message.to_string(),
            }
        }
    }
}
