// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server error types and handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use gitchat_chat_client::ChatClientError;
use gitchat_core::CoreError;
use gitchat_directory::DirectoryError;
use serde::Serialize;

/// Server result type
pub type ServerResult<T> = Result<T, ServerError>;

/// Problem+JSON error body
#[derive(Debug, Clone, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
}

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    /// Convert error to a Problem+JSON response body.
    ///
    /// Upstream failures deliberately render with a generic message; the
    /// detail is logged server-side where `IntoResponse` runs.
    pub fn to_problem(&self) -> ProblemDetails {
        match self {
            ServerError::Core(core) => core_to_problem(core),
            ServerError::Auth(msg) => ProblemDetails {
                problem_type: "https://gitchat.dev/errors/auth".to_string(),
                title: "Authentication Failed".to_string(),
                status: StatusCode::UNAUTHORIZED.as_u16(),
                detail: msg.clone(),
            },
            ServerError::BadRequest(msg) => ProblemDetails {
                problem_type: "https://gitchat.dev/errors/bad-request".to_string(),
                title: "Bad Request".to_string(),
                status: StatusCode::BAD_REQUEST.as_u16(),
                detail: msg.clone(),
            },
            ServerError::Internal(_) => ProblemDetails {
                problem_type: "https://gitchat.dev/errors/internal".to_string(),
                title: "Internal Server Error".to_string(),
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                detail: "Something went wrong on our side".to_string(),
            },
        }
    }
}

fn core_to_problem(error: &CoreError) -> ProblemDetails {
    match error {
        CoreError::InvalidRepositoryUrl(err) => ProblemDetails {
            problem_type: "https://gitchat.dev/errors/invalid-repository-url".to_string(),
            title: "Invalid Repository URL".to_string(),
            status: StatusCode::BAD_REQUEST.as_u16(),
            detail: err.to_string(),
        },
        CoreError::Directory(DirectoryError::RepositoryNotFound { repo }) => ProblemDetails {
            problem_type: "https://gitchat.dev/errors/repository-not-found".to_string(),
            title: "Repository Not Found".to_string(),
            status: StatusCode::NOT_FOUND.as_u16(),
            detail: format!("Repository '{}' was not found or is not accessible", repo),
        },
        CoreError::Directory(DirectoryError::RateLimited)
        | CoreError::ChatService(ChatClientError::RateLimited) => ProblemDetails {
            problem_type: "https://gitchat.dev/errors/rate-limited".to_string(),
            title: "Rate Limited".to_string(),
            status: StatusCode::TOO_MANY_REQUESTS.as_u16(),
            detail: "Upstream rate limit exceeded; please retry later".to_string(),
        },
        CoreError::NoTokenConfigured => ProblemDetails {
            problem_type: "https://gitchat.dev/errors/no-token-configured".to_string(),
            title: "No Chat API Token Configured".to_string(),
            status: StatusCode::PRECONDITION_REQUIRED.as_u16(),
            detail: "Private chats require a personal chat API token; add one to your account"
                .to_string(),
        },
        CoreError::MissingSystemKey => ProblemDetails {
            problem_type: "https://gitchat.dev/errors/misconfigured".to_string(),
            title: "Service Misconfigured".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
            detail: "The service is not configured for public chat creation".to_string(),
        },
        CoreError::Directory(_) | CoreError::ChatService(_) | CoreError::TokenStore(_) => {
            ProblemDetails {
                problem_type: "https://gitchat.dev/errors/upstream".to_string(),
                title: "Upstream Error".to_string(),
                status: StatusCode::BAD_GATEWAY.as_u16(),
                detail: "An upstream service failed; please try again".to_string(),
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let problem = self.to_problem();
        if problem.status >= 500 {
            tracing::error!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, status = problem.status, "request rejected");
        }
        let status =
            StatusCode::from_u16(problem.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(problem)).into_response()
    }
}

/// Convert any error to ServerError
impl From<anyhow::Error> for ServerError {
    fn from(err: anyhow::Error) -> Self {
        ServerError::Internal(err.to_string())
    }
}

impl From<gitchat_credentials::Error> for ServerError {
    fn from(err: gitchat_credentials::Error) -> Self {
        ServerError::Core(CoreError::TokenStore(err))
    }
}

impl From<gitchat_domain::RepositoryUrlError> for ServerError {
    fn from(err: gitchat_domain::RepositoryUrlError) -> Self {
        ServerError::Core(CoreError::InvalidRepositoryUrl(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limits_surface_as_429_with_retry_guidance() {
        let problem =
            ServerError::Core(CoreError::Directory(DirectoryError::RateLimited)).to_problem();
        assert_eq!(problem.status, 429);
        assert!(problem.detail.contains("retry"));
    }

    #[test]
    fn missing_user_token_maps_to_precondition_required() {
        let problem = ServerError::Core(CoreError::NoTokenConfigured).to_problem();
        assert_eq!(problem.status, 428);
    }

    #[test]
    fn upstream_failures_hide_detail_from_the_caller() {
        let inner = DirectoryError::Upstream {
            status: Some(500),
            message: "secret internal detail".to_string(),
        };
        let problem = ServerError::Core(CoreError::Directory(inner)).to_problem();
        assert_eq!(problem.status, 502);
        assert!(!problem.detail.contains("secret internal detail"));
    }
}
