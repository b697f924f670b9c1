// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Chat-creation client errors.

/// Result type alias for chat-creation calls
pub type ChatClientResult<T> = std::result::Result<T, ChatClientError>;

/// Errors surfaced by the chat-creation client
#[derive(Debug, thiserror::Error)]
pub enum ChatClientError {
    #[error("chat service rejected the credential")]
    Unauthorized,

    #[error("chat service rate limit exceeded")]
    RateLimited,

    #[error("chat service error (status {status}): {message}")]
    Upstream { status: u16, message: String },

    #[error("unexpected chat service response: {0}")]
    UnexpectedResponse(String),

    #[error("chat service transport error: {0}")]
    Transport(#[from] reqwest::Error),
}
