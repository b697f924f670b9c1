// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Client for the remote chat-creation service.
//!
//! The service creates a shareable chat session scoped to a repository,
//! branch, and credential, and returns the session URL to redirect to. The
//! same code path serves the system-wide credential and per-user
//! credentials; only the key passed per request differs.

pub mod client;
pub mod error;

pub use client::{ChatServiceClient, CreateChatRequest};
pub use error::{ChatClientError, ChatClientResult};

use async_trait::async_trait;
use gitchat_domain::ChatSession;

/// Capability trait for chat creation, injected into the pipeline.
#[async_trait]
pub trait ChatCreator: Send + Sync {
    async fn create_chat(&self, request: &CreateChatRequest) -> ChatClientResult<ChatSession>;
}
