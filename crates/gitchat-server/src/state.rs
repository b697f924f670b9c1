// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server state management

use crate::auth::AuthConfig;
use crate::config::ServerConfig;
use gitchat_core::{Orchestrator, RepoUrlValidator};
use gitchat_credentials::TokenStore;
use std::sync::Arc;

/// Shared server state
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,

    /// Resolution pipeline
    pub orchestrator: Orchestrator,

    /// Cache-backed repository URL validator
    pub validator: RepoUrlValidator,

    /// Per-user chat API token store
    pub tokens: Arc<dyn TokenStore>,

    /// Identity extraction configuration
    pub auth: AuthConfig,
}

impl AppState {
    /// Get configuration reference
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
