// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Server configuration

use std::net::SocketAddr;
use std::path::PathBuf;

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,

    /// Base URL of the remote chat-creation service
    pub chat_service_url: String,

    /// System-wide chat API key used for public chats. Public chat creation
    /// fails if this is absent, so deployments must treat a missing key as a
    /// startup problem.
    pub system_chat_key: Option<String>,

    /// GitHub API token; enables the GraphQL Directory transport
    pub github_token: Option<String>,

    /// JWT secret for identifying users on token-management routes
    pub jwt_secret: Option<String>,

    /// Master key (base64) sealing stored user tokens. Without it the
    /// server falls back to an in-memory token store.
    pub master_key: Option<String>,

    /// Root directory for encrypted token files
    pub credentials_dir: Option<PathBuf>,

    /// Enable permissive CORS headers for development
    pub enable_cors: bool,

    /// Rate limiting configuration
    pub rate_limit: RateLimitConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3040".parse().unwrap(),
            chat_service_url: "https://chat.example.com".to_string(),
            system_chat_key: None,
            github_token: None,
            jwt_secret: None,
            master_key: None,
            credentials_dir: None,
            enable_cors: false,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per minute per IP
    pub requests_per_minute: u64,

    /// Burst size
    pub burst_size: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_minute: 120,
            burst_size: 20,
        }
    }
}
