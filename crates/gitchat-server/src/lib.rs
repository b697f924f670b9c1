// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! GitChat HTTP server.
//!
//! Exposes the resolution pipeline over HTTP: repository and tree URLs
//! resolve to chat-session redirects, unknown branches land on a
//! branch-selection state, and authenticated users manage their chat API
//! tokens. Rendering is left to the front end; this surface speaks
//! redirects and JSON.

pub mod auth;
pub mod config;
pub mod dependencies;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod mock_dependencies;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::Server;
