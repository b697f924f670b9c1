// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Resolution pipeline for GitChat.
//!
//! Ties the Directory client, the TTL caches, the credential decision table,
//! and the chat-creation client into the flow that answers "given a repo and
//! branch, which chat URL do we redirect to?" with cache-before-create
//! semantics. All collaborators are injected capabilities so the pipeline is
//! testable against counting fakes with a controllable clock.

pub mod chat_cache;
pub mod credential;
pub mod error;
pub mod lookup_cache;
pub mod orchestrator;
pub mod validation;

pub use chat_cache::ChatCache;
pub use credential::{resolve_credential, Credential};
pub use error::{CoreError, CoreResult};
pub use lookup_cache::LookupCache;
pub use orchestrator::{Orchestrator, RootOutcome, TreeOutcome, TreeRequest};
pub use validation::{RepoUrlValidator, ValidationGuard};

use std::time::Duration;

/// Expiry applied to lookup and chat cache entries.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);
