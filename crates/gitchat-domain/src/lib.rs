// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Shared domain types for the GitChat service.
//!
//! This crate carries the typed vocabulary the rest of the workspace speaks:
//! normalized repository identities, branch/commit metadata, chat sessions,
//! and the privacy level attached to chat creation. It performs no I/O.

pub mod repository;
pub mod types;

pub use repository::{RepositoryRef, RepositoryUrlError};
pub use types::{BranchInfo, BranchList, ChatSession, DefaultBranchInfo, PrivacyLevel};
