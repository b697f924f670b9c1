// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! TTL-bounded key/value cache capability for GitChat.
//!
//! The cache is modelled as an injected dependency rather than a singleton
//! so the pipeline can be tested against an in-memory fake with a
//! controllable clock. Every read and write is a single atomic operation;
//! a miss is silent and a failed write never aborts the caller's flow.

pub mod clock;
pub mod keys;
pub mod memory;

pub use clock::{Clock, ManualClock, SystemClock};
pub use memory::InMemoryCache;

use async_trait::async_trait;
use std::time::Duration;

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when talking to the cache backend
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cache backend unavailable: {0}")]
    Unavailable(String),

    #[error("cache write failed for key {key}: {reason}")]
    WriteFailed { key: String, reason: String },
}

/// Shared key/value store with per-entry expiry.
///
/// Values are plain strings; callers own their serialization. `ttl = None`
/// stores the entry without an expiry.
#[async_trait]
pub trait Cache: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<()>;
    async fn delete(&self, key: &str) -> Result<()>;
}
