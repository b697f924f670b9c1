// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Per-user chat API token storage for GitChat.
//!
//! This crate provides:
//! - A [`TokenStore`] capability trait keyed by user identity
//! - An encrypted file-backed implementation (AES-256-GCM at rest, secret
//!   files under `{config-dir}/gitchat/credentials/` with restrictive
//!   permissions)
//! - An in-memory implementation for tests
//!
//! Only the owning user's handlers ever address a given row; the store
//! itself enforces nothing beyond the key it is given.

pub mod config;
pub mod crypto;
pub mod error;
pub mod storage;
pub mod types;

pub use config::CredentialsConfig;
pub use crypto::MasterKey;
pub use error::{Error, Result};
pub use storage::EncryptedFileTokenStore;
pub use types::{TokenRecord, TokenRegistry};

use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Store of per-user chat API tokens.
///
/// `get_token` decrypts on demand; implementations must never hand back
/// ciphertext or persist plaintext.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn has_token(&self, user_id: &str) -> Result<bool>;
    async fn get_token(&self, user_id: &str) -> Result<Option<String>>;
    async fn put_token(&self, user_id: &str, token: &str) -> Result<()>;
    async fn delete_token(&self, user_id: &str) -> Result<()>;
}

/// In-memory token store for tests and local development.
#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<String, String>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn has_token(&self, user_id: &str) -> Result<bool> {
        Ok(self.tokens.read().await.contains_key(user_id))
    }

    async fn get_token(&self, user_id: &str) -> Result<Option<String>> {
        Ok(self.tokens.read().await.get(user_id).cloned())
    }

    async fn put_token(&self, user_id: &str, token: &str) -> Result<()> {
        types::validate_user_id(user_id)?;
        self.tokens.write().await.insert(user_id.to_string(), token.to_string());
        Ok(())
    }

    async fn delete_token(&self, user_id: &str) -> Result<()> {
        self.tokens.write().await.remove(user_id);
        Ok(())
    }
}
