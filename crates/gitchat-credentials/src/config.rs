// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Storage configuration for the encrypted token store.

use crate::crypto::MasterKey;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Configuration for the file-backed token store.
#[derive(Debug, Clone)]
pub struct CredentialsConfig {
    /// Root directory for credential files. Defaults to
    /// `{config-dir}/gitchat/credentials`.
    pub storage_dir: Option<PathBuf>,

    /// Master key used to seal tokens at rest.
    pub master_key: MasterKey,
}

impl CredentialsConfig {
    pub fn new(master_key: MasterKey) -> Self {
        Self {
            storage_dir: None,
            master_key,
        }
    }

    /// Use an explicit storage root (tests point this at a temp dir).
    pub fn with_storage_dir(master_key: MasterKey, storage_dir: PathBuf) -> Self {
        Self {
            storage_dir: Some(storage_dir),
            master_key,
        }
    }

    /// Resolve the storage root.
    pub fn storage_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.storage_dir {
            return Ok(dir.clone());
        }
        let config_dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("no config directory available".to_string()))?;
        Ok(config_dir.join("gitchat").join("credentials"))
    }

    /// Directory holding per-user sealed token files.
    pub fn tokens_dir(&self) -> Result<PathBuf> {
        Ok(self.storage_dir()?.join("tokens"))
    }

    /// Path of the TOML registry of token metadata.
    pub fn registry_file(&self) -> Result<PathBuf> {
        Ok(self.storage_dir()?.join("tokens.toml"))
    }

    /// Path of a user's sealed token file. The caller validates the user id
    /// before this is used to touch the filesystem.
    pub fn token_file(&self, user_id: &str) -> Result<PathBuf> {
        Ok(self.tokens_dir()?.join(format!("{}.token", user_id)))
    }
}
