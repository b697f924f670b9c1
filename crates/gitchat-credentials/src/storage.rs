// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! File layout and the encrypted file-backed token store.

use crate::config::CredentialsConfig;
use crate::crypto::{decrypt_token, encrypt_token};
use crate::error::Result;
use crate::types::{validate_user_id, TokenRegistry};
use crate::TokenStore;
use async_trait::async_trait;
use std::path::Path;
use tokio::fs as async_fs;
use tokio::sync::Mutex;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// Create a directory with specific permissions
async fn create_dir_with_permissions(path: &Path, mode: u32) -> Result<()> {
    if !path.exists() {
        async_fs::create_dir_all(path).await?;
    }

    // Set permissions on Unix-like systems
    #[cfg(unix)]
    {
        let metadata = async_fs::metadata(path).await?;
        let mut permissions = metadata.permissions();
        permissions.set_mode(mode);
        async_fs::set_permissions(path, permissions).await?;
    }

    #[cfg(not(unix))]
    {
        if !path.exists() {
            return Err(crate::error::Error::DirectoryNotAccessible(path.to_path_buf()));
        }
    }

    Ok(())
}

#[cfg(unix)]
async fn restrict_file_permissions(path: &Path) -> Result<()> {
    let metadata = async_fs::metadata(path).await?;
    let mut permissions = metadata.permissions();
    permissions.set_mode(0o600);
    async_fs::set_permissions(path, permissions).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_file_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

/// Token store sealing secrets to per-user files.
///
/// Registry metadata lives in `tokens.toml`; the secrets themselves are
/// AES-256-GCM blobs in `tokens/{user}.token`. Registry mutations are
/// serialized through a lock; the files are the source of truth for
/// presence checks.
pub struct EncryptedFileTokenStore {
    config: CredentialsConfig,
    registry: Mutex<TokenRegistry>,
}

impl EncryptedFileTokenStore {
    /// Open the store, creating the directory layout (`0700`) and loading
    /// the registry.
    pub async fn open(config: CredentialsConfig) -> Result<Self> {
        create_dir_with_permissions(&config.storage_dir()?, 0o700).await?;
        create_dir_with_permissions(&config.tokens_dir()?, 0o700).await?;

        let registry = Self::load_registry(&config).await?;
        Ok(Self {
            config,
            registry: Mutex::new(registry),
        })
    }

    async fn load_registry(config: &CredentialsConfig) -> Result<TokenRegistry> {
        let registry_file = config.registry_file()?;
        if !registry_file.exists() {
            return Ok(TokenRegistry::new());
        }

        let content = async_fs::read_to_string(&registry_file).await?;
        let registry: TokenRegistry = toml::from_str(&content)?;
        Ok(registry)
    }

    async fn save_registry(&self, registry: &TokenRegistry) -> Result<()> {
        let registry_file = self.config.registry_file()?;
        let content = toml::to_string_pretty(registry)?;
        async_fs::write(&registry_file, content).await?;
        restrict_file_permissions(&registry_file).await?;
        Ok(())
    }
}

#[async_trait]
impl TokenStore for EncryptedFileTokenStore {
    async fn has_token(&self, user_id: &str) -> Result<bool> {
        validate_user_id(user_id)?;
        Ok(self.config.token_file(user_id)?.exists())
    }

    async fn get_token(&self, user_id: &str) -> Result<Option<String>> {
        validate_user_id(user_id)?;
        let token_file = self.config.token_file(user_id)?;
        if !token_file.exists() {
            return Ok(None);
        }

        let sealed = async_fs::read(&token_file).await?;
        let token = decrypt_token(&sealed, &self.config.master_key)?;
        Ok(Some(token))
    }

    async fn put_token(&self, user_id: &str, token: &str) -> Result<()> {
        validate_user_id(user_id)?;
        let sealed = encrypt_token(token, &self.config.master_key)?;

        let token_file = self.config.token_file(user_id)?;
        async_fs::write(&token_file, sealed).await?;
        restrict_file_permissions(&token_file).await?;

        let mut registry = self.registry.lock().await;
        registry.upsert(user_id);
        self.save_registry(&registry).await?;

        tracing::info!(user_id, "stored chat API token");
        Ok(())
    }

    async fn delete_token(&self, user_id: &str) -> Result<()> {
        validate_user_id(user_id)?;
        let token_file = self.config.token_file(user_id)?;
        if token_file.exists() {
            async_fs::remove_file(&token_file).await?;
        }

        let mut registry = self.registry.lock().await;
        registry.remove(user_id);
        self.save_registry(&registry).await?;

        tracing::info!(user_id, "deleted chat API token");
        Ok(())
    }
}
