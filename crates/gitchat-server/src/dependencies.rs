// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Dependency wiring for the GitChat server

use crate::auth::AuthConfig;
use crate::config::ServerConfig;
use crate::state::AppState;
use anyhow::Result;
use gitchat_cache::InMemoryCache;
use gitchat_chat_client::{ChatCreator, ChatServiceClient};
use gitchat_core::{ChatCache, LookupCache, Orchestrator, RepoUrlValidator};
use gitchat_credentials::{
    CredentialsConfig, EncryptedFileTokenStore, InMemoryTokenStore, MasterKey, TokenStore,
};
use gitchat_directory::{BranchResolver, GithubDirectory};
use std::sync::Arc;

/// Default dependency builder: real GitHub and chat-service clients, the
/// process-local cache, and the encrypted token store.
pub struct DefaultServerDependencies {
    state: AppState,
}

impl DefaultServerDependencies {
    pub async fn new(config: ServerConfig) -> Result<Self> {
        let cache = Arc::new(InMemoryCache::new());

        let directory = Arc::new(GithubDirectory::new(config.github_token.clone()));
        let resolver = BranchResolver::new(directory);

        let chat_creator: Arc<dyn ChatCreator> =
            Arc::new(ChatServiceClient::from_url(&config.chat_service_url)?);

        let tokens: Arc<dyn TokenStore> = match &config.master_key {
            Some(encoded) => {
                let master_key = MasterKey::from_base64(encoded)?;
                let credentials_config = match &config.credentials_dir {
                    Some(dir) => CredentialsConfig::with_storage_dir(master_key, dir.clone()),
                    None => CredentialsConfig::new(master_key),
                };
                Arc::new(EncryptedFileTokenStore::open(credentials_config).await?)
            }
            None => {
                tracing::warn!(
                    "no master key configured; user tokens will be held in memory only"
                );
                Arc::new(InMemoryTokenStore::new())
            }
        };

        if config.system_chat_key.is_none() {
            tracing::warn!("no system chat key configured; public chat creation will fail");
        }

        let orchestrator = Orchestrator::new(
            LookupCache::new(cache.clone(), resolver),
            ChatCache::new(cache.clone()),
            chat_creator,
            tokens.clone(),
            config.system_chat_key.clone(),
        );

        let state = AppState {
            auth: AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
            },
            validator: RepoUrlValidator::new(cache),
            orchestrator,
            tokens,
            config,
        };

        Ok(Self { state })
    }

    /// Consume the dependency builder and return the resulting app state
    pub fn into_state(self) -> AppState {
        self.state
    }
}
