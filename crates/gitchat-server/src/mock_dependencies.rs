// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Dependency wiring for tests: scripted Directory and chat-service fakes
//! with call counters, backed by the real cache and pipeline.

use crate::auth::AuthConfig;
use crate::config::ServerConfig;
use crate::state::AppState;
use anyhow::Result;
use async_trait::async_trait;
use gitchat_cache::InMemoryCache;
use gitchat_chat_client::{ChatClientError, ChatClientResult, ChatCreator, CreateChatRequest};
use gitchat_core::{ChatCache, LookupCache, Orchestrator, RepoUrlValidator};
use gitchat_credentials::InMemoryTokenStore;
use gitchat_directory::{
    BranchPage, BranchResolver, Directory, DirectoryError, DirectoryResult, PageInfo,
};
use gitchat_domain::{ChatSession, DefaultBranchInfo, RepositoryRef};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Scripted repository served by [`MockDirectory`].
#[derive(Debug, Clone)]
pub struct MockRepository {
    pub default_branch: String,
    /// branch name → head commit
    pub commits: HashMap<String, String>,
    /// enumeration order for branch pages
    pub branch_order: Vec<String>,
}

impl MockRepository {
    pub fn new(default_branch: &str, branches: &[(&str, &str)]) -> Self {
        Self {
            default_branch: default_branch.to_string(),
            commits: branches
                .iter()
                .map(|(name, commit)| (name.to_string(), commit.to_string()))
                .collect(),
            branch_order: branches.iter().map(|(name, _)| name.to_string()).collect(),
        }
    }

    fn default_branch_info(&self) -> Option<DefaultBranchInfo> {
        self.commits.get(&self.default_branch).map(|commit| DefaultBranchInfo {
            default_branch_name: self.default_branch.clone(),
            default_commit: commit.clone(),
        })
    }
}

/// Directory fake with per-operation call counters.
#[derive(Default)]
pub struct MockDirectory {
    repos: Mutex<HashMap<String, MockRepository>>,
    pub default_branch_calls: AtomicUsize,
    pub commit_calls: AtomicUsize,
    pub page_calls: AtomicUsize,
}

impl MockDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_repository(&self, owner: &str, name: &str, repo: MockRepository) {
        self.repos.lock().unwrap().insert(format!("{}/{}", owner, name), repo);
    }

    fn lookup(&self, repo: &RepositoryRef) -> Option<MockRepository> {
        self.repos.lock().unwrap().get(&repo.to_string()).cloned()
    }

    pub fn commit_calls(&self) -> usize {
        self.commit_calls.load(Ordering::SeqCst)
    }

    pub fn default_branch_calls(&self) -> usize {
        self.default_branch_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Directory for MockDirectory {
    async fn fetch_default_branch(
        &self,
        repo: &RepositoryRef,
    ) -> DirectoryResult<DefaultBranchInfo> {
        self.default_branch_calls.fetch_add(1, Ordering::SeqCst);
        self.lookup(repo)
            .and_then(|scripted| scripted.default_branch_info())
            .ok_or_else(|| DirectoryError::RepositoryNotFound {
                repo: repo.to_string(),
            })
    }

    async fn fetch_branch_commit(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> DirectoryResult<Option<String>> {
        self.commit_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.lookup(repo).ok_or_else(|| DirectoryError::RepositoryNotFound {
            repo: repo.to_string(),
        })?;
        Ok(scripted.commits.get(branch).cloned())
    }

    async fn fetch_branch_page(
        &self,
        repo: &RepositoryRef,
        _cursor: Option<&str>,
    ) -> DirectoryResult<BranchPage> {
        self.page_calls.fetch_add(1, Ordering::SeqCst);
        let scripted = self.lookup(repo).ok_or_else(|| DirectoryError::RepositoryNotFound {
            repo: repo.to_string(),
        })?;
        Ok(BranchPage {
            names: scripted.branch_order.clone(),
            default_branch: Some(scripted.default_branch.clone()),
            page_info: PageInfo {
                has_next_page: false,
                end_cursor: None,
            },
        })
    }
}

/// Chat-creation fake minting a distinct URL per call.
#[derive(Default)]
pub struct MockChatCreator {
    pub calls: AtomicUsize,
    pub requests: Mutex<Vec<CreateChatRequest>>,
    rate_limited: AtomicBool,
}

impl MockChatCreator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Make subsequent calls fail with the upstream quota error.
    pub fn set_rate_limited(&self, rate_limited: bool) {
        self.rate_limited.store(rate_limited, Ordering::SeqCst);
    }
}

#[async_trait]
impl ChatCreator for MockChatCreator {
    async fn create_chat(&self, request: &CreateChatRequest) -> ChatClientResult<ChatSession> {
        if self.rate_limited.load(Ordering::SeqCst) {
            return Err(ChatClientError::RateLimited);
        }
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        Ok(ChatSession {
            id: format!("chat-{}", call),
            url: format!("https://chat.example.com/c/chat-{}", call),
            demo_url: Some(format!("https://demo.example.com/chat-{}", call)),
        })
    }
}

/// Dependency wiring for the mock server.
pub struct MockServerDependencies {
    state: AppState,
    pub directory: Arc<MockDirectory>,
    pub chat_creator: Arc<MockChatCreator>,
    pub cache: Arc<InMemoryCache>,
    pub tokens: Arc<InMemoryTokenStore>,
}

impl MockServerDependencies {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let directory = Arc::new(MockDirectory::new());
        let chat_creator = Arc::new(MockChatCreator::new());
        let cache = Arc::new(InMemoryCache::new());
        let tokens = Arc::new(InMemoryTokenStore::new());

        let orchestrator = Orchestrator::new(
            LookupCache::new(cache.clone(), BranchResolver::new(directory.clone())),
            ChatCache::new(cache.clone()),
            chat_creator.clone(),
            tokens.clone(),
            config.system_chat_key.clone(),
        );

        let state = AppState {
            auth: AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
            },
            validator: RepoUrlValidator::new(cache.clone()),
            orchestrator,
            tokens: tokens.clone(),
            config,
        };

        Ok(Self {
            state,
            directory,
            chat_creator,
            cache,
            tokens,
        })
    }

    pub fn into_state(self) -> AppState {
        self.state
    }

    pub fn state(&self) -> AppState {
        self.state.clone()
    }
}
