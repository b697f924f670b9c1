// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Branch resolution over a Directory transport.

use crate::error::DirectoryResult;
use crate::Directory;
use gitchat_domain::{BranchList, DefaultBranchInfo, RepositoryRef};
use std::collections::HashSet;
use std::sync::Arc;

/// Ceiling on pages fetched per enumeration. With 100 names per page this
/// bounds worst-case work at 5000 branches against a misbehaving Directory.
const MAX_PAGES: usize = 50;

/// Resolves branch metadata by driving the [`Directory`] transport.
#[derive(Clone)]
pub struct BranchResolver {
    directory: Arc<dyn Directory>,
}

impl BranchResolver {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    /// Resolve the repository's default branch and its head commit.
    ///
    /// Fails with `RepositoryNotFound` when the repository or its default
    /// branch ref does not exist (e.g. an empty repository); not retried.
    pub async fn resolve_default_branch(
        &self,
        repo: &RepositoryRef,
    ) -> DirectoryResult<DefaultBranchInfo> {
        self.directory.fetch_default_branch(repo).await
    }

    /// Resolve a named branch's head commit.
    ///
    /// `Ok(None)` means the branch does not exist; callers treat that as
    /// "offer branch selection", not as a failure.
    pub async fn resolve_branch_commit(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> DirectoryResult<Option<String>> {
        self.directory.fetch_branch_commit(repo, branch).await
    }

    /// Enumerate all branch names via cursor pagination.
    ///
    /// An explicit loop with an accumulator rather than recursion; stops on
    /// `has_next_page == false`, an empty page, or the page ceiling. The
    /// cursor is opaque and passed back verbatim. The default branch name is
    /// captured from the first page's metadata only.
    pub async fn list_branches(&self, repo: &RepositoryRef) -> DirectoryResult<BranchList> {
        let mut branches = Vec::new();
        let mut seen = HashSet::new();
        let mut default_branch = None;
        let mut cursor: Option<String> = None;

        for page_index in 0..MAX_PAGES {
            let page = self.directory.fetch_branch_page(repo, cursor.as_deref()).await?;

            if page_index == 0 {
                default_branch = page.default_branch;
            }

            let fetched = page.names.len();
            for name in page.names {
                if seen.insert(name.clone()) {
                    branches.push(name);
                }
            }

            if !page.page_info.has_next_page || fetched == 0 {
                break;
            }
            cursor = page.page_info.end_cursor;
            if cursor.is_none() {
                tracing::warn!(
                    repo = %repo,
                    "directory reported another page without a cursor; stopping enumeration"
                );
                break;
            }
        }

        Ok(BranchList {
            branches,
            default_branch,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DirectoryError;
    use crate::types::{BranchPage, PageInfo};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Serves a scripted sequence of branch pages keyed by cursor.
    struct PagedDirectory {
        pages: Vec<BranchPage>,
        calls: AtomicUsize,
    }

    impl PagedDirectory {
        fn new(pages: Vec<BranchPage>) -> Self {
            Self {
                pages,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Directory for PagedDirectory {
        async fn fetch_default_branch(
            &self,
            repo: &RepositoryRef,
        ) -> DirectoryResult<DefaultBranchInfo> {
            Err(DirectoryError::RepositoryNotFound {
                repo: repo.to_string(),
            })
        }

        async fn fetch_branch_commit(
            &self,
            _repo: &RepositoryRef,
            _branch: &str,
        ) -> DirectoryResult<Option<String>> {
            Ok(None)
        }

        async fn fetch_branch_page(
            &self,
            _repo: &RepositoryRef,
            cursor: Option<&str>,
        ) -> DirectoryResult<BranchPage> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let index = match cursor {
                None => 0,
                Some(cursor) => cursor.parse::<usize>().expect("numeric test cursor"),
            };
            Ok(self.pages[index].clone())
        }
    }

    fn page(names: &[&str], default_branch: Option<&str>, next: Option<usize>) -> BranchPage {
        BranchPage {
            names: names.iter().map(|name| name.to_string()).collect(),
            default_branch: default_branch.map(|name| name.to_string()),
            page_info: PageInfo {
                has_next_page: next.is_some(),
                end_cursor: next.map(|index| index.to_string()),
            },
        }
    }

    fn repo() -> RepositoryRef {
        RepositoryRef::parse("https://github.com/octocat/Hello-World").unwrap()
    }

    #[tokio::test]
    async fn accumulates_all_pages_in_directory_order() {
        let directory = Arc::new(PagedDirectory::new(vec![
            page(&["main", "develop"], Some("main"), Some(1)),
            page(&["release/1.0", "release/2.0"], None, Some(2)),
            page(&["hotfix"], None, None),
        ]));
        let resolver = BranchResolver::new(directory.clone());

        let list = resolver.list_branches(&repo()).await.unwrap();

        assert_eq!(
            list.branches,
            vec!["main", "develop", "release/1.0", "release/2.0", "hotfix"]
        );
        assert_eq!(list.default_branch.as_deref(), Some("main"));
        assert_eq!(directory.call_count(), 3);
    }

    #[tokio::test]
    async fn terminates_on_has_next_page_false() {
        let directory = Arc::new(PagedDirectory::new(vec![page(&["main"], Some("main"), None)]));
        let resolver = BranchResolver::new(directory.clone());

        let list = resolver.list_branches(&repo()).await.unwrap();

        assert_eq!(list.branches, vec!["main"]);
        assert_eq!(directory.call_count(), 1);
    }

    #[tokio::test]
    async fn deduplicates_names_across_pages() {
        let directory = Arc::new(PagedDirectory::new(vec![
            page(&["main", "develop"], Some("main"), Some(1)),
            page(&["develop", "feature"], None, None),
        ]));
        let resolver = BranchResolver::new(directory);

        let list = resolver.list_branches(&repo()).await.unwrap();

        assert_eq!(list.branches, vec!["main", "develop", "feature"]);
    }

    #[tokio::test]
    async fn default_branch_comes_from_first_page_only() {
        let directory = Arc::new(PagedDirectory::new(vec![
            page(&["main"], None, Some(1)),
            page(&["other"], Some("other"), None),
        ]));
        let resolver = BranchResolver::new(directory);

        let list = resolver.list_branches(&repo()).await.unwrap();

        assert_eq!(list.default_branch, None);
    }

    #[tokio::test]
    async fn page_ceiling_bounds_a_looping_directory() {
        // Every page claims another page exists and points back at itself.
        struct LoopingDirectory {
            calls: AtomicUsize,
        }

        #[async_trait]
        impl Directory for LoopingDirectory {
            async fn fetch_default_branch(
                &self,
                repo: &RepositoryRef,
            ) -> DirectoryResult<DefaultBranchInfo> {
                Err(DirectoryError::RepositoryNotFound {
                    repo: repo.to_string(),
                })
            }

            async fn fetch_branch_commit(
                &self,
                _repo: &RepositoryRef,
                _branch: &str,
            ) -> DirectoryResult<Option<String>> {
                Ok(None)
            }

            async fn fetch_branch_page(
                &self,
                _repo: &RepositoryRef,
                _cursor: Option<&str>,
            ) -> DirectoryResult<BranchPage> {
                let call = self.calls.fetch_add(1, Ordering::SeqCst);
                Ok(BranchPage {
                    names: vec![format!("branch-{}", call)],
                    default_branch: None,
                    page_info: PageInfo {
                        has_next_page: true,
                        end_cursor: Some("again".to_string()),
                    },
                })
            }
        }

        let directory = Arc::new(LoopingDirectory {
            calls: AtomicUsize::new(0),
        });
        let resolver = BranchResolver::new(directory.clone());

        let list = resolver.list_branches(&repo()).await.unwrap();

        assert_eq!(directory.calls.load(Ordering::SeqCst), MAX_PAGES);
        assert_eq!(list.branches.len(), MAX_PAGES);
    }

    #[tokio::test]
    async fn empty_first_page_yields_empty_list() {
        let directory = Arc::new(PagedDirectory::new(vec![page(&[], None, None)]));
        let resolver = BranchResolver::new(directory);

        let list = resolver.list_branches(&repo()).await.unwrap();

        assert!(list.branches.is_empty());
        assert_eq!(list.default_branch, None);
    }
}
