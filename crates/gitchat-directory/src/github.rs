// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! GitHub-backed Directory transport.
//!
//! Uses the GraphQL API when an API token is configured (one round trip per
//! operation) and falls back to the REST API otherwise. Both transports
//! produce the same [`BranchPage`] shape so the resolver does not care which
//! one served a request.

use crate::error::{classify_github_failure, classify_graphql_error, DirectoryError, DirectoryResult};
use crate::types::{BranchPage, PageInfo};
use crate::Directory;
use async_trait::async_trait;
use gitchat_domain::{DefaultBranchInfo, RepositoryRef};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use url::Url;

const DEFAULT_REST_BASE: &str = "https://api.github.com/";
const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";
const PAGE_SIZE: usize = 100;

const DEFAULT_BRANCH_QUERY: &str = "\
query($owner: String!, $name: String!) {
  repository(owner: $owner, name: $name) {
    defaultBranchRef { name target { oid } }
  }
}";

const BRANCH_COMMIT_QUERY: &str = "\
query($owner: String!, $name: String!, $qualifiedName: String!) {
  repository(owner: $owner, name: $name) {
    ref(qualifiedName: $qualifiedName) { target { oid } }
  }
}";

const BRANCH_PAGE_QUERY: &str = "\
query($owner: String!, $name: String!, $pageSize: Int!, $cursor: String) {
  repository(owner: $owner, name: $name) {
    defaultBranchRef { name }
    refs(refPrefix: \"refs/heads/\", first: $pageSize, after: $cursor) {
      nodes { name }
      pageInfo { hasNextPage endCursor }
    }
  }
}";

/// GitHub Directory client.
#[derive(Debug, Clone)]
pub struct GithubDirectory {
    http: HttpClient,
    rest_base: Url,
    graphql_url: Url,
    token: Option<String>,
}

impl GithubDirectory {
    /// Create a client against the public GitHub API.
    pub fn new(token: Option<String>) -> Self {
        let http = HttpClient::builder()
            .user_agent(concat!("gitchat/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to create HTTP client");

        Self {
            http,
            rest_base: Url::parse(DEFAULT_REST_BASE).expect("valid REST base URL"),
            graphql_url: Url::parse(DEFAULT_GRAPHQL_URL).expect("valid GraphQL URL"),
            token,
        }
    }

    /// Create a client against custom endpoints (mock servers in tests,
    /// GitHub Enterprise installs).
    pub fn with_endpoints(
        rest_base: Url,
        graphql_url: Url,
        token: Option<String>,
    ) -> Self {
        let mut client = Self::new(token);
        client.rest_base = rest_base;
        client.graphql_url = graphql_url;
        client
    }

    fn use_graphql(&self) -> bool {
        self.token.is_some()
    }

    // GraphQL transport

    async fn graphql<T: DeserializeOwned>(
        &self,
        repo: &RepositoryRef,
        query: &str,
        variables: serde_json::Value,
    ) -> DirectoryResult<T> {
        let token = self.token.as_deref().unwrap_or_default();
        let response = self
            .http
            .post(self.graphql_url.clone())
            .bearer_auth(token)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(classify_github_failure(&repo.to_string(), status, &body));
        }

        let envelope: GraphqlEnvelope = serde_json::from_str(&body).map_err(|err| {
            DirectoryError::Upstream {
                status: None,
                message: format!("malformed GraphQL response: {}", err),
            }
        })?;

        if let Some(error) = envelope.errors.as_ref().and_then(|errors| errors.first()) {
            return Err(classify_graphql_error(
                &repo.to_string(),
                error.error_type.as_deref(),
                &error.message,
            ));
        }

        let data = envelope.data.ok_or_else(|| DirectoryError::Upstream {
            status: None,
            message: "GraphQL response carried neither data nor errors".to_string(),
        })?;

        serde_json::from_value(data).map_err(|err| DirectoryError::Upstream {
            status: None,
            message: format!("unexpected GraphQL data shape: {}", err),
        })
    }

    // REST transport

    /// GET a REST path; `Ok(None)` on 404, classified errors otherwise.
    async fn rest_get<T: DeserializeOwned>(
        &self,
        repo: &RepositoryRef,
        path: &str,
    ) -> DirectoryResult<Option<T>> {
        let url = self.rest_base.join(path).map_err(|err| DirectoryError::Upstream {
            status: None,
            message: format!("invalid REST path {}: {}", path, err),
        })?;

        let mut request = self
            .http
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = response.text().await?;
        if !status.is_success() {
            let message = rest_error_message(&body);
            return Err(classify_github_failure(&repo.to_string(), status, &message));
        }

        serde_json::from_str(&body).map(Some).map_err(|err| DirectoryError::Upstream {
            status: None,
            message: format!("unexpected REST response shape: {}", err),
        })
    }

    async fn rest_default_branch(
        &self,
        repo: &RepositoryRef,
    ) -> DirectoryResult<DefaultBranchInfo> {
        let repository: RestRepository = self
            .rest_get(repo, &format!("repos/{}/{}", repo.owner, repo.name))
            .await?
            .ok_or_else(|| DirectoryError::RepositoryNotFound {
                repo: repo.to_string(),
            })?;

        let branch: RestBranch = self
            .rest_get(
                repo,
                &format!(
                    "repos/{}/{}/branches/{}",
                    repo.owner, repo.name, repository.default_branch
                ),
            )
            .await?
            // A repository whose default branch ref has no commits behind it
            // (an empty repository) resolves as not found.
            .ok_or_else(|| DirectoryError::RepositoryNotFound {
                repo: repo.to_string(),
            })?;

        Ok(DefaultBranchInfo {
            default_branch_name: repository.default_branch,
            default_commit: branch.commit.sha,
        })
    }

    async fn rest_branch_page(
        &self,
        repo: &RepositoryRef,
        cursor: Option<&str>,
    ) -> DirectoryResult<BranchPage> {
        let page: usize = match cursor {
            None => 1,
            Some(cursor) => cursor.parse().map_err(|_| DirectoryError::Upstream {
                status: None,
                message: format!("invalid pagination cursor: {}", cursor),
            })?,
        };

        // The default branch name is only reported alongside the first page.
        let default_branch = if page == 1 {
            let repository: RestRepository = self
                .rest_get(repo, &format!("repos/{}/{}", repo.owner, repo.name))
                .await?
                .ok_or_else(|| DirectoryError::RepositoryNotFound {
                    repo: repo.to_string(),
                })?;
            Some(repository.default_branch)
        } else {
            None
        };

        let branches: Vec<RestBranch> = self
            .rest_get(
                repo,
                &format!(
                    "repos/{}/{}/branches?per_page={}&page={}",
                    repo.owner, repo.name, PAGE_SIZE, page
                ),
            )
            .await?
            .ok_or_else(|| DirectoryError::RepositoryNotFound {
                repo: repo.to_string(),
            })?;

        let names: Vec<String> = branches.into_iter().map(|branch| branch.name).collect();
        let has_next_page = names.len() == PAGE_SIZE;
        let end_cursor = has_next_page.then(|| (page + 1).to_string());

        Ok(BranchPage {
            names,
            default_branch,
            page_info: PageInfo {
                has_next_page,
                end_cursor,
            },
        })
    }
}

#[async_trait]
impl Directory for GithubDirectory {
    async fn fetch_default_branch(
        &self,
        repo: &RepositoryRef,
    ) -> DirectoryResult<DefaultBranchInfo> {
        if !self.use_graphql() {
            return self.rest_default_branch(repo).await;
        }

        let data: DefaultBranchData = self
            .graphql(
                repo,
                DEFAULT_BRANCH_QUERY,
                serde_json::json!({ "owner": repo.owner, "name": repo.name }),
            )
            .await?;

        let repository = data.repository.ok_or_else(|| DirectoryError::RepositoryNotFound {
            repo: repo.to_string(),
        })?;

        // An empty repository has no default branch ref; treat it like an
        // absent repository rather than caching a partial result.
        let branch_ref =
            repository.default_branch_ref.ok_or_else(|| DirectoryError::RepositoryNotFound {
                repo: repo.to_string(),
            })?;
        let target = branch_ref.target.ok_or_else(|| DirectoryError::RepositoryNotFound {
            repo: repo.to_string(),
        })?;

        Ok(DefaultBranchInfo {
            default_branch_name: branch_ref.name,
            default_commit: target.oid,
        })
    }

    async fn fetch_branch_commit(
        &self,
        repo: &RepositoryRef,
        branch: &str,
    ) -> DirectoryResult<Option<String>> {
        if !self.use_graphql() {
            let branch_info: Option<RestBranch> = self
                .rest_get(
                    repo,
                    &format!("repos/{}/{}/branches/{}", repo.owner, repo.name, branch),
                )
                .await?;
            return Ok(branch_info.map(|info| info.commit.sha));
        }

        let data: BranchCommitData = self
            .graphql(
                repo,
                BRANCH_COMMIT_QUERY,
                serde_json::json!({
                    "owner": repo.owner,
                    "name": repo.name,
                    "qualifiedName": format!("refs/heads/{}", branch),
                }),
            )
            .await?;

        let repository = data.repository.ok_or_else(|| DirectoryError::RepositoryNotFound {
            repo: repo.to_string(),
        })?;

        Ok(repository
            .git_ref
            .and_then(|git_ref| git_ref.target)
            .map(|target| target.oid))
    }

    async fn fetch_branch_page(
        &self,
        repo: &RepositoryRef,
        cursor: Option<&str>,
    ) -> DirectoryResult<BranchPage> {
        if !self.use_graphql() {
            return self.rest_branch_page(repo, cursor).await;
        }

        let data: BranchPageData = self
            .graphql(
                repo,
                BRANCH_PAGE_QUERY,
                serde_json::json!({
                    "owner": repo.owner,
                    "name": repo.name,
                    "pageSize": PAGE_SIZE,
                    "cursor": cursor,
                }),
            )
            .await?;

        let repository = data.repository.ok_or_else(|| DirectoryError::RepositoryNotFound {
            repo: repo.to_string(),
        })?;

        let default_branch = if cursor.is_none() {
            repository.default_branch_ref.map(|branch_ref| branch_ref.name)
        } else {
            None
        };

        let refs = match repository.refs {
            Some(refs) => refs,
            // Empty repository: no refs connection at all.
            None => {
                return Ok(BranchPage {
                    names: Vec::new(),
                    default_branch,
                    page_info: PageInfo {
                        has_next_page: false,
                        end_cursor: None,
                    },
                })
            }
        };

        Ok(BranchPage {
            names: refs.nodes.into_iter().map(|node| node.name).collect(),
            default_branch,
            page_info: refs.page_info,
        })
    }
}

fn rest_error_message(body: &str) -> String {
    #[derive(Deserialize)]
    struct RestError {
        message: String,
    }
    serde_json::from_str::<RestError>(body)
        .map(|error| error.message)
        .unwrap_or_else(|_| body.to_string())
}

// GraphQL wire shapes

#[derive(Deserialize)]
struct GraphqlEnvelope {
    data: Option<serde_json::Value>,
    errors: Option<Vec<GraphqlError>>,
}

#[derive(Deserialize)]
struct GraphqlError {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

#[derive(Deserialize)]
struct DefaultBranchData {
    repository: Option<DefaultBranchRepository>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefaultBranchRepository {
    default_branch_ref: Option<RefWithTarget>,
}

#[derive(Deserialize)]
struct RefWithTarget {
    name: String,
    target: Option<Target>,
}

#[derive(Deserialize)]
struct Target {
    oid: String,
}

#[derive(Deserialize)]
struct BranchCommitData {
    repository: Option<BranchCommitRepository>,
}

#[derive(Deserialize)]
struct BranchCommitRepository {
    #[serde(rename = "ref")]
    git_ref: Option<RefTargetOnly>,
}

#[derive(Deserialize)]
struct RefTargetOnly {
    target: Option<Target>,
}

#[derive(Deserialize)]
struct BranchPageData {
    repository: Option<BranchPageRepository>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BranchPageRepository {
    default_branch_ref: Option<RefName>,
    refs: Option<RefsConnection>,
}

#[derive(Deserialize)]
struct RefName {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RefsConnection {
    nodes: Vec<RefName>,
    page_info: PageInfo,
}

// REST wire shapes

#[derive(Deserialize)]
struct RestRepository {
    default_branch: String,
}

#[derive(Deserialize)]
struct RestBranch {
    name: String,
    commit: RestCommit,
}

#[derive(Deserialize)]
struct RestCommit {
    sha: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn graphql_envelope_with_data_parses() {
        let body = r#"{
            "data": {
                "repository": {
                    "defaultBranchRef": {
                        "name": "main",
                        "target": { "oid": "0123456789abcdef0123456789abcdef01234567" }
                    }
                }
            }
        }"#;
        let envelope: GraphqlEnvelope = serde_json::from_str(body).unwrap();
        let data: DefaultBranchData = serde_json::from_value(envelope.data.unwrap()).unwrap();
        let branch_ref = data.repository.unwrap().default_branch_ref.unwrap();
        assert_eq!(branch_ref.name, "main");
        assert_eq!(
            branch_ref.target.unwrap().oid,
            "0123456789abcdef0123456789abcdef01234567"
        );
    }

    #[test]
    fn graphql_envelope_with_errors_parses() {
        let body = r#"{
            "data": null,
            "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve to a Repository" }]
        }"#;
        let envelope: GraphqlEnvelope = serde_json::from_str(body).unwrap();
        let error = &envelope.errors.unwrap()[0];
        assert_eq!(error.error_type.as_deref(), Some("NOT_FOUND"));
    }

    #[test]
    fn branch_page_wire_shape_parses() {
        let body = r#"{
            "repository": {
                "defaultBranchRef": { "name": "main" },
                "refs": {
                    "nodes": [{ "name": "main" }, { "name": "release/1.0" }],
                    "pageInfo": { "hasNextPage": true, "endCursor": "Y3Vyc29y" }
                }
            }
        }"#;
        let data: BranchPageData = serde_json::from_str(body).unwrap();
        let refs = data.repository.unwrap().refs.unwrap();
        assert_eq!(refs.nodes.len(), 2);
        assert_eq!(refs.nodes[1].name, "release/1.0");
        assert!(refs.page_info.has_next_page);
        assert_eq!(refs.page_info.end_cursor.as_deref(), Some("Y3Vyc29y"));
    }

    #[test]
    fn rest_branch_wire_shape_parses() {
        let body = r#"{
            "name": "master",
            "commit": { "sha": "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d" }
        }"#;
        let branch: RestBranch = serde_json::from_str(body).unwrap();
        assert_eq!(branch.name, "master");
        assert_eq!(branch.commit.sha, "7fd1a60b01f91b314f59955a4e4d4e80d8edf11d");
    }

    #[test]
    fn rest_error_message_prefers_structured_body() {
        assert_eq!(
            rest_error_message(r#"{"message":"API rate limit exceeded"}"#),
            "API rate limit exceeded"
        );
        assert_eq!(rest_error_message("plain text"), "plain text");
    }
}
