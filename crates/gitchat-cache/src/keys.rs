// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Cache key formats.
//!
//! The exact shapes are part of the service's external contract and must not
//! drift: other deployments and the test suite address the same entries.

/// Key for a repository's cached default branch + head commit.
pub fn default_branch_info(owner: &str, name: &str) -> String {
    format!("default-branch-info:{}:{}", owner, name)
}

/// Key for a branch's cached head commit.
pub fn branch_commit(branch: &str, owner: &str, name: &str) -> String {
    format!("commit:{}:{}:{}", branch, owner, name)
}

/// Key for a previously created chat URL.
///
/// An unknown commit renders as the literal `null`; that key is distinct
/// from every definite-commit key and is never promoted to one.
pub fn chat(repository_url: &str, branch: &str, commit: Option<&str>) -> String {
    format!(
        "chat:{}:{}:{}",
        repository_url,
        branch,
        commit.unwrap_or("null")
    )
}

/// Key for a cached repository-URL validation verdict.
pub fn repo_valid(repository_url: &str) -> String {
    format!("repo-valid:{}", repository_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_shapes_match_the_external_contract() {
        assert_eq!(
            default_branch_info("octocat", "Hello-World"),
            "default-branch-info:octocat:Hello-World"
        );
        assert_eq!(
            branch_commit("master", "octocat", "Hello-World"),
            "commit:master:octocat:Hello-World"
        );
        assert_eq!(
            chat("https://github.com/octocat/Hello-World", "master", Some("abc123")),
            "chat:https://github.com/octocat/Hello-World:master:abc123"
        );
        assert_eq!(
            chat("https://github.com/octocat/Hello-World", "master", None),
            "chat:https://github.com/octocat/Hello-World:master:null"
        );
    }
}
