// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Repository identity parsing and normalization.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Error returned when a repository URL does not match the accepted shape
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid repository URL: {url}")]
pub struct RepositoryUrlError {
    /// The URL that was rejected
    pub url: String,
}

/// Normalized `{owner, name}` identity derived from a GitHub repository URL.
///
/// Only `https://github.com/<owner>/<name>` is accepted, with an optional
/// `.git` suffix and an optional trailing slash. Anything else is rejected
/// whole; a URL is never partially parsed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

fn repository_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https://github\.com/([A-Za-z0-9][A-Za-z0-9-]*)/([A-Za-z0-9._-]+?)(?:\.git)?/?$")
            .expect("repository URL pattern compiles")
    })
}

impl RepositoryRef {
    /// Parse a repository URL into its normalized identity.
    pub fn parse(url: &str) -> Result<Self, RepositoryUrlError> {
        let captures = repository_url_pattern().captures(url.trim()).ok_or_else(|| {
            RepositoryUrlError {
                url: url.to_string(),
            }
        })?;

        let owner = captures[1].to_string();
        let name = captures[2].to_string();
        if name.is_empty() || name == "." || name == ".." {
            return Err(RepositoryUrlError {
                url: url.to_string(),
            });
        }

        Ok(Self { owner, name })
    }

    /// Build a reference from already-validated path segments.
    ///
    /// Used by the HTTP surface where `owner` and `name` arrive as separate
    /// path parameters; the segments are validated against the same charset
    /// as [`RepositoryRef::parse`].
    pub fn from_parts(owner: &str, name: &str) -> Result<Self, RepositoryUrlError> {
        Self::parse(&format!("https://github.com/{}/{}", owner, name))
    }

    /// Reconstruct the canonical repository URL.
    pub fn url(&self) -> String {
        format!("https://github.com/{}/{}", self.owner, self.name)
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_repository_url() {
        let repo = RepositoryRef::parse("https://github.com/octocat/Hello-World").unwrap();
        assert_eq!(repo.owner, "octocat");
        assert_eq!(repo.name, "Hello-World");
    }

    #[test]
    fn git_suffix_and_trailing_slash_normalize_to_same_ref() {
        let plain = RepositoryRef::parse("https://github.com/vercel/next.js").unwrap();
        let suffixed = RepositoryRef::parse("https://github.com/vercel/next.js.git/").unwrap();
        assert_eq!(plain, suffixed);
        assert_eq!(plain.name, "next.js");
    }

    #[test]
    fn reconstruction_round_trips_through_the_parser() {
        let repo = RepositoryRef::parse("https://github.com/vercel/next.js.git").unwrap();
        let again = RepositoryRef::parse(&repo.url()).unwrap();
        assert_eq!(repo, again);
    }

    #[test]
    fn rejects_non_github_hosts_and_extra_segments() {
        for url in [
            "https://gitlab.com/owner/repo",
            "http://github.com/owner/repo",
            "https://github.com/owner",
            "https://github.com/owner/repo/tree/main",
            "https://github.com//repo",
            "github.com/owner/repo",
            "",
        ] {
            assert!(RepositoryRef::parse(url).is_err(), "should reject {url:?}");
        }
    }

    #[test]
    fn from_parts_validates_segments() {
        assert!(RepositoryRef::from_parts("octocat", "Hello-World").is_ok());
        assert!(RepositoryRef::from_parts("octo/cat", "x").is_err());
        assert!(RepositoryRef::from_parts("", "x").is_err());
    }
}
