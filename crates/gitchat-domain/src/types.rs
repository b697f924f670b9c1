// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Branch, commit, and chat session metadata.

use serde::{Deserialize, Serialize};

/// A branch and its head commit, when known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchInfo {
    pub name: String,
    /// Head commit hash; `None` until resolved.
    pub commit: Option<String>,
}

/// A repository's default branch and its current head commit.
///
/// Only ever constructed from a fully successful Directory resolution;
/// partial results are never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultBranchInfo {
    pub default_branch_name: String,
    pub default_commit: String,
}

/// Result of enumerating a repository's branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchList {
    /// Branch names in the order the Directory emitted them, deduplicated.
    pub branches: Vec<String>,
    /// Default branch name as reported by the first page's metadata.
    pub default_branch: Option<String>,
}

/// A chat session created by the remote chat-creation service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demo_url: Option<String>,
}

/// Privacy level requested for a chat session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrivacyLevel {
    #[default]
    Public,
    Private,
}

impl PrivacyLevel {
    pub fn is_private(self) -> bool {
        matches!(self, PrivacyLevel::Private)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_session_wire_shape_uses_camel_case() {
        let session: ChatSession = serde_json::from_str(
            r#"{"id":"chat-1","url":"https://chat.example/c/1","demoUrl":"https://demo.example/1"}"#,
        )
        .unwrap();
        assert_eq!(session.demo_url.as_deref(), Some("https://demo.example/1"));

        let missing: ChatSession =
            serde_json::from_str(r#"{"id":"chat-2","url":"https://chat.example/c/2"}"#).unwrap();
        assert_eq!(missing.demo_url, None);
    }
}
