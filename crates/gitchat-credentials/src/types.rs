// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Registry types and user-id validation.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// Metadata row for a stored token. The secret itself lives in the sealed
/// per-user file, never in the registry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TokenRecord {
    /// Owning user's identity as established by the authentication layer.
    pub user_id: String,

    /// When the token was first stored (ISO 8601 string)
    pub created: DateTime<Utc>,

    /// When the token was last replaced (ISO 8601 string)
    pub updated: DateTime<Utc>,
}

impl TokenRecord {
    pub fn new(user_id: String) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            created: now,
            updated: now,
        }
    }

    pub fn mark_updated(&mut self) {
        self.updated = Utc::now();
    }
}

/// Registry of all stored tokens' metadata.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TokenRegistry {
    #[serde(default)]
    pub tokens: Vec<TokenRecord>,
}

impl TokenRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, user_id: &str) -> Option<&TokenRecord> {
        self.tokens.iter().find(|record| record.user_id == user_id)
    }

    /// Insert or refresh the record for a user.
    pub fn upsert(&mut self, user_id: &str) {
        match self.tokens.iter_mut().find(|record| record.user_id == user_id) {
            Some(record) => record.mark_updated(),
            None => self.tokens.push(TokenRecord::new(user_id.to_string())),
        }
    }

    pub fn remove(&mut self, user_id: &str) {
        self.tokens.retain(|record| record.user_id != user_id);
    }
}

fn user_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9._-]{0,63}$").expect("pattern compiles"))
}

/// Validate a user id before it is used as part of a file name.
pub fn validate_user_id(user_id: &str) -> Result<()> {
    if user_id_pattern().is_match(user_id) {
        Ok(())
    } else {
        Err(Error::InvalidUserId(user_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_upsert_refreshes_existing_rows() {
        let mut registry = TokenRegistry::new();
        registry.upsert("mona");
        let created = registry.find("mona").unwrap().created;

        registry.upsert("mona");
        assert_eq!(registry.tokens.len(), 1);
        assert_eq!(registry.find("mona").unwrap().created, created);
        assert!(registry.find("mona").unwrap().updated >= created);
    }

    #[test]
    fn user_id_validation_blocks_path_traversal() {
        assert!(validate_user_id("mona").is_ok());
        assert!(validate_user_id("mona.lisa-42_x").is_ok());
        assert!(validate_user_id("../../etc/passwd").is_err());
        assert!(validate_user_id(".hidden").is_err());
        assert!(validate_user_id("").is_err());
        assert!(validate_user_id("has space").is_err());
        assert!(validate_user_id(&"x".repeat(65)).is_err());
    }

    #[test]
    fn registry_round_trips_through_toml() {
        let mut registry = TokenRegistry::new();
        registry.upsert("mona");
        registry.upsert("hubot");

        let serialized = toml::to_string(&registry).unwrap();
        let restored: TokenRegistry = toml::from_str(&serialized).unwrap();
        assert_eq!(restored.tokens.len(), 2);
        assert!(restored.find("hubot").is_some());
    }
}
