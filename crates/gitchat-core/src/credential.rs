// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Credential selection.

use crate::error::{CoreError, CoreResult};

/// Credential a chat is created under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credential {
    /// Process-wide key used for public chats.
    System(String),
    /// The requesting user's own key, decrypted on demand.
    User(String),
}

impl Credential {
    pub fn secret(&self) -> &str {
        match self {
            Credential::System(secret) | Credential::User(secret) => secret,
        }
    }
}

/// Decide which credential a chat is created under.
///
/// The match is exhaustive on purpose: a user who asked for a private chat
/// must never be handed the system key because their own is missing. The
/// `(true, None)` arm is the only place `NoTokenConfigured` originates.
pub fn resolve_credential(
    privacy_requested: bool,
    user_token: Option<String>,
    system_key: Option<&str>,
) -> CoreResult<Credential> {
    match (privacy_requested, user_token) {
        (false, _) => system_key
            .map(|key| Credential::System(key.to_string()))
            .ok_or(CoreError::MissingSystemKey),
        (true, Some(token)) => Ok(Credential::User(token)),
        (true, None) => Err(CoreError::NoTokenConfigured),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_requests_use_the_system_key() {
        let credential = resolve_credential(false, None, Some("system-key")).unwrap();
        assert_eq!(credential, Credential::System("system-key".to_string()));

        // A held user token does not divert a public request.
        let credential =
            resolve_credential(false, Some("user-key".to_string()), Some("system-key")).unwrap();
        assert_eq!(credential, Credential::System("system-key".to_string()));
    }

    #[test]
    fn missing_system_key_is_a_configuration_error() {
        assert!(matches!(
            resolve_credential(false, None, None),
            Err(CoreError::MissingSystemKey)
        ));
    }

    #[test]
    fn private_requests_use_the_user_token() {
        let credential =
            resolve_credential(true, Some("user-key".to_string()), Some("system-key")).unwrap();
        assert_eq!(credential, Credential::User("user-key".to_string()));
    }

    #[test]
    fn private_without_a_token_never_falls_back_to_the_system_key() {
        assert!(matches!(
            resolve_credential(true, None, Some("system-key")),
            Err(CoreError::NoTokenConfigured)
        ));
    }
}
