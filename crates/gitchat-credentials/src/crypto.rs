// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Cryptographic operations for token encryption.
//!
//! Tokens are sealed with AES-256-GCM under a process-wide master key. Each
//! write uses a fresh random nonce; the stored blob is `nonce || ciphertext`.

use crate::error::{Error, Result};
use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use base64::Engine;
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;

/// Process-wide master key for sealing tokens at rest.
///
/// Zeroized on drop. Obtained from configuration (base64) or generated for
/// ephemeral test setups.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterKey([u8; KEY_LEN]);

impl MasterKey {
    /// Decode a key from its base64 form (as carried in configuration).
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|err| Error::Config(format!("master key is not valid base64: {}", err)))?;
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| Error::Config(format!("master key must be {} bytes", KEY_LEN)))?;
        Ok(Self(key))
    }

    /// Generate a random key. Intended for tests and ephemeral setups; a
    /// generated key cannot decrypt tokens written under a previous one.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        rand::rngs::OsRng.fill_bytes(&mut key);
        Self(key)
    }

    pub fn to_base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(self.0)
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("MasterKey(..)")
    }
}

/// Seal a token for storage.
pub fn encrypt_token(plaintext: &str, key: &MasterKey) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|err| Error::Encryption(format!("invalid key length: {}", err)))?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext.as_bytes())
        .map_err(|_| Error::Encryption("token encryption failed".to_string()))?;

    let mut sealed = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    sealed.extend_from_slice(&nonce_bytes);
    sealed.extend_from_slice(&ciphertext);
    Ok(sealed)
}

/// Open a sealed token.
pub fn decrypt_token(sealed: &[u8], key: &MasterKey) -> Result<String> {
    if sealed.len() <= NONCE_LEN {
        return Err(Error::Encryption("sealed token is truncated".to_string()));
    }
    let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);

    let cipher = Aes256Gcm::new_from_slice(&key.0)
        .map_err(|err| Error::Encryption(format!("invalid key length: {}", err)))?;

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| Error::Encryption("token decryption failed".to_string()))?;

    String::from_utf8(plaintext)
        .map_err(|_| Error::Encryption("decrypted token is not valid UTF-8".to_string()))
}
