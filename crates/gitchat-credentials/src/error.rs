// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types for token storage

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for token storage operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during token storage operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid user id: {0}")]
    InvalidUserId(String),

    #[error("Directory not accessible: {0}")]
    DirectoryNotAccessible(PathBuf),

    #[error("Encryption error: {0}")]
    Encryption(String),
}
