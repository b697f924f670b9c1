// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Wire shapes shared between Directory transports and the resolver.

use serde::{Deserialize, Serialize};

/// Pagination metadata for a branch page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub has_next_page: bool,
    /// Opaque cursor to pass back verbatim when fetching the next page.
    pub end_cursor: Option<String>,
}

/// One page of branch names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchPage {
    /// Branch names in the order the Directory emitted them.
    pub names: Vec<String>,
    /// Default branch name; transports populate this on the first page only.
    pub default_branch: Option<String>,
    pub page_info: PageInfo,
}
