//! Dispatch and search limits.

use super::defaults::{default_display_cap, default_max_depth};
use serde::Deserialize;

/// Command dispatch configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DispatchConfig {
    /// Maximum nesting of re-entrant dispatches (default: 10).
    /// A handler that re-dispatches (e.g. to render `/help`) counts as one level.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Search output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Results shown before a search is sampled and truncated (default: 10).
    #[serde(default = "default_display_cap")]
    pub display_cap: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            display_cap: default_display_cap(),
        }
    }
}
