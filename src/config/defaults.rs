//! Default value functions for configuration.
//!
//! Separated into its own module for clarity and reuse.

use crate::state::Rank;

// =============================================================================
// Server Defaults
// =============================================================================

pub fn default_server_name() -> String {
    "dexchat".to_string()
}

// =============================================================================
// Dispatch Defaults
// =============================================================================

/// Nested self-dispatches allowed below a top-level command.
pub fn default_max_depth() -> usize {
    10
}

// =============================================================================
// Search Defaults
// =============================================================================

pub fn default_display_cap() -> usize {
    10
}

// =============================================================================
// Room Defaults
// =============================================================================

pub fn default_broadcast_cooldown_ms() -> u64 {
    3000
}

pub fn default_broadcast_rank() -> Rank {
    Rank::Voice
}

pub fn default_rank_ceiling() -> Rank {
    Rank::Leader
}

pub fn default_history_limit() -> usize {
    100
}

// =============================================================================
// Console Defaults
// =============================================================================

pub fn default_console_name() -> String {
    "Console".to_string()
}

pub fn default_console_rank() -> Rank {
    Rank::Owner
}

pub fn default_console_room() -> String {
    "lobby".to_string()
}
