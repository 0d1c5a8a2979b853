//! Room and broadcast configuration.

use super::defaults::{
    default_broadcast_cooldown_ms, default_broadcast_rank, default_history_limit,
    default_rank_ceiling,
};
use crate::state::Rank;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// Broadcast cooldown configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BroadcastConfig {
    /// Milliseconds a user must wait between broadcasts in the same room
    /// (default: 3000). Zero disables the cooldown.
    #[serde(default = "default_broadcast_cooldown_ms")]
    pub cooldown_ms: u64,
    /// Lowest rank allowed to broadcast with `!` (default: voice).
    #[serde(default = "default_broadcast_rank")]
    pub min_rank: Rank,
}

impl BroadcastConfig {
    pub fn cooldown(&self) -> Option<Duration> {
        (self.cooldown_ms > 0).then(|| Duration::from_millis(self.cooldown_ms))
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            cooldown_ms: default_broadcast_cooldown_ms(),
            min_rank: default_broadcast_rank(),
        }
    }
}

/// Room behaviour shared by every room.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomsConfig {
    /// Highest rank a room-level grant can give (default: leader).
    #[serde(default = "default_rank_ceiling")]
    pub rank_ceiling: Rank,
    /// Entries kept in each room's visible history (default: 100).
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Rooms created at startup.
    #[serde(default, rename = "room")]
    pub rooms: Vec<RoomBlock>,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            rank_ceiling: default_rank_ceiling(),
            history_limit: default_history_limit(),
            rooms: Vec::new(),
        }
    }
}

/// A room declared in the config file.
#[derive(Debug, Clone, Deserialize)]
pub struct RoomBlock {
    pub title: String,
    #[serde(default)]
    pub private: bool,
    pub rules: Option<String>,
    /// Room auth: user name -> rank.
    #[serde(default)]
    pub auth: HashMap<String, Rank>,
}
