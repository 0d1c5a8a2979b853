//! Chat users as seen by the command core.

use super::Rank;
use std::collections::{BTreeSet, HashSet};
use std::net::IpAddr;

/// Normalized user id.
pub type UserId = String;

/// A connected or known user.
///
/// Session collaborators own these fields; command handlers only read them.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    /// Display name (case and punctuation preserved).
    pub name: String,
    pub rank: Rank,
    /// Other names seen from the same person.
    pub alts: BTreeSet<String>,
    /// Ids of joined rooms.
    pub rooms: HashSet<String>,
    /// Addresses, most recent last.
    pub ips: Vec<IpAddr>,
}

impl User {
    pub fn new(name: &str, rank: Rank) -> Self {
        Self {
            id: dexchat_data::to_id(name),
            name: name.to_string(),
            rank,
            alts: BTreeSet::new(),
            rooms: HashSet::new(),
            ips: Vec::new(),
        }
    }

    pub fn in_room(&self, room: &str) -> bool {
        self.rooms.contains(room)
    }

    /// Name prefixed with the global rank symbol.
    pub fn display(&self) -> String {
        format!("{}{}", self.rank.symbol(), self.name)
    }
}
