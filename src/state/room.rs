//! Chat rooms.

use super::{Rank, UserId};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet, VecDeque};

/// Normalized room id.
pub type RoomId = String;

/// One line of a room's visible history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub at: DateTime<Utc>,
    pub text: String,
}

/// A chat room.
#[derive(Debug)]
pub struct Room {
    pub id: RoomId,
    pub title: String,
    pub is_private: bool,
    /// Link shown by `/rules`.
    pub rules_link: Option<String>,
    /// Room-level rank grants, capped by the global rank.
    pub auth: HashMap<UserId, Rank>,
    pub members: HashSet<UserId>,
    /// Muted users and when the mute ends.
    pub muted: HashMap<UserId, DateTime<Utc>>,
    pub history: VecDeque<HistoryEntry>,
    history_limit: usize,
}

impl Room {
    pub fn new(title: &str, history_limit: usize) -> Self {
        Self {
            id: dexchat_data::to_id(title),
            title: title.to_string(),
            is_private: false,
            rules_link: None,
            auth: HashMap::new(),
            members: HashSet::new(),
            muted: HashMap::new(),
            history: VecDeque::new(),
            history_limit,
        }
    }

    /// Room-level grant for `user`, if any.
    pub fn rank_override(&self, user: &str) -> Option<Rank> {
        self.auth.get(user).copied()
    }

    /// Append a line to the visible history, evicting the oldest past the limit.
    pub fn push_history(&mut self, text: impl Into<String>) {
        if self.history_limit == 0 {
            return;
        }
        while self.history.len() >= self.history_limit {
            self.history.pop_front();
        }
        self.history.push_back(HistoryEntry {
            at: Utc::now(),
            text: text.into(),
        });
    }

    pub fn mute(&mut self, user: &str, until: DateTime<Utc>) {
        self.muted.insert(user.to_string(), until);
    }

    /// Returns whether the user was muted.
    pub fn unmute(&mut self, user: &str) -> bool {
        self.muted.remove(user).is_some()
    }

    /// Whether `user` is muted at `now`. Expired entries count as unmuted.
    pub fn is_muted(&self, user: &str, now: DateTime<Utc>) -> bool {
        self.muted.get(user).is_some_and(|until| *until > now)
    }

    /// Remove expired mutes.
    pub fn expire_mutes(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.muted.len();
        self.muted.retain(|_, until| *until > now);
        before - self.muted.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn history_is_bounded() {
        let mut room = Room::new("Lobby", 2);
        room.push_history("one");
        room.push_history("two");
        room.push_history("three");
        let lines: Vec<_> = room.history.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(lines, ["two", "three"]);
    }

    #[test]
    fn mute_expires() {
        let mut room = Room::new("Lobby", 10);
        let now = Utc::now();
        room.mute("spammer", now + Duration::minutes(7));
        assert!(room.is_muted("spammer", now));
        assert!(!room.is_muted("spammer", now + Duration::minutes(8)));
        assert_eq!(room.expire_mutes(now + Duration::minutes(8)), 1);
        assert!(!room.unmute("spammer"));
    }

    #[test]
    fn id_is_normalized() {
        assert_eq!(Room::new("Tournaments!", 1).id, "tournaments");
    }
}
