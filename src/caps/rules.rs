//! Permission rules.
//!
//! [`PermissionGate::can`] is a pure function of ranks: no state is read
//! here. The authority gathers ranks from the hub and asks the gate.

use crate::state::{Rank, Room};
use std::fmt;

/// Something an actor may be allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    Broadcast,
    Rules,
    Declare,
    Warn,
    Mute,
    HourMute,
    Alts,
    Potd,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        match self {
            Permission::Broadcast => "broadcast",
            Permission::Rules => "rules",
            Permission::Declare => "declare",
            Permission::Warn => "warn",
            Permission::Mute => "mute",
            Permission::HourMute => "hourmute",
            Permission::Alts => "alts",
            Permission::Potd => "potd",
        }
    }

    /// Lowest rank holding this permission. Broadcast is configurable and
    /// resolved by the gate.
    fn required_rank(self) -> Rank {
        match self {
            Permission::Broadcast => Rank::Voice,
            Permission::Warn | Permission::Mute | Permission::Alts => Rank::Driver,
            Permission::HourMute => Rank::Moderator,
            Permission::Rules | Permission::Declare => Rank::Leader,
            Permission::Potd => Rank::Admin,
        }
    }

    /// Rank-independent permissions never compare against a target's rank.
    pub fn rank_independent(self) -> bool {
        matches!(
            self,
            Permission::Broadcast | Permission::Rules | Permission::Declare | Permission::Potd
        )
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An actor or target as seen by the gate.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    pub id: &'a str,
    /// Global rank.
    pub rank: Rank,
}

/// Evaluates permissions against ranks and room grants.
#[derive(Debug, Clone)]
pub struct PermissionGate {
    /// Highest rank a room grant can give.
    room_ceiling: Rank,
    broadcast_rank: Rank,
}

impl PermissionGate {
    pub fn new(room_ceiling: Rank, broadcast_rank: Rank) -> Self {
        Self {
            room_ceiling,
            broadcast_rank,
        }
    }

    pub fn room_ceiling(&self) -> Rank {
        self.room_ceiling
    }

    /// Lowest rank holding `permission`.
    pub fn min_rank(&self, permission: Permission) -> Rank {
        match permission {
            Permission::Broadcast => self.broadcast_rank,
            other => other.required_rank(),
        }
    }

    /// Rank after a room grant. A grant never exceeds the global rank or
    /// the ceiling; it can lower a rank inside the room.
    pub fn effective_rank(&self, global: Rank, room_grant: Option<Rank>) -> Rank {
        match room_grant {
            Some(grant) => grant.min(global).min(self.room_ceiling),
            None => global,
        }
    }

    /// Rank of `subject` inside `room`, or the global rank outside rooms.
    ///
    /// In a private room only room auth counts: a user without a grant
    /// there is unranked.
    pub fn rank_in(&self, subject: Subject<'_>, room: Option<&Room>) -> Rank {
        let Some(room) = room else {
            return subject.rank;
        };
        match room.rank_override(subject.id) {
            None if room.is_private => Rank::Unranked,
            grant => self.effective_rank(subject.rank, grant),
        }
    }

    /// Whether `actor` holds `permission`, optionally over `target` and
    /// inside `room`.
    ///
    /// A global owner always passes. Otherwise the actor's effective rank
    /// must reach the permission's minimum, and for target-relative
    /// permissions must be strictly above the target's effective rank.
    /// Acting on oneself skips the comparison.
    pub fn can(
        &self,
        actor: Subject<'_>,
        permission: Permission,
        target: Option<Subject<'_>>,
        room: Option<&Room>,
    ) -> bool {
        if actor.rank == Rank::Owner {
            return true;
        }

        let actor_rank = self.rank_in(actor, room);
        if actor_rank < self.min_rank(permission) {
            return false;
        }

        match target {
            Some(target) if !permission.rank_independent() && target.id != actor.id => {
                self.rank_in(target, room) < actor_rank
            }
            _ => true,
        }
    }
}

impl Default for PermissionGate {
    fn default() -> Self {
        Self::new(Rank::Leader, Rank::Voice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(id: &str, rank: Rank) -> Subject<'_> {
        Subject { id, rank }
    }

    #[test]
    fn minimum_rank_is_required() {
        let gate = PermissionGate::default();
        assert!(!gate.can(subject("a", Rank::Voice), Permission::Mute, None, None));
        assert!(gate.can(subject("a", Rank::Driver), Permission::Mute, None, None));
        assert!(!gate.can(subject("a", Rank::Leader), Permission::Potd, None, None));
    }

    #[test]
    fn unranked_cannot_hourmute_moderator() {
        let gate = PermissionGate::default();
        let actor = subject("a", Rank::Unranked);
        let target = subject("b", Rank::Moderator);
        assert!(!gate.can(actor, Permission::HourMute, Some(target), None));
    }

    #[test]
    fn antisymmetric_when_ranks_differ() {
        let gate = PermissionGate::default();
        for perm in [Permission::Warn, Permission::Mute, Permission::Alts] {
            for &a in &Rank::ALL[..6] {
                for &b in &Rank::ALL[..6] {
                    if a == b {
                        continue;
                    }
                    let ab = gate.can(subject("a", a), perm, Some(subject("b", b)), None);
                    let ba = gate.can(subject("b", b), perm, Some(subject("a", a)), None);
                    assert!(!(ab && ba), "{perm}: {a} and {b} both allowed");
                }
            }
        }
    }

    #[test]
    fn equal_rank_target_is_denied() {
        let gate = PermissionGate::default();
        let actor = subject("a", Rank::Moderator);
        let target = subject("b", Rank::Moderator);
        assert!(!gate.can(actor, Permission::Warn, Some(target), None));
    }

    #[test]
    fn owner_bypasses_comparison() {
        let gate = PermissionGate::default();
        let actor = subject("a", Rank::Owner);
        let target = subject("b", Rank::Owner);
        assert!(gate.can(actor, Permission::Mute, Some(target), None));
    }

    #[test]
    fn room_grant_never_exceeds_global_rank() {
        let gate = PermissionGate::default();
        let mut room = Room::new("Lobby", 10);
        room.auth.insert("a".to_string(), Rank::Leader);
        room.auth.insert("c".to_string(), Rank::Voice);

        // A leader grant does not lift a voice.
        let voice = subject("a", Rank::Voice);
        assert_eq!(gate.rank_in(voice, Some(&room)), Rank::Voice);
        assert!(!gate.can(voice, Permission::Declare, None, Some(&room)));

        // A lower grant restricts a global driver inside the room only.
        let driver = subject("c", Rank::Driver);
        assert!(!gate.can(driver, Permission::Mute, None, Some(&room)));
        assert!(gate.can(driver, Permission::Mute, None, None));
    }

    #[test]
    fn room_grant_is_clamped_to_ceiling() {
        let gate = PermissionGate::default();
        assert_eq!(gate.effective_rank(Rank::Admin, Some(Rank::Admin)), Rank::Leader);
        assert_eq!(gate.effective_rank(Rank::Admin, None), Rank::Admin);
    }

    #[test]
    fn private_room_ignores_global_rank_without_grant() {
        let gate = PermissionGate::default();
        let mut room = Room::new("Staff", 10);
        room.is_private = true;
        room.auth.insert("b".to_string(), Rank::Moderator);

        let outsider = subject("a", Rank::Moderator);
        let member = subject("b", Rank::Moderator);
        assert_eq!(gate.rank_in(outsider, Some(&room)), Rank::Unranked);
        assert!(!gate.can(outsider, Permission::Warn, None, Some(&room)));
        assert!(gate.can(member, Permission::Warn, Some(outsider), Some(&room)));
        assert!(!gate.can(outsider, Permission::Warn, Some(member), Some(&room)));

        // Owner still passes.
        assert!(gate.can(subject("o", Rank::Owner), Permission::Warn, None, Some(&room)));
    }

    #[test]
    fn acting_on_self_skips_comparison() {
        let gate = PermissionGate::default();
        let actor = subject("a", Rank::Driver);
        assert!(gate.can(actor, Permission::Alts, Some(actor), None));
    }

    #[test]
    fn broadcast_rank_is_configurable() {
        let gate = PermissionGate::new(Rank::Leader, Rank::Unranked);
        assert!(gate.can(subject("a", Rank::Unranked), Permission::Broadcast, None, None));
    }
}
