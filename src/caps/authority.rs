//! Capability Authority - The capability mint.
//!
//! [`CapabilityAuthority`] is the only code that creates capability tokens.
//! It reads ranks and room grants from the hub, asks the
//! [`PermissionGate`](super::PermissionGate) for a verdict, logs it, and
//! issues the token. Every request here is silent towards the user; the
//! handler context decides whether to send a denial notice.

use super::kinds::*;
use super::rules::Subject;
use super::tokens::{Cap, Capability, TargetScope};
use crate::state::Hub;
use std::sync::Arc;
use tracing::{debug, trace};

// ============================================================================
// Request Method Generation Macros
// ============================================================================

/// Room-scoped capabilities (no target).
macro_rules! impl_room_cap_request {
    ($(
        $(#[$meta:meta])*
        $method:ident -> $cap:ident
    ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub async fn $method(&self, uid: &str, room: &str) -> Option<Cap<$cap>> {
                let scope = room.to_string();
                if self.check::<$cap>(uid, None, Some(room)).await {
                    self.log_grant::<$cap>(uid, &scope);
                    Some(Cap::new(scope))
                } else {
                    self.log_denial::<$cap>(uid, &scope);
                    None
                }
            }
        )*
    };
}

/// Capabilities acting on a target user, optionally inside a room.
macro_rules! impl_target_cap_request {
    ($(
        $(#[$meta:meta])*
        $method:ident -> $cap:ident
    ),* $(,)?) => {
        $(
            $(#[$meta])*
            pub async fn $method(
                &self,
                uid: &str,
                room: Option<&str>,
                target: &str,
            ) -> Option<Cap<$cap>> {
                let scope = TargetScope {
                    room: room.map(str::to_string),
                    target: target.to_string(),
                };
                if self.check::<$cap>(uid, Some(target), room).await {
                    self.log_grant::<$cap>(uid, &scope);
                    Some(Cap::new(scope))
                } else {
                    self.log_denial::<$cap>(uid, &scope);
                    None
                }
            }
        )*
    };
}

// ============================================================================
// Capability Authority
// ============================================================================

/// The sole minter of capability tokens.
pub struct CapabilityAuthority {
    hub: Arc<Hub>,
}

impl CapabilityAuthority {
    #[inline]
    pub fn new(hub: Arc<Hub>) -> Self {
        Self { hub }
    }

    /// Evaluate the permission behind `T` for `uid`.
    async fn check<T: Capability>(&self, uid: &str, target: Option<&str>, room: Option<&str>) -> bool {
        let actor_rank = self.hub.global_rank(uid).await;
        let target_rank = match target {
            Some(t) => Some(self.hub.global_rank(t).await),
            None => None,
        };
        let room = room.and_then(|id| self.hub.room(id));
        let room_guard = match &room {
            Some(room) => Some(room.read().await),
            None => None,
        };

        self.hub.permissions.can(
            Subject {
                id: uid,
                rank: actor_rank,
            },
            T::PERMISSION,
            target.zip(target_rank).map(|(id, rank)| Subject { id, rank }),
            room_guard.as_deref(),
        )
    }

    fn log_grant<T: Capability>(&self, uid: &str, scope: &T::Scope)
    where
        T::Scope: std::fmt::Debug,
    {
        debug!(capability = T::NAME, uid = %uid, scope = ?scope, "Capability granted");
    }

    fn log_denial<T: Capability>(&self, uid: &str, scope: &T::Scope)
    where
        T::Scope: std::fmt::Debug,
    {
        trace!(capability = T::NAME, uid = %uid, scope = ?scope, "Capability denied");
    }

    // ========================================================================
    // Room Capability Requests
    // ========================================================================

    impl_room_cap_request! {
        /// Request capability to broadcast command output to a room.
        request_broadcast_cap -> BroadcastCap,

        /// Request capability to change a room's rules link.
        request_rules_cap -> RulesCap,

        /// Request capability to post a declaration.
        request_declare_cap -> DeclareCap,
    }

    // ========================================================================
    // Target Capability Requests
    // ========================================================================

    impl_target_cap_request! {
        /// Request capability to warn a user.
        request_warn_cap -> WarnCap,

        /// Request capability to mute a user for a few minutes.
        request_mute_cap -> MuteCap,

        /// Request capability to mute a user for an hour.
        request_hourmute_cap -> HourMuteCap,

        /// Request capability to list a user's alts and addresses.
        request_alts_cap -> AltsCap,
    }

    // ========================================================================
    // Server Capability Requests
    // ========================================================================

    /// Request capability to set the Pokémon of the Day.
    pub async fn request_potd_cap(&self, uid: &str) -> Option<Cap<PotdCap>> {
        if self.check::<PotdCap>(uid, None, None).await {
            self.log_grant::<PotdCap>(uid, &());
            Some(Cap::new(()))
        } else {
            self.log_denial::<PotdCap>(uid, &());
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::state::{Rank, Room, User};
    use dexchat_data::Catalog;

    fn hub() -> Arc<Hub> {
        let hub = Hub::new(&Config::default(), Catalog::default());
        hub.add_room(Room::new("Lobby", 10));
        hub.add_user(User::new("Driver", Rank::Driver));
        hub.add_user(User::new("Voice", Rank::Voice));
        hub.add_user(User::new("Mod", Rank::Moderator));
        hub.add_user(User::new("Admin", Rank::Admin));
        Arc::new(hub)
    }

    #[tokio::test]
    async fn target_caps_compare_ranks() {
        let authority = CapabilityAuthority::new(hub());
        let cap = authority
            .request_mute_cap("driver", Some("lobby"), "voice")
            .await
            .unwrap();
        assert_eq!(cap.scope().target, "voice");
        assert!(authority.request_mute_cap("driver", Some("lobby"), "mod").await.is_none());
        assert!(authority.request_hourmute_cap("driver", Some("lobby"), "voice").await.is_none());
    }

    #[tokio::test]
    async fn room_grant_bounds_rank() {
        let hub = hub();
        assert!(
            CapabilityAuthority::new(hub.clone())
                .request_declare_cap("admin", "lobby")
                .await
                .is_some()
        );
        {
            let room = hub.room("lobby").unwrap();
            let mut room = room.write().await;
            room.auth.insert("voice".to_string(), Rank::Leader);
            room.auth.insert("admin".to_string(), Rank::Voice);
        }
        let authority = CapabilityAuthority::new(hub);
        assert!(authority.request_declare_cap("voice", "lobby").await.is_none());
        assert!(authority.request_declare_cap("admin", "lobby").await.is_none());
    }

    #[tokio::test]
    async fn potd_requires_admin() {
        let authority = CapabilityAuthority::new(hub());
        assert!(authority.request_potd_cap("admin").await.is_some());
        assert!(authority.request_potd_cap("mod").await.is_none());
        assert!(authority.request_potd_cap("nobody").await.is_none());
    }
}
