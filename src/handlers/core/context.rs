//! Command handler context and the `Handler` trait.
//!
//! A fresh [`Context`] is built for every command execution, including
//! nested ones. It binds the actor, room and connection the command came
//! from, owns the invocation's broadcast state, and carries the helpers
//! handlers use to reply.

use super::middleware::{Outbound, ResponseMiddleware};
use super::registry::Registry;
use crate::broadcast::{BroadcastState, Sigil};
use crate::caps::CapabilityAuthority;
use crate::error::HandlerError;
use crate::state::{Hub, Rank, User};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

pub use crate::error::HandlerResult;

/// Notice sent once for any failed permission check.
pub const ACCESS_DENIED: &str = "Access denied.";

/// A chat command.
#[async_trait]
pub trait Handler: Send + Sync {
    /// Run the command. Returned text becomes one more private reply.
    async fn handle(&self, ctx: &mut Context<'_>, target: &str) -> HandlerResult;

    /// Help lines shown by `/help <command>`.
    fn help(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Where a command came from. Cheap to copy into nested dispatches.
#[derive(Clone, Copy)]
pub struct Invocation<'a> {
    pub hub: &'a Arc<Hub>,
    pub sender: ResponseMiddleware<'a>,
    pub user_id: &'a str,
    pub room_id: Option<&'a str>,
    pub connection: Uuid,
}

/// Handler context passed to each command handler.
pub struct Context<'a> {
    /// Shared state.
    pub hub: &'a Arc<Hub>,
    /// Registry, for nested dispatch and help.
    pub registry: &'a Registry,
    pub sender: ResponseMiddleware<'a>,
    pub user_id: &'a str,
    pub room_id: Option<&'a str>,
    pub connection: Uuid,
    /// Canonical command name.
    pub command: &'static str,
    /// Name as typed (may be an alias).
    pub invoked_as: String,
    pub sigil: Sigil,
    /// Raw target text.
    pub target: String,
    /// User resolved by [`Context::resolve_target`].
    pub target_user: Option<Arc<RwLock<User>>>,
    /// Name of the resolved target, as typed.
    pub target_username: String,
    /// Nesting level: 0 for a line typed by the user.
    pub depth: usize,
    broadcast: BroadcastState,
}

impl<'a> Context<'a> {
    pub fn new(
        invocation: Invocation<'a>,
        registry: &'a Registry,
        command: &'static str,
        invoked_as: String,
        sigil: Sigil,
        target: String,
        depth: usize,
    ) -> Self {
        Self {
            hub: invocation.hub,
            registry,
            sender: invocation.sender,
            user_id: invocation.user_id,
            room_id: invocation.room_id,
            connection: invocation.connection,
            command,
            invoked_as,
            sigil,
            target,
            target_user: None,
            target_username: String::new(),
            depth,
            broadcast: BroadcastState::Private,
        }
    }

    pub fn invocation(&self) -> Invocation<'a> {
        Invocation {
            hub: self.hub,
            sender: self.sender,
            user_id: self.user_id,
            room_id: self.room_id,
            connection: self.connection,
        }
    }

    pub fn authority(&self) -> CapabilityAuthority {
        CapabilityAuthority::new(self.hub.clone())
    }

    pub fn is_broadcasting(&self) -> bool {
        self.broadcast.is_broadcasting()
    }

    /// The invoking user, if still known.
    pub fn actor(&self) -> Option<Arc<RwLock<User>>> {
        self.hub.user(self.user_id)
    }

    /// The invoking user's display name.
    pub async fn actor_name(&self) -> String {
        match self.actor() {
            Some(user) => user.read().await.name.clone(),
            None => self.user_id.to_string(),
        }
    }

    /// The invoking user's rank in the current room.
    pub async fn effective_rank(&self) -> Rank {
        self.hub.effective_rank(self.user_id, self.room_id).await
    }

    // ========================================================================
    // Output
    // ========================================================================

    pub async fn send(&self, msg: Outbound) -> Result<(), HandlerError> {
        self.sender.send(msg).await?;
        Ok(())
    }

    /// Reply to the invoking connection only.
    pub async fn notice(&self, text: impl Into<String>) -> Result<(), HandlerError> {
        self.send(Outbound::Private {
            user: self.user_id.to_string(),
            connection: self.connection,
            text: text.into(),
        })
        .await
    }

    /// Reply according to the broadcast state: to the room (and its
    /// history) when broadcasting, privately otherwise.
    pub async fn reply(&self, text: impl Into<String>) -> Result<(), HandlerError> {
        match (self.broadcast, self.room_id) {
            (BroadcastState::Broadcasting, Some(room)) => self.to_room(room, text.into()).await,
            _ => self.notice(text).await,
        }
    }

    /// Post a line to the current room and its history.
    pub async fn add_to_room(&self, text: impl Into<String>) -> Result<(), HandlerError> {
        match self.room_id {
            Some(room) => self.to_room(room, text.into()).await,
            None => self.notice(text).await,
        }
    }

    async fn to_room(&self, room_id: &str, text: String) -> Result<(), HandlerError> {
        if let Some(room) = self.hub.room(room_id) {
            room.write().await.push_history(text.clone());
        }
        self.send(Outbound::Room {
            room: room_id.to_string(),
            text,
        })
        .await
    }

    pub async fn popup(&self, user: &str, text: impl Into<String>) -> Result<(), HandlerError> {
        self.send(Outbound::Popup {
            user: user.to_string(),
            text: text.into(),
        })
        .await
    }

    pub async fn mod_log(&self, text: impl Into<String>) -> Result<(), HandlerError> {
        self.send(Outbound::ModLog {
            room: self.room_id.map(str::to_string),
            text: text.into(),
        })
        .await
    }

    /// Send the access-denied notice and return the error to propagate.
    pub async fn deny(&self) -> HandlerError {
        match self.notice(ACCESS_DENIED).await {
            Ok(()) => HandlerError::AccessDenied,
            Err(e) => e,
        }
    }

    // ========================================================================
    // Broadcasting
    // ========================================================================

    /// Ask to show this command's output to the room.
    ///
    /// With the `/` sigil (or outside a room) the invocation stays private
    /// and this returns `Ok`. With `!` the actor needs the broadcast
    /// capability, must not be muted, and the cooldown must have elapsed.
    /// On failure one notice is sent and `AccessDenied` is returned for the
    /// handler to propagate with `?`. Once broadcasting, further calls are
    /// no-ops.
    pub async fn begin_broadcast(&mut self) -> Result<(), HandlerError> {
        if self.broadcast.is_broadcasting() || self.sigil == Sigil::Private {
            return Ok(());
        }
        let Some(room_id) = self.room_id else {
            return Ok(());
        };

        if let Some(room) = self.hub.room(room_id) {
            let muted = room.read().await.is_muted(self.user_id, chrono::Utc::now());
            if muted {
                crate::metrics::record_broadcast("denied");
                self.notice("You can't broadcast while you are muted.").await?;
                return Err(HandlerError::AccessDenied);
            }
        }

        if self
            .authority()
            .request_broadcast_cap(self.user_id, room_id)
            .await
            .is_none()
        {
            crate::metrics::record_broadcast("denied");
            let rank = self.hub.permissions.min_rank(crate::caps::Permission::Broadcast);
            let private = format!("/{} {}", self.invoked_as, self.target);
            self.notice(format!(
                "You need to be {rank} or higher to broadcast this command's information. \
                 To see it for yourself, use: {}",
                private.trim_end()
            ))
            .await?;
            return Err(HandlerError::AccessDenied);
        }

        if !self.hub.broadcast_gate.try_acquire(room_id, self.user_id) {
            crate::metrics::record_broadcast("cooldown");
            self.notice("You can't broadcast this because it was just broadcast.")
                .await?;
            return Err(HandlerError::AccessDenied);
        }

        self.broadcast.promote();
        crate::metrics::record_broadcast("granted");
        debug!(command = self.command, user = %self.user_id, room = %room_id, "Broadcasting");

        let display = match self.actor() {
            Some(user) => user.read().await.display(),
            None => self.user_id.to_string(),
        };
        let echo = if self.target.is_empty() {
            format!("{}: !{}", display.trim_start(), self.invoked_as)
        } else {
            format!("{}: !{} {}", display.trim_start(), self.invoked_as, self.target)
        };
        self.to_room(room_id, echo).await
    }

    // ========================================================================
    // Targets
    // ========================================================================

    /// Split `target` at the first comma, resolve the user named before it,
    /// and return the trimmed rest.
    ///
    /// The resolved user is stored in `target_user`/`target_username`.
    /// An unknown name fails with `TargetNotFound`.
    pub async fn resolve_target(&mut self, target: &str) -> Result<String, HandlerError> {
        let (name, rest) = match target.split_once(',') {
            Some((name, rest)) => (name.trim(), rest.trim()),
            None => (target.trim(), ""),
        };
        self.target_username = name.to_string();
        self.target_user = self.hub.find_user(name);
        if self.target_user.is_none() {
            return Err(HandlerError::TargetNotFound(name.to_string()));
        }
        Ok(rest.to_string())
    }

    /// Id of the resolved target user.
    pub async fn target_id(&self) -> Option<String> {
        match &self.target_user {
            Some(user) => Some(user.read().await.id.clone()),
            None => None,
        }
    }

    // ========================================================================
    // Re-entry
    // ========================================================================

    /// Run another command line as the same actor, room and connection.
    ///
    /// Only `RecursionLimitExceeded` comes back as an error; every other
    /// outcome was already reported to the actor by the nested dispatch.
    pub async fn parse(&self, line: &str) -> Result<(), HandlerError> {
        self.registry
            .execute(self.invocation(), line.to_string(), self.depth + 1)
            .await
    }
}
