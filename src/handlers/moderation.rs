//! Moderation commands: `/warn`, `/mute`, `/hourmute`, `/unmute`, `/alts`.

use super::{Context, Handler, HandlerResult, reason_suffix, require_room};
use crate::error::HandlerError;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use tracing::info;

/// Resolve `user, reason` and return (target id, target name, reason).
async fn moderation_target(
    ctx: &mut Context<'_>,
    target: &str,
    usage: &str,
) -> Result<(String, String, String), HandlerError> {
    if target.is_empty() {
        return Err(HandlerError::ParseFailure(format!("Usage: {usage}")));
    }
    let reason = ctx.resolve_target(target).await?;
    let Some(user) = ctx.target_user.clone() else {
        return Err(HandlerError::TargetNotFound(ctx.target_username.clone()));
    };
    let user = user.read().await;
    Ok((user.id.clone(), user.name.clone(), reason))
}

/// Fail unless the target has joined the room.
async fn ensure_in_room(ctx: &Context<'_>, room_id: &str, name: &str) -> Result<(), HandlerError> {
    let in_room = match &ctx.target_user {
        Some(user) => user.read().await.in_room(room_id),
        None => false,
    };
    if in_room {
        Ok(())
    } else {
        Err(HandlerError::ParseFailure(format!(
            "User {name} is not in the room {room_id}."
        )))
    }
}

// ============================================================================
// /warn
// ============================================================================

pub struct WarnHandler;

#[async_trait]
impl Handler for WarnHandler {
    async fn handle(&self, ctx: &mut Context<'_>, target: &str) -> HandlerResult {
        let room_id = require_room(ctx)?;
        let (target_id, name, reason) =
            moderation_target(ctx, target, "/warn [user], [reason]").await?;
        let Some(_cap) = ctx
            .authority()
            .request_warn_cap(ctx.user_id, Some(room_id), &target_id)
            .await
        else {
            return Err(ctx.deny().await);
        };
        ensure_in_room(ctx, room_id, &name).await?;
        let suffix = reason_suffix(&reason)?;

        let actor = ctx.actor_name().await;
        info!(room = %room_id, actor = %actor, target = %name, "Warned user");
        ctx.popup(&target_id, format!("{actor} has warned you.{suffix}"))
            .await?;
        ctx.add_to_room(format!("{name} was warned by {actor}.{suffix}"))
            .await?;
        ctx.mod_log(format!("{name} was warned by {actor}.{suffix}"))
            .await?;
        Ok(None)
    }

    fn help(&self) -> &'static [&'static str] {
        &["/warn [user], [reason] - Warns a user, showing them the reason in a popup. Requires: % @ & ~ #"]
    }
}

// ============================================================================
// /mute, /hourmute
// ============================================================================

/// Handler for timed mutes. One instance per duration.
pub struct MuteHandler {
    minutes: i64,
    hour: bool,
}

impl MuteHandler {
    /// Seven-minute mute.
    pub fn mute() -> Self {
        Self {
            minutes: 7,
            hour: false,
        }
    }

    /// Sixty-minute mute.
    pub fn hourmute() -> Self {
        Self {
            minutes: 60,
            hour: true,
        }
    }

    fn label(&self) -> String {
        if self.hour {
            "1 hour".to_string()
        } else {
            format!("{} minutes", self.minutes)
        }
    }
}

#[async_trait]
impl Handler for MuteHandler {
    async fn handle(&self, ctx: &mut Context<'_>, target: &str) -> HandlerResult {
        let room_id = require_room(ctx)?;
        let usage = if self.hour {
            "/hourmute [user], [reason]"
        } else {
            "/mute [user], [reason]"
        };
        let (target_id, name, reason) = moderation_target(ctx, target, usage).await?;

        let authority = ctx.authority();
        let granted = if self.hour {
            authority
                .request_hourmute_cap(ctx.user_id, Some(room_id), &target_id)
                .await
                .is_some()
        } else {
            authority
                .request_mute_cap(ctx.user_id, Some(room_id), &target_id)
                .await
                .is_some()
        };
        if !granted {
            return Err(ctx.deny().await);
        }
        ensure_in_room(ctx, room_id, &name).await?;
        let suffix = reason_suffix(&reason)?;

        let Some(room) = ctx.hub.room(room_id) else {
            return Err(HandlerError::Internal(format!("room {room_id} vanished")));
        };
        let until = Utc::now() + Duration::minutes(self.minutes);
        room.write().await.mute(&target_id, until);

        let actor = ctx.actor_name().await;
        let label = self.label();
        info!(room = %room_id, actor = %actor, target = %name, until = %until, "Muted user");
        ctx.popup(
            &target_id,
            format!("{actor} has muted you in {room_id} for {label}.{suffix}"),
        )
        .await?;
        ctx.add_to_room(format!("{name} was muted by {actor} for {label}.{suffix}"))
            .await?;
        ctx.mod_log(format!("{name} was muted by {actor} for {label}.{suffix}"))
            .await?;
        Ok(None)
    }

    fn help(&self) -> &'static [&'static str] {
        if self.hour {
            &["/hourmute [user], [reason] - Mutes a user in the room for 60 minutes. Requires: @ & ~ #"]
        } else {
            &["/mute [user], [reason] - Mutes a user in the room for 7 minutes. Requires: % @ & ~ #"]
        }
    }
}

// ============================================================================
// /unmute
// ============================================================================

pub struct UnmuteHandler;

#[async_trait]
impl Handler for UnmuteHandler {
    async fn handle(&self, ctx: &mut Context<'_>, target: &str) -> HandlerResult {
        let room_id = require_room(ctx)?;
        let (target_id, name, _) = moderation_target(ctx, target, "/unmute [user]").await?;

        let Some(_cap) = ctx
            .authority()
            .request_mute_cap(ctx.user_id, Some(room_id), &target_id)
            .await
        else {
            return Err(ctx.deny().await);
        };

        let Some(room) = ctx.hub.room(room_id) else {
            return Err(HandlerError::Internal(format!("room {room_id} vanished")));
        };
        let was_muted = {
            let mut room = room.write().await;
            let muted = room.is_muted(&target_id, Utc::now());
            room.unmute(&target_id);
            muted
        };
        if !was_muted {
            return Err(HandlerError::ParseFailure(format!("{name} is not muted.")));
        }

        let actor = ctx.actor_name().await;
        info!(room = %room_id, actor = %actor, target = %name, "Unmuted user");
        ctx.add_to_room(format!("{name} was unmuted by {actor}."))
            .await?;
        ctx.mod_log(format!("{name} was unmuted by {actor}.")).await?;
        Ok(None)
    }

    fn help(&self) -> &'static [&'static str] {
        &["/unmute [user] - Removes a mute from a user in the room. Requires: % @ & ~ #"]
    }
}

// ============================================================================
// /alts
// ============================================================================

pub struct AltsHandler;

#[async_trait]
impl Handler for AltsHandler {
    async fn handle(&self, ctx: &mut Context<'_>, target: &str) -> HandlerResult {
        let (target_id, name, _) = moderation_target(ctx, target, "/alts [user]").await?;

        let Some(_cap) = ctx
            .authority()
            .request_alts_cap(ctx.user_id, ctx.room_id, &target_id)
            .await
        else {
            return Err(ctx.deny().await);
        };

        let Some(user) = ctx.target_user.clone() else {
            return Err(HandlerError::TargetNotFound(name));
        };
        let (alts, ips) = {
            let user = user.read().await;
            let alts: Vec<String> = user.alts.iter().cloned().collect();
            let ips: Vec<String> = user.ips.iter().map(|ip| ip.to_string()).collect();
            (alts, ips)
        };

        if alts.is_empty() {
            ctx.notice(format!("{name} has no known alts.")).await?;
        } else {
            ctx.notice(format!("Alts of {name}: {}", alts.join(", ")))
                .await?;
        }
        let ips = if ips.is_empty() {
            "none".to_string()
        } else {
            ips.join(", ")
        };
        Ok(Some(format!("IPs of {name}: {ips}")))
    }

    fn help(&self) -> &'static [&'static str] {
        &["/alts [user] - Shows a user's known alts and IP addresses. Requires: % @ & ~ #"]
    }
}
