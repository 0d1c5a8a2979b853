//! Room commands: `/rules`, `/declare`.

use super::{Context, Handler, HandlerResult, require_room};
use crate::error::HandlerError;
use crate::state::HubEvent;
use async_trait::async_trait;
use tracing::info;

pub struct RulesHandler;

#[async_trait]
impl Handler for RulesHandler {
    async fn handle(&self, ctx: &mut Context<'_>, target: &str) -> HandlerResult {
        let room_id = require_room(ctx)?;
        let Some(room) = ctx.hub.room(room_id) else {
            return Err(HandlerError::Internal(format!("room {room_id} vanished")));
        };

        if target.is_empty() {
            ctx.begin_broadcast().await?;
            let (title, link) = {
                let room = room.read().await;
                (room.title.clone(), room.rules_link.clone())
            };
            match link {
                Some(link) => ctx.reply(format!("{title} room rules: {link}")).await?,
                None => ctx.reply(format!("{title} has no room rules link.")).await?,
            }
            return Ok(None);
        }

        let Some(_cap) = ctx.authority().request_rules_cap(ctx.user_id, room_id).await else {
            return Err(ctx.deny().await);
        };

        let clear = matches!(target.to_lowercase().as_str(), "delete" | "remove" | "off");
        let link = (!clear).then(|| target.to_string());
        room.write().await.rules_link = link.clone();
        ctx.hub.emit(HubEvent::RoomSettingsChanged {
            room: room_id.to_string(),
            field: "rules",
        });

        let actor = ctx.actor_name().await;
        info!(room = %room_id, actor = %actor, link = ?link, "Room rules changed");
        let text = match link {
            Some(link) => format!("{actor} set the room rules link to: {link}"),
            None => format!("{actor} removed the room rules link."),
        };
        ctx.add_to_room(format!("({text})")).await?;
        ctx.mod_log(text).await?;
        Ok(None)
    }

    fn help(&self) -> &'static [&'static str] {
        &[
            "/rules - Shows the room's rules link.",
            "/rules [link] - Changes the room's rules link. Requires: & # or room leader",
            "/rules remove - Removes the room's rules link. Requires: & # or room leader",
        ]
    }
}

pub struct DeclareHandler;

#[async_trait]
impl Handler for DeclareHandler {
    async fn handle(&self, ctx: &mut Context<'_>, target: &str) -> HandlerResult {
        let room_id = require_room(ctx)?;
        if target.is_empty() {
            return Err(HandlerError::ParseFailure(
                "Usage: /declare [message]".to_string(),
            ));
        }
        let Some(_cap) = ctx.authority().request_declare_cap(ctx.user_id, room_id).await else {
            return Err(ctx.deny().await);
        };

        ctx.add_to_room(format!("[declaration] {target}")).await?;
        let actor = ctx.actor_name().await;
        info!(room = %room_id, actor = %actor, "Declaration");
        ctx.mod_log(format!("{actor} declared: {target}")).await?;
        Ok(None)
    }

    fn help(&self) -> &'static [&'static str] {
        &["/declare [message] - Anonymously announces a message to the room. Requires: & # or room leader"]
    }
}
