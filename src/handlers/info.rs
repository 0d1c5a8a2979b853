//! Information commands: `/help`, `/whoami`.

use super::{Context, Handler, HandlerResult, require_room};
use crate::error::HandlerError;
use async_trait::async_trait;

pub struct HelpHandler;

#[async_trait]
impl Handler for HelpHandler {
    async fn handle(&self, ctx: &mut Context<'_>, target: &str) -> HandlerResult {
        let registry = ctx.registry;
        let name = target.trim().trim_start_matches(['/', '!']).to_lowercase();

        if name.is_empty() {
            ctx.begin_broadcast().await?;
            let commands: Vec<String> = registry
                .commands()
                .into_iter()
                .map(|c| format!("/{c}"))
                .collect();
            ctx.reply(format!("Commands: {}", commands.join(", "))).await?;
            ctx.reply("Use /help <command> for more information on a command. Use ! instead of / to show a command's output to the room.")
                .await?;
            return Ok(None);
        }

        let Some((command, lines)) = registry.help_for(&name) else {
            return Err(HandlerError::ParseFailure(format!(
                "Help for the command '/{name}' was not found. Try /help for general help."
            )));
        };

        ctx.begin_broadcast().await?;
        if lines.is_empty() {
            ctx.reply(format!("/{command}: no help available.")).await?;
        }
        for line in lines {
            ctx.reply(*line).await?;
        }
        let aliases = registry.aliases_of(command);
        if !aliases.is_empty() {
            let aliases: Vec<String> = aliases.iter().map(|a| format!("/{a}")).collect();
            ctx.reply(format!("Aliases: {}", aliases.join(", "))).await?;
        }
        Ok(None)
    }

    fn help(&self) -> &'static [&'static str] {
        &[
            "/help - Lists every command.",
            "/help [command] - Shows help for a command.",
        ]
    }
}

pub struct WhoamiHandler;

#[async_trait]
impl Handler for WhoamiHandler {
    async fn handle(&self, ctx: &mut Context<'_>, _target: &str) -> HandlerResult {
        let Some(user) = ctx.actor() else {
            return Err(HandlerError::Internal(format!(
                "invoking user {} is not in the hub",
                ctx.user_id
            )));
        };
        let (name, global) = {
            let user = user.read().await;
            (user.name.clone(), user.rank)
        };

        let mut text = format!("You are {name}. Global rank: {global}.");
        if let Ok(room) = require_room(ctx) {
            let effective = ctx.effective_rank().await;
            text.push_str(&format!(" Rank in {room}: {effective}."));
        }
        Ok(Some(text))
    }

    fn help(&self) -> &'static [&'static str] {
        &["/whoami - Shows your name and rank."]
    }
}
