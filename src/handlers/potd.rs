//! `/potd`: the Pokémon of the Day.

use super::{Context, Handler, HandlerResult};
use crate::error::HandlerError;
use crate::state::Potd;
use async_trait::async_trait;

pub struct PotdHandler;

#[async_trait]
impl Handler for PotdHandler {
    async fn handle(&self, ctx: &mut Context<'_>, target: &str) -> HandlerResult {
        if target.is_empty() {
            ctx.begin_broadcast().await?;
            let text = match ctx.hub.settings.potd() {
                Some(potd) => format!("The Pokémon of the Day is {}.", potd.species),
                None => "There is no Pokémon of the Day right now.".to_string(),
            };
            ctx.reply(text).await?;
            return Ok(None);
        }

        let Some(_cap) = ctx.authority().request_potd_cap(ctx.user_id).await else {
            return Err(ctx.deny().await);
        };
        let actor = ctx.actor_name().await;

        if matches!(target.to_lowercase().as_str(), "off" | "none" | "clear") {
            ctx.hub.settings.set_potd(None);
            ctx.add_to_room("The Pokémon of the Day was removed.").await?;
            ctx.mod_log(format!("{actor} removed the Pokémon of the Day."))
                .await?;
            return Ok(None);
        }

        let Some(species) = ctx.hub.catalog.species(target) else {
            return Err(HandlerError::ParseFailure(format!(
                "Pokémon '{target}' does not exist."
            )));
        };
        let name = species.name.clone();
        ctx.hub.settings.set_potd(Some(Potd {
            species: name.clone(),
            set_by: actor.clone(),
            at: chrono::Utc::now(),
        }));
        ctx.add_to_room(format!("The Pokémon of the Day is now {name}!"))
            .await?;
        ctx.mod_log(format!("{actor} set the Pokémon of the Day to {name}."))
            .await?;
        Ok(None)
    }

    fn help(&self) -> &'static [&'static str] {
        &[
            "/potd - Shows the Pokémon of the Day.",
            "/potd [pokemon] - Sets the Pokémon of the Day. Use 'off' to clear it. Requires: ~ #",
        ]
    }
}
