//! `/dexsearch`: multi-criteria species search.

use super::{Context, Handler, HandlerResult};
use crate::broadcast::Sigil;
use crate::search::{self, FilterError};
use async_trait::async_trait;
use tracing::debug;

pub struct DexsearchHandler;

#[async_trait]
impl Handler for DexsearchHandler {
    async fn handle(&self, ctx: &mut Context<'_>, target: &str) -> HandlerResult {
        if target.trim().is_empty() {
            ctx.parse("/help dexsearch").await?;
            return Ok(None);
        }

        let catalog = ctx.hub.catalog.clone();
        let spec = search::parse(target, &catalog)?;
        if spec.show_all && ctx.sigil == Sigil::Broadcast {
            return Err(FilterError::BroadcastAll.into());
        }
        ctx.begin_broadcast().await?;

        let names = search::filter(&spec, &catalog)?;
        crate::metrics::record_search_results(names.len());
        debug!(query = %target, matches = names.len(), "dexsearch");

        let results = {
            let mut rng = rand::thread_rng();
            search::present(names, spec.show_all, ctx.hub.config.display_cap, &mut rng)
        };
        ctx.reply(search::render(&results)).await?;
        Ok(None)
    }

    fn help(&self) -> &'static [&'static str] {
        &[
            "/dexsearch [type], [tier], [color], [move], [ability], [gen] - Searches for Pokémon that fulfil the selected criteria.",
            "Search categories are: type, tier, color, moves, ability, gen.",
            "Valid colors are: green, red, blue, white, brown, yellow, purple, pink, gray and black.",
            "Valid tiers are: Uber/OU/BL/UU/BL2/RU/BL3/NU/PU/NFE/LC/CAP.",
            "Types must be followed by ' type', e.g., 'dragon type'.",
            "Parameters can be excluded through the use of '!', e.g., '!water type' excludes all water types.",
            "The parameter 'mega' can be added to search for Mega Evolutions only, and the parameters 'LC' and 'NFE' can be added to search for Little Cup or not-fully-evolved Pokémon.",
            "The order of the parameters does not matter.",
            "Adding 'all' to the parameters shows every result. A search with 'all' cannot be broadcast.",
        ]
    }
}
