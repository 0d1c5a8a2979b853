//! Query parsing.

use super::spec::{Category, SearchSpec};
use super::FilterError;
use dexchat_data::Catalog;

/// Tier keywords, lowercase.
pub const TIERS: [&str; 12] = [
    "uber", "ou", "uu", "lc", "cap", "bl", "bl2", "ru", "bl3", "nu", "pu", "nfe",
];

/// Color keywords, lowercase.
pub const COLORS: [&str; 10] = [
    "green", "red", "blue", "white", "brown", "yellow", "purple", "pink", "gray", "black",
];

const MAX_GEN: u8 = 6;
const MAX_TYPES: usize = 2;
const MAX_MOVES: usize = 4;

/// Parse a comma-separated query against the catalog.
///
/// Each term is tried, in order, as an ability, a tier, a color, a
/// generation, `all`, `mega`/`megas`, `<name> type`, and finally a move.
pub fn parse(query: &str, catalog: &Catalog) -> Result<SearchSpec, FilterError> {
    let mut spec = SearchSpec::default();

    for token in query.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (include, term) = match token.strip_prefix('!') {
            Some(rest) => (false, rest.trim()),
            None => (true, token),
        };
        let lower = term.to_lowercase();

        if let Some(ability) = catalog.ability(term) {
            spec.abilities
                .insert(Category::Ability, ability.id.clone(), include)?;
            if spec.abilities.required_count() > 1 {
                return Err(FilterError::TooManyAbilities);
            }
            continue;
        }

        if TIERS.contains(&lower.as_str()) {
            spec.tiers.insert(Category::Tier, lower, include)?;
            continue;
        }

        if COLORS.contains(&lower.as_str()) {
            spec.colors.insert(Category::Color, lower, include)?;
            continue;
        }

        if let Some(generation) = parse_gen(&lower) {
            spec.gens.insert(Category::Gen, generation.to_string(), include)?;
            continue;
        }

        if lower == "all" {
            spec.show_all = true;
            continue;
        }

        if lower == "mega" || lower == "megas" {
            spec.mega = Some(include);
            continue;
        }

        if let Some(name) = lower.strip_suffix(" type") {
            if let Some(type_name) = catalog.type_name(name) {
                spec.types.insert(Category::Type, type_name, include)?;
                if spec.types.required_count() > MAX_TYPES {
                    return Err(FilterError::TooManyTypes);
                }
                continue;
            }
        }

        if let Some(mv) = catalog.get_move(term) {
            spec.moves.insert(Category::Move, mv.id.clone(), include)?;
            if spec.moves.required_count() > MAX_MOVES {
                return Err(FilterError::TooManyMoves);
            }
            continue;
        }

        return Err(FilterError::UnknownTerm(term.to_string()));
    }

    if spec.has_no_terms() {
        return Err(FilterError::NothingToSearch);
    }
    Ok(spec)
}

/// `"3"`, `"gen3"` or `"gen 3"`.
fn parse_gen(lower: &str) -> Option<u8> {
    let digits = lower.strip_prefix("gen").unwrap_or(lower).trim();
    if digits.len() != 1 {
        return None;
    }
    digits
        .parse::<u8>()
        .ok()
        .filter(|g| (1..=MAX_GEN).contains(g))
}
