//! Search evaluation and presentation.

use super::spec::{Category, Criteria, PASS_ORDER, SearchSpec};
use super::FilterError;
use dexchat_data::{Catalog, Species, to_id};
use rand::Rng;
use rand::seq::SliceRandom;
use std::collections::{BTreeMap, HashMap};
use tracing::trace;

/// Format whose banlist excludes species from the derived LC tier.
const LC_FORMAT: &str = "lc";

type Pool<'c> = BTreeMap<&'c str, &'c Species>;

/// Run `spec` against `catalog`. Returns matching species names in
/// lexicographic order.
pub fn filter(spec: &SearchSpec, catalog: &Catalog) -> Result<Vec<String>, FilterError> {
    let mut pool = legal_pool(spec, catalog);

    for category in PASS_ORDER {
        let criteria = spec.criteria(category);
        if criteria.is_empty() {
            continue;
        }
        match category {
            Category::Type => type_pass(&mut pool, criteria),
            Category::Tier => tier_pass(&mut pool, criteria, catalog),
            Category::Gen => equality_pass(&mut pool, criteria, |s| s.generation.to_string()),
            Category::Color => equality_pass(&mut pool, criteria, |s| s.color.to_lowercase()),
            Category::Ability => ability_pass(&mut pool, criteria),
            Category::Move => move_pass(&mut pool, criteria, catalog)?,
        }
        trace!(pass = %category, remaining = pool.len(), "Search pass done");
    }

    // Alternate formes are listed under their base species.
    let mut names: Vec<String> = pool
        .values()
        .filter(|s| s.is_base_forme() || !pool.contains_key(to_id(s.base_species()).as_str()))
        .map(|s| s.name.clone())
        .collect();
    names.sort();
    Ok(names)
}

/// Entries any search may return: not hidden, CAP only when asked for,
/// and the mega modifier applied.
fn legal_pool<'c>(spec: &SearchSpec, catalog: &'c Catalog) -> Pool<'c> {
    let want_cap = spec.tiers.get("cap") == Some(true);
    catalog
        .all_species()
        .filter(|s| !s.is_hidden())
        .filter(|s| want_cap || !s.is_cap())
        .filter(|s| spec.mega.is_none_or(|mega| s.is_mega == mega))
        .map(|s| (s.id.as_str(), s))
        .collect()
}

fn type_pass(pool: &mut Pool<'_>, criteria: &Criteria) {
    let required: Vec<&str> = criteria.required().collect();
    let excluded: Vec<&str> = criteria.excluded().collect();
    pool.retain(|_, s| {
        if excluded.iter().any(|t| s.has_type(t)) {
            return false;
        }
        match required.len() {
            0 => true,
            2 => required.iter().all(|t| s.has_type(t)),
            _ => required.iter().any(|t| s.has_type(t)),
        }
    });
}

/// Derived Little Cup eligibility: first stage of a line that evolves and
/// is not on the LC banlist.
pub fn is_little_cup(species: &Species, catalog: &Catalog) -> bool {
    !species.evos.is_empty()
        && species.prevo.is_none()
        && !catalog.is_banned(LC_FORMAT, &species.id)
}

fn tier_pass(pool: &mut Pool<'_>, criteria: &Criteria, catalog: &Catalog) {
    let in_tier = |s: &Species, tier: &str| {
        if tier == LC_FORMAT {
            is_little_cup(s, catalog)
        } else {
            s.tier.eq_ignore_ascii_case(tier)
        }
    };
    let required: Vec<&str> = criteria.required().collect();
    let excluded: Vec<&str> = criteria.excluded().collect();
    pool.retain(|_, s| {
        if excluded.iter().any(|t| in_tier(s, t)) {
            return false;
        }
        required.is_empty() || required.iter().any(|t| in_tier(s, t))
    });
}

fn equality_pass(pool: &mut Pool<'_>, criteria: &Criteria, value: impl Fn(&Species) -> String) {
    let required: Vec<&str> = criteria.required().collect();
    let excluded: Vec<&str> = criteria.excluded().collect();
    pool.retain(|_, s| {
        let v = value(s);
        if excluded.contains(&v.as_str()) {
            return false;
        }
        required.is_empty() || required.contains(&v.as_str())
    });
}

fn ability_pass(pool: &mut Pool<'_>, criteria: &Criteria) {
    pool.retain(|_, s| criteria.iter().all(|(ability, include)| s.has_ability(ability) == include));
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Keep,
    /// Cannot learn a required move.
    Missing,
    /// Learns an excluded move.
    Excluded,
}

fn move_pass(pool: &mut Pool<'_>, criteria: &Criteria, catalog: &Catalog) -> Result<(), FilterError> {
    let moves = criteria
        .iter()
        .map(|(id, include)| {
            catalog
                .get_move(id)
                .map(|mv| (mv, include))
                .ok_or_else(|| FilterError::UnknownMove(id.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut verdicts: HashMap<&str, Verdict> = HashMap::with_capacity(pool.len());
    for (&id, species) in pool.iter() {
        let mut verdict = Verdict::Keep;
        for &(mv, include) in &moves {
            match catalog.can_learn(species, mv) {
                // No learnset data: the entry is not judged on moves.
                None => {}
                Some(learns) if include && !learns => {
                    if verdict == Verdict::Keep {
                        verdict = Verdict::Missing;
                    }
                }
                Some(learns) if !include && learns => verdict = Verdict::Excluded,
                Some(_) => {}
            }
        }
        verdicts.insert(id, verdict);
    }

    // Later evolutions of a survivor inherit its moves through the
    // pre-evolution chain; restore those only marked missing.
    let survivors: Vec<&str> = verdicts
        .iter()
        .filter(|(_, v)| **v == Verdict::Keep)
        .map(|(id, _)| *id)
        .collect();
    for id in survivors {
        for evo in catalog.later_evolutions(id) {
            if let Some(v) = verdicts.get_mut(evo.id.as_str()) {
                if *v == Verdict::Missing {
                    *v = Verdict::Keep;
                }
            }
        }
    }

    pool.retain(|id, _| verdicts.get(id) == Some(&Verdict::Keep));
    Ok(())
}

/// Matches prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResults {
    pub shown: Vec<String>,
    /// Matches not shown.
    pub remaining: usize,
}

/// Sort or sample the matches.
///
/// With `show_all`, or at most `cap` matches, everything is shown in
/// lexicographic order. Otherwise a random sample of `cap` is shown.
pub fn present<R: Rng + ?Sized>(
    mut names: Vec<String>,
    show_all: bool,
    cap: usize,
    rng: &mut R,
) -> SearchResults {
    if show_all || names.len() <= cap {
        names.sort();
        return SearchResults {
            shown: names,
            remaining: 0,
        };
    }
    names.shuffle(rng);
    let remaining = names.len() - cap;
    names.truncate(cap);
    SearchResults {
        shown: names,
        remaining,
    }
}

/// One reply line for the results.
pub fn render(results: &SearchResults) -> String {
    if results.shown.is_empty() {
        return "No Pokémon found.".to_string();
    }
    let mut out = results.shown.join(", ");
    if results.remaining > 0 {
        out.push_str(&format!(
            ", and {} more. Redo the search with \"all\" as a search parameter to show all results.",
            results.remaining
        ));
    }
    out
}
