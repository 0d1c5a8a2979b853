//! The catalog: species, moves, abilities, learnsets and format banlists.
//!
//! A [`Catalog`] is built once (from JSON or programmatically) and then only
//! read. Species are kept in a `BTreeMap` so iteration order is stable, which
//! keeps search results reproducible for a fixed shuffle seed.

use crate::error::{DataError, Result};
use crate::id::to_id;
use crate::moves::{Ability, Move, SKETCH};
use crate::species::Species;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// On-disk layout of a catalog file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogFile {
    types: Vec<String>,
    abilities: Vec<String>,
    moves: Vec<Move>,
    species: Vec<Species>,
    /// Species name -> move names.
    learnsets: HashMap<String, Vec<String>>,
    formats: HashMap<String, FormatFile>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormatFile {
    banlist: Vec<String>,
}

/// Read-only game data.
#[derive(Debug, Default, Clone)]
pub struct Catalog {
    species: BTreeMap<String, Species>,
    moves: HashMap<String, Move>,
    abilities: HashMap<String, Ability>,
    types: Vec<String>,
    learnsets: HashMap<String, HashSet<String>>,
    /// Format id -> banned species ids.
    banlists: HashMap<String, HashSet<String>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON catalog.
    pub fn from_json(json: &str) -> Result<Self> {
        let file: CatalogFile = serde_json::from_str(json)?;
        let mut catalog = Self::new();

        for t in file.types {
            catalog.insert_type(&t);
        }
        for a in file.abilities {
            catalog.insert_ability(Ability::new(&a))?;
        }
        for mut m in file.moves {
            m.id = to_id(&m.name);
            catalog.insert_move(m)?;
        }
        for mut s in file.species {
            s.id = to_id(&s.name);
            s.prevo = s.prevo.as_deref().map(to_id);
            s.evos = s.evos.iter().map(|e| to_id(e)).collect();
            catalog.insert_species(s)?;
        }
        for (species, moves) in file.learnsets {
            let ids: Vec<String> = moves.iter().map(|m| to_id(m)).collect();
            catalog.set_learnset(&species, ids.iter().map(String::as_str));
        }
        for (format, f) in file.formats {
            catalog.set_banlist(&format, f.banlist.iter().map(String::as_str));
        }

        catalog.validate()?;
        debug!(
            species = catalog.species.len(),
            moves = catalog.moves.len(),
            abilities = catalog.abilities.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Check cross references between species.
    pub fn validate(&self) -> Result<()> {
        for s in self.species.values() {
            if s.types.is_empty() || s.types.len() > 2 {
                return Err(DataError::BadTypeCount {
                    species: s.name.clone(),
                    count: s.types.len(),
                });
            }
            if let Some(prevo) = &s.prevo {
                if !self.species.contains_key(prevo) {
                    return Err(DataError::DanglingReference {
                        species: s.name.clone(),
                        field: "prevo",
                        target: prevo.clone(),
                    });
                }
            }
            for evo in &s.evos {
                if !self.species.contains_key(evo) {
                    return Err(DataError::DanglingReference {
                        species: s.name.clone(),
                        field: "evo",
                        target: evo.clone(),
                    });
                }
            }
            if let Some(base) = &s.base_species {
                if !self.species.contains_key(&to_id(base)) {
                    return Err(DataError::DanglingReference {
                        species: s.name.clone(),
                        field: "baseSpecies",
                        target: base.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    pub fn insert_species(&mut self, species: Species) -> Result<()> {
        if self.species.contains_key(&species.id) {
            return Err(DataError::Duplicate {
                kind: "species",
                id: species.id,
            });
        }
        self.species.insert(species.id.clone(), species);
        Ok(())
    }

    pub fn insert_move(&mut self, mv: Move) -> Result<()> {
        if self.moves.contains_key(&mv.id) {
            return Err(DataError::Duplicate {
                kind: "move",
                id: mv.id,
            });
        }
        self.moves.insert(mv.id.clone(), mv);
        Ok(())
    }

    pub fn insert_ability(&mut self, ability: Ability) -> Result<()> {
        if self.abilities.contains_key(&ability.id) {
            return Err(DataError::Duplicate {
                kind: "ability",
                id: ability.id,
            });
        }
        self.abilities.insert(ability.id.clone(), ability);
        Ok(())
    }

    pub fn insert_type(&mut self, name: &str) {
        if !self.types.iter().any(|t| t.eq_ignore_ascii_case(name)) {
            self.types.push(name.to_string());
        }
    }

    /// Replace the learnset of `species` (any name form) with `moves` (ids).
    pub fn set_learnset<'a>(&mut self, species: &str, moves: impl IntoIterator<Item = &'a str>) {
        self.learnsets
            .insert(to_id(species), moves.into_iter().map(to_id).collect());
    }

    pub fn set_banlist<'a>(&mut self, format: &str, species: impl IntoIterator<Item = &'a str>) {
        self.banlists
            .insert(to_id(format), species.into_iter().map(to_id).collect());
    }

    // ------------------------------------------------------------------
    // Lookups
    // ------------------------------------------------------------------

    /// Look up a species by any name form.
    pub fn species(&self, name: &str) -> Option<&Species> {
        self.species.get(&to_id(name))
    }

    /// Every species in id order.
    pub fn all_species(&self) -> impl Iterator<Item = &Species> {
        self.species.values()
    }

    pub fn species_count(&self) -> usize {
        self.species.len()
    }

    pub fn get_move(&self, name: &str) -> Option<&Move> {
        self.moves.get(&to_id(name))
    }

    pub fn ability(&self, name: &str) -> Option<&Ability> {
        self.abilities.get(&to_id(name))
    }

    /// Resolve a type by case-insensitive name to its type-chart spelling.
    pub fn type_name(&self, name: &str) -> Option<&str> {
        self.types
            .iter()
            .find(|t| t.eq_ignore_ascii_case(name.trim()))
            .map(String::as_str)
    }

    pub fn learnset(&self, species_id: &str) -> Option<&HashSet<String>> {
        self.learnsets.get(species_id)
    }

    /// Whether `species_id` is banned in `format`.
    pub fn is_banned(&self, format: &str, species_id: &str) -> bool {
        self.banlists
            .get(&to_id(format))
            .is_some_and(|b| b.contains(species_id))
    }

    /// Whether a species can acquire `move_id`.
    ///
    /// Uses the species' own learnset, or its base forme's when it has none,
    /// then walks up the pre-evolution chain while the move is missing. A
    /// Sketch learner reaches every sketchable move. Returns `None` when no
    /// learnset data exists for the species at all.
    pub fn can_learn(&self, species: &Species, mv: &Move) -> Option<bool> {
        let mut current = if self.learnsets.contains_key(&species.id) {
            species
        } else {
            self.species(species.base_species())
                .filter(|base| self.learnsets.contains_key(&base.id))?
        };

        let mut seen = HashSet::new();
        loop {
            if !seen.insert(current.id.as_str()) {
                return Some(false);
            }
            if let Some(learnset) = self.learnsets.get(&current.id) {
                if learnset.contains(&mv.id) {
                    return Some(true);
                }
                if learnset.contains(SKETCH) && mv.is_sketchable() {
                    return Some(true);
                }
            }
            match current.prevo.as_deref().and_then(|p| self.species.get(p)) {
                Some(prevo) => current = prevo,
                None => return Some(false),
            }
        }
    }

    /// Every later evolution of `species_id`, breadth first.
    pub fn later_evolutions(&self, species_id: &str) -> Vec<&Species> {
        let mut out: Vec<&Species> = Vec::new();
        let mut queue: Vec<&str> = vec![species_id];
        let mut seen: HashSet<&str> = HashSet::from([species_id]);
        while let Some(id) = queue.pop() {
            let Some(s) = self.species.get(id) else {
                continue;
            };
            for evo in &s.evos {
                if seen.insert(evo.as_str()) {
                    if let Some(e) = self.species.get(evo) {
                        out.push(e);
                        queue.push(evo.as_str());
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn smeargle_line() -> Catalog {
        let mut c = Catalog::new();
        c.insert_species(Species::new("Smeargle", &["Normal"], "PU", "White", 2))
            .unwrap();
        c.insert_move(Move::new("Spore", "Grass")).unwrap();
        c.insert_move(Move::new("Chatter", "Flying")).unwrap();
        c.set_learnset("Smeargle", ["sketch"]);
        c
    }

    #[test]
    fn sketch_learns_everything_but_unsketchables() {
        let c = smeargle_line();
        let smeargle = c.species("smeargle").unwrap();
        let spore = c.get_move("Spore").unwrap();
        let chatter = c.get_move("chatter").unwrap();
        assert_eq!(c.can_learn(smeargle, spore), Some(true));
        assert_eq!(c.can_learn(smeargle, chatter), Some(false));
    }

    #[test]
    fn learnset_walks_prevo_chain() {
        let mut c = Catalog::new();
        c.insert_species(Species::new("Pichu", &["Electric"], "LC", "Yellow", 2).with_evos(&["Pikachu"]))
            .unwrap();
        c.insert_species(
            Species::new("Pikachu", &["Electric"], "NU", "Yellow", 1).with_prevo("Pichu"),
        )
        .unwrap();
        c.insert_move(Move::new("Volt Tackle", "Electric")).unwrap();
        c.set_learnset("Pichu", ["volttackle"]);
        c.set_learnset("Pikachu", ["thunderbolt"]);

        let pikachu = c.species("Pikachu").unwrap();
        let vt = c.get_move("Volt Tackle").unwrap();
        assert_eq!(c.can_learn(pikachu, vt), Some(true));
    }

    #[test]
    fn forme_without_learnset_uses_base() {
        let mut c = Catalog::new();
        c.insert_species(Species::new("Rotom", &["Electric", "Ghost"], "NU", "Red", 4))
            .unwrap();
        c.insert_species(
            Species::new("Rotom-Wash", &["Electric", "Water"], "OU", "Red", 4).forme_of("Rotom"),
        )
        .unwrap();
        c.insert_move(Move::new("Hydro Pump", "Water")).unwrap();
        c.set_learnset("Rotom", ["hydropump"]);

        let wash = c.species("rotomwash").unwrap();
        let hp = c.get_move("hydropump").unwrap();
        assert_eq!(c.can_learn(wash, hp), Some(true));
    }

    #[test]
    fn no_learnset_data_is_none() {
        let mut c = Catalog::new();
        c.insert_species(Species::new("Missingno", &["Normal"], "Illegal", "Black", 1))
            .unwrap();
        c.insert_move(Move::new("Tackle", "Normal")).unwrap();
        let s = c.species("missingno").unwrap();
        assert_eq!(c.can_learn(s, c.get_move("tackle").unwrap()), None);
    }

    #[test]
    fn later_evolutions_are_transitive() {
        let mut c = Catalog::new();
        c.insert_species(Species::new("Charmander", &["Fire"], "LC", "Red", 1).with_evos(&["Charmeleon"]))
            .unwrap();
        c.insert_species(
            Species::new("Charmeleon", &["Fire"], "NFE", "Red", 1)
                .with_prevo("Charmander")
                .with_evos(&["Charizard"]),
        )
        .unwrap();
        c.insert_species(
            Species::new("Charizard", &["Fire", "Flying"], "OU", "Red", 1).with_prevo("Charmeleon"),
        )
        .unwrap();
        let names: Vec<&str> = c
            .later_evolutions("charmander")
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Charmeleon", "Charizard"]);
    }

    #[test]
    fn duplicate_species_rejected() {
        let mut c = Catalog::new();
        c.insert_species(Species::new("Mew", &["Psychic"], "UU", "Pink", 1))
            .unwrap();
        let err = c
            .insert_species(Species::new("MEW", &["Psychic"], "UU", "Pink", 1))
            .unwrap_err();
        assert!(matches!(err, DataError::Duplicate { kind: "species", .. }));
    }

    #[test]
    fn type_lookup_is_case_insensitive() {
        let mut c = Catalog::new();
        c.insert_type("Fire");
        c.insert_type("fire");
        assert_eq!(c.type_name("FIRE"), Some("Fire"));
        assert_eq!(c.type_name("bird"), None);
    }
}
