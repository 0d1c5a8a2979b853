//! Species records.

use crate::id::to_id;
use serde::{Deserialize, Serialize};

/// Tiers that never appear in search results.
pub const HIDDEN_TIERS: [&str; 2] = ["Unreleased", "Illegal"];

/// A single species (or alternate forme) entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Species {
    /// Display name, e.g. `"Charizard-Mega-X"`.
    pub name: String,
    /// Lookup id. Derived from `name` when absent in the source data.
    #[serde(default)]
    pub id: String,
    /// One or two type names as they appear in the type chart.
    pub types: Vec<String>,
    /// Usage tier label (`"OU"`, `"LC"`, `"Unreleased"`, ...).
    pub tier: String,
    /// Ability display names.
    #[serde(default)]
    pub abilities: Vec<String>,
    pub color: String,
    /// Generation the species was introduced in.
    #[serde(rename = "gen")]
    pub generation: u8,
    /// Id of the pre-evolution.
    #[serde(default)]
    pub prevo: Option<String>,
    /// Ids of direct evolutions.
    #[serde(default)]
    pub evos: Vec<String>,
    /// Display name of the base species for alternate formes.
    #[serde(default)]
    pub base_species: Option<String>,
    #[serde(default)]
    pub is_mega: bool,
}

impl Species {
    /// Start a record with the required fields; optional links default empty.
    pub fn new(name: &str, types: &[&str], tier: &str, color: &str, generation: u8) -> Self {
        Self {
            name: name.to_string(),
            id: to_id(name),
            types: types.iter().map(|t| t.to_string()).collect(),
            tier: tier.to_string(),
            abilities: Vec::new(),
            color: color.to_string(),
            generation,
            prevo: None,
            evos: Vec::new(),
            base_species: None,
            is_mega: false,
        }
    }

    pub fn with_abilities(mut self, abilities: &[&str]) -> Self {
        self.abilities = abilities.iter().map(|a| a.to_string()).collect();
        self
    }

    pub fn with_prevo(mut self, prevo: &str) -> Self {
        self.prevo = Some(to_id(prevo));
        self
    }

    pub fn with_evos(mut self, evos: &[&str]) -> Self {
        self.evos = evos.iter().map(|e| to_id(e)).collect();
        self
    }

    /// Mark this entry as an alternate forme of `base`.
    pub fn forme_of(mut self, base: &str) -> Self {
        self.base_species = Some(base.to_string());
        self
    }

    pub fn mega_of(self, base: &str) -> Self {
        let mut s = self.forme_of(base);
        s.is_mega = true;
        s
    }

    /// Display name of the base species (itself for base formes).
    pub fn base_species(&self) -> &str {
        self.base_species.as_deref().unwrap_or(&self.name)
    }

    pub fn is_base_forme(&self) -> bool {
        self.base_species.is_none()
    }

    /// Type check by type-chart name, case-insensitive.
    pub fn has_type(&self, type_name: &str) -> bool {
        self.types.iter().any(|t| t.eq_ignore_ascii_case(type_name))
    }

    pub fn has_ability(&self, ability: &str) -> bool {
        self.abilities.iter().any(|a| crate::id::id_eq(a, ability))
    }

    /// Whether the entry is hidden from every search regardless of filters.
    pub fn is_hidden(&self) -> bool {
        HIDDEN_TIERS.contains(&self.tier.as_str())
    }

    pub fn is_cap(&self) -> bool {
        self.tier == "CAP"
    }
}
