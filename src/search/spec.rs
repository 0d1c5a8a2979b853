//! Search specification.

use super::FilterError;
use std::collections::BTreeMap;
use std::fmt;

/// A search category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Type,
    Tier,
    Gen,
    Color,
    Ability,
    Move,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Type => "type",
            Category::Tier => "tier",
            Category::Gen => "gen",
            Category::Color => "color",
            Category::Ability => "ability",
            Category::Move => "move",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order the filter passes run in.
pub const PASS_ORDER: [Category; 6] = [
    Category::Type,
    Category::Tier,
    Category::Gen,
    Category::Color,
    Category::Ability,
    Category::Move,
];

/// Values of one category: value -> include (`true`) or exclude (`false`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Criteria(BTreeMap<String, bool>);

impl Criteria {
    /// Record a value. Repeating a value with the same polarity is a no-op;
    /// the opposite polarity is a contradiction.
    pub fn insert(
        &mut self,
        category: Category,
        value: impl Into<String>,
        include: bool,
    ) -> Result<(), FilterError> {
        let value = value.into();
        match self.0.get(&value) {
            Some(&existing) if existing != include => {
                Err(FilterError::Contradiction(category.as_str()))
            }
            _ => {
                self.0.insert(value, include);
                Ok(())
            }
        }
    }

    pub fn get(&self, value: &str) -> Option<bool> {
        self.0.get(value).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn required(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, inc)| *inc).map(|(k, _)| k)
    }

    pub fn excluded(&self) -> impl Iterator<Item = &str> {
        self.iter().filter(|(_, inc)| !*inc).map(|(k, _)| k)
    }

    pub fn required_count(&self) -> usize {
        self.required().count()
    }
}

/// A parsed query. Immutable once filtering starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSpec {
    /// Type-chart spellings ("Fire").
    pub types: Criteria,
    /// Lowercase tier names.
    pub tiers: Criteria,
    /// Generation digits.
    pub gens: Criteria,
    /// Lowercase colors.
    pub colors: Criteria,
    /// Ability ids.
    pub abilities: Criteria,
    /// Move ids.
    pub moves: Criteria,
    /// Show every result instead of a sample.
    pub show_all: bool,
    /// `Some(true)`: megas only. `Some(false)`: no megas.
    pub mega: Option<bool>,
}

impl SearchSpec {
    pub fn criteria(&self, category: Category) -> &Criteria {
        match category {
            Category::Type => &self.types,
            Category::Tier => &self.tiers,
            Category::Gen => &self.gens,
            Category::Color => &self.colors,
            Category::Ability => &self.abilities,
            Category::Move => &self.moves,
        }
    }

    pub fn criteria_mut(&mut self, category: Category) -> &mut Criteria {
        match category {
            Category::Type => &mut self.types,
            Category::Tier => &mut self.tiers,
            Category::Gen => &mut self.gens,
            Category::Color => &mut self.colors,
            Category::Ability => &mut self.abilities,
            Category::Move => &mut self.moves,
        }
    }

    /// No category has a value and no mega filter is set.
    pub fn has_no_terms(&self) -> bool {
        PASS_ORDER.iter().all(|c| self.criteria(*c).is_empty()) && self.mega.is_none()
    }
}
