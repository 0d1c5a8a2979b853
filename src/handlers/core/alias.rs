//! Alias table.
//!
//! Aliases live in their own table and are resolved before the handler
//! lookup. An alias may point at another alias; chains are followed for a
//! bounded number of hops.

use crate::error::AliasError;
use std::collections::{HashMap, HashSet};

/// Most alias hops followed before resolution gives up.
pub const MAX_ALIAS_HOPS: usize = 4;

#[derive(Debug, Default)]
pub struct AliasTable {
    aliases: HashMap<&'static str, &'static str>,
}

impl AliasTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, alias: &'static str, target: &'static str) {
        self.aliases.insert(alias, target);
    }

    pub fn len(&self) -> usize {
        self.aliases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aliases.is_empty()
    }

    /// Aliases that resolve to `command`, sorted.
    pub fn aliases_of(&self, command: &str) -> Vec<&'static str> {
        let mut found: Vec<_> = self
            .aliases
            .keys()
            .copied()
            .filter(|alias| matches!(self.resolve(alias), Ok(target) if target == command))
            .collect();
        found.sort_unstable();
        found
    }

    /// Follow the chain starting at `name`. A name that is not an alias
    /// resolves to itself.
    pub fn resolve<'a>(&self, name: &'a str) -> Result<&'a str, AliasError> {
        let mut current: &'a str = name;
        let mut seen = HashSet::new();
        for _ in 0..=MAX_ALIAS_HOPS {
            let Some(&next) = self.aliases.get(current) else {
                return Ok(current);
            };
            if !seen.insert(current) {
                return Err(AliasError::Cycle(name.to_string()));
            }
            current = next;
        }
        if self.aliases.contains_key(current) {
            if seen.contains(current) {
                return Err(AliasError::Cycle(name.to_string()));
            }
            return Err(AliasError::TooDeep {
                alias: name.to_string(),
                max: MAX_ALIAS_HOPS,
            });
        }
        Ok(current)
    }

    /// Check every alias against the set of command names.
    pub fn validate(&self, is_command: impl Fn(&str) -> bool) -> Result<(), AliasError> {
        let mut names: Vec<_> = self.aliases.keys().copied().collect();
        names.sort_unstable();
        for alias in names {
            if is_command(alias) {
                return Err(AliasError::ShadowsCommand(alias.to_string()));
            }
            let target = self.resolve(alias)?;
            if !is_command(target) {
                return Err(AliasError::UnknownTarget {
                    alias: alias.to_string(),
                    target: target.to_string(),
                });
            }
        }
        Ok(())
    }
}
