//! Global and room ranks.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// A user's rank. Ordered from least to most privileged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    #[default]
    Unranked,
    Voice,
    Driver,
    Moderator,
    Leader,
    Admin,
    Owner,
}

impl Rank {
    pub const ALL: [Rank; 7] = [
        Rank::Unranked,
        Rank::Voice,
        Rank::Driver,
        Rank::Moderator,
        Rank::Leader,
        Rank::Admin,
        Rank::Owner,
    ];

    /// Symbol shown before a user's name.
    pub fn symbol(self) -> char {
        match self {
            Rank::Unranked => ' ',
            Rank::Voice => '+',
            Rank::Driver => '%',
            Rank::Moderator => '@',
            Rank::Leader => '&',
            Rank::Admin => '~',
            Rank::Owner => '#',
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Rank::Unranked => "unranked",
            Rank::Voice => "voice",
            Rank::Driver => "driver",
            Rank::Moderator => "moderator",
            Rank::Leader => "leader",
            Rank::Admin => "admin",
            Rank::Owner => "owner",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown rank name or symbol.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown rank: {0}")]
pub struct UnknownRank(pub String);

impl FromStr for Rank {
    type Err = UnknownRank;

    /// Accepts either the rank name or its symbol.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Rank::ALL
            .into_iter()
            .find(|rank| {
                rank.as_str().eq_ignore_ascii_case(s)
                    || (s.chars().count() == 1 && s.starts_with(rank.symbol()) && *rank != Rank::Unranked)
            })
            .ok_or_else(|| UnknownRank(s.to_string()))
    }
}
