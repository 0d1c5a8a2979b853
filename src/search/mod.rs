//! Multi-criteria species search.
//!
//! A query is a comma-separated list of terms, each optionally negated with
//! a leading `!`. [`parse`] classifies the terms into a [`SearchSpec`];
//! [`filter`] runs the spec against the catalog pass by pass in
//! [`PASS_ORDER`]; [`present`] sorts or samples the matches for display.

mod filter;
mod parse;
mod spec;

pub use filter::{SearchResults, filter, is_little_cup, present, render};
pub use parse::{COLORS, TIERS, parse};
pub use spec::{Category, Criteria, PASS_ORDER, SearchSpec};

use crate::error::HandlerError;
use thiserror::Error;

/// Search parsing and evaluation errors. Every message is user-facing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    #[error("'{0}' could not be found in any of the search categories.")]
    UnknownTerm(String),

    #[error("Specify only one ability.")]
    TooManyAbilities,

    #[error("Specify a maximum of two types.")]
    TooManyTypes,

    #[error("Specify a maximum of 4 moves.")]
    TooManyMoves,

    #[error("A search cannot both exclude and include a {0}.")]
    Contradiction(&'static str),

    #[error(
        "No search parameters other than \"all\" were found. Try \"/help dexsearch\" for more information on this command."
    )]
    NothingToSearch,

    #[error("'{0}' is not a known move.")]
    UnknownMove(String),

    #[error("A search with the parameter 'all' cannot be broadcast.")]
    BroadcastAll,
}

impl From<FilterError> for HandlerError {
    fn from(e: FilterError) -> Self {
        HandlerError::ParseFailure(e.to_string())
    }
}
