//! Error types for catalog loading.

use thiserror::Error;

/// Errors raised while building a [`Catalog`](crate::Catalog).
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate {kind} id '{id}'")]
    Duplicate { kind: &'static str, id: String },

    #[error("species '{species}' refers to unknown {field} '{target}'")]
    DanglingReference {
        species: String,
        field: &'static str,
        target: String,
    },

    #[error("species '{species}' has {count} types (expected 1 or 2)")]
    BadTypeCount { species: String, count: usize },
}

/// Convenience alias used across the crate.
pub type Result<T, E = DataError> = std::result::Result<T, E>;
