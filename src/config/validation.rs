//! Configuration validation.
//!
//! Validates configuration at startup to catch common errors early.

use super::Config;
use crate::state::Rank;
use std::path::Path;
use thiserror::Error;

/// Validation errors for configuration.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("server.name is required")]
    MissingServerName,
    #[error("dispatch.max_depth must be at least 1")]
    ZeroDepth,
    #[error("search.display_cap must be at least 1")]
    ZeroDisplayCap,
    #[error("rooms.rank_ceiling cannot be '{0}'; room grants stop below global owner")]
    CeilingTooHigh(Rank),
    #[error("room '{room}' grants '{user}' rank '{rank}' above rooms.rank_ceiling")]
    GrantAboveCeiling { room: String, user: String, rank: Rank },
    #[error("duplicate room '{0}'")]
    DuplicateRoom(String),
    #[error("data.catalog does not exist: {0}")]
    CatalogNotFound(String),
}

/// Validate a configuration, returning all errors found.
pub fn validate(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.name.trim().is_empty() {
        errors.push(ValidationError::MissingServerName);
    }
    if config.dispatch.max_depth == 0 {
        errors.push(ValidationError::ZeroDepth);
    }
    if config.search.display_cap == 0 {
        errors.push(ValidationError::ZeroDisplayCap);
    }

    let ceiling = config.rooms.rank_ceiling;
    if ceiling == Rank::Owner {
        errors.push(ValidationError::CeilingTooHigh(ceiling));
    }

    let mut seen = std::collections::HashSet::new();
    for room in &config.rooms.rooms {
        let id = dexchat_data::to_id(&room.title);
        if !seen.insert(id) {
            errors.push(ValidationError::DuplicateRoom(room.title.clone()));
        }
        for (user, rank) in &room.auth {
            if *rank > ceiling {
                errors.push(ValidationError::GrantAboveCeiling {
                    room: room.title.clone(),
                    user: user.clone(),
                    rank: *rank,
                });
            }
        }
    }

    if let Some(ref path) = config.data.catalog {
        if !Path::new(path).exists() {
            errors.push(ValidationError::CatalogNotFound(path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
