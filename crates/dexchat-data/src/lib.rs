//! # dexchat-data
//!
//! Read-only game data consumed by the dexchat command engine: species,
//! moves, abilities, learnsets and per-format banlists.
//!
//! Everything is keyed by a normalized id (see [`to_id`]), so callers can
//! pass user-typed names straight through.
//!
//! ```rust
//! use dexchat_data::{Catalog, Species};
//!
//! let mut catalog = Catalog::new();
//! catalog.insert_type("Fire");
//! catalog
//!     .insert_species(Species::new("Charmander", &["Fire"], "LC", "Red", 1))
//!     .unwrap();
//! assert!(catalog.species("CHARMANDER").is_some());
//! ```

#![deny(clippy::all)]

pub mod catalog;
pub mod error;
pub mod id;
pub mod moves;
pub mod species;

pub use catalog::Catalog;
pub use error::DataError;
pub use id::{id_eq, to_id};
pub use moves::{Ability, Move, UNSKETCHABLE};
pub use species::Species;
