//! Move and ability records.

use crate::id::to_id;
use serde::{Deserialize, Serialize};

/// Moves no Sketch user can ever acquire.
pub const UNSKETCHABLE: [&str; 3] = ["chatter", "struggle", "magikarpsrevenge"];

/// Learnset marker that lets a species copy any sketchable move.
pub const SKETCH: &str = "sketch";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Move {
    pub name: String,
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub move_type: String,
}

impl Move {
    pub fn new(name: &str, move_type: &str) -> Self {
        Self {
            name: name.to_string(),
            id: to_id(name),
            move_type: move_type.to_string(),
        }
    }

    pub fn is_sketchable(&self) -> bool {
        !UNSKETCHABLE.contains(&self.id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub name: String,
    #[serde(default)]
    pub id: String,
}

impl Ability {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            id: to_id(name),
        }
    }
}
