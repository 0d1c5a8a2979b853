//! State management module.
//!
//! Contains the Hub (shared state) and the users, rooms and settings it holds.

mod hub;
mod rank;
mod room;
mod settings;
mod user;

pub use hub::{Hub, HubConfig, HubEvent};
pub use rank::{Rank, UnknownRank};
pub use room::{HistoryEntry, Room, RoomId};
pub use settings::{LiveSettings, Potd};
pub use user::{User, UserId};
