//! dexchat - command core for a multi-room chat server.
//!
//! Users type slash commands into rooms. A line is split into sigil, name
//! and target, the name is resolved through the alias table, the handler
//! runs with a fresh [`handlers::Context`], and its output is routed through
//! the response middleware as [`handlers::Outbound`] values.
//!
//! ```no_run
//! use dexchat::config::Config;
//! use dexchat::data::Catalog;
//! use dexchat::handlers::{Invocation, Registry, ResponseMiddleware};
//! use dexchat::state::{Hub, Rank, Room, User};
//! use std::sync::Arc;
//! use tokio::sync::Mutex;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::default();
//! let hub = Arc::new(Hub::new(&config, Catalog::load("data/catalog.json")?));
//! let registry = Registry::new(&config.dispatch)?;
//! hub.add_room(Room::new("Lobby", 100));
//! hub.add_user(User::new("Ash", Rank::Voice));
//! hub.join("ash", "lobby").await;
//!
//! let out = Mutex::new(Vec::new());
//! let invocation = Invocation {
//!     hub: &hub,
//!     sender: ResponseMiddleware::Capturing(&out),
//!     user_id: "ash",
//!     room_id: Some("lobby"),
//!     connection: uuid::Uuid::new_v4(),
//! };
//! registry.dispatch(invocation, "!ds fire type, water type").await;
//! # Ok(())
//! # }
//! ```

pub mod broadcast;
pub mod caps;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod search;
pub mod state;
pub mod telemetry;

pub use dexchat_data as data;
