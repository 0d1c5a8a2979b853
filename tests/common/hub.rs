//! Test hub management.
//!
//! Builds an in-process hub and registry and captures every outbound message
//! a command produces.

#![allow(dead_code)]

use dexchat::config::{Config, RoomBlock};
use dexchat::data::Catalog;
use dexchat::handlers::{Invocation, Outbound, Registry, ResponseMiddleware};
use dexchat::state::{Hub, Rank, User};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Room every test user joins.
pub const LOBBY: &str = "lobby";

/// Path of the catalog shipped with the daemon.
pub fn catalog_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/catalog.json")
}

/// The shipped catalog.
pub fn catalog() -> Catalog {
    Catalog::load(catalog_path()).expect("fixture catalog should load")
}

/// Config with a single lobby and no broadcast cooldown.
pub fn config() -> Config {
    let mut config = Config::default();
    config.broadcast.cooldown_ms = 0;
    config.rooms.rooms.push(RoomBlock {
        title: "Lobby".to_string(),
        private: false,
        rules: None,
        auth: HashMap::new(),
    });
    config
}

/// An in-process hub with a capturing outbound buffer.
pub struct TestHub {
    pub hub: Arc<Hub>,
    pub registry: Registry,
    pub connection: Uuid,
    outbound: Mutex<Vec<Outbound>>,
}

impl TestHub {
    pub fn new() -> Self {
        Self::with_config(config())
    }

    pub fn with_config(config: Config) -> Self {
        let registry = Registry::new(&config.dispatch).expect("registry should build");
        Self::with_registry(config, registry)
    }

    /// Use a custom registry (e.g. one with extra test handlers).
    pub fn with_registry(config: Config, registry: Registry) -> Self {
        Self {
            hub: Arc::new(Hub::new(&config, catalog())),
            registry,
            connection: Uuid::new_v4(),
            outbound: Mutex::new(Vec::new()),
        }
    }

    /// Add a user and join them to the lobby. Returns the user id.
    pub async fn user(&self, name: &str, rank: Rank) -> String {
        let user = User::new(name, rank);
        let id = user.id.clone();
        self.hub.add_user(user);
        assert!(self.hub.join(&id, LOBBY).await, "lobby should exist");
        id
    }

    /// Run a line as `user` in the lobby and return everything it sent.
    pub async fn run(&self, user: &str, line: &str) -> Vec<Outbound> {
        self.run_in(user, Some(LOBBY), line).await
    }

    /// Run a line as `user` in `room` (or outside any room).
    pub async fn run_in(&self, user: &str, room: Option<&str>, line: &str) -> Vec<Outbound> {
        let invocation = Invocation {
            hub: &self.hub,
            sender: ResponseMiddleware::Capturing(&self.outbound),
            user_id: user,
            room_id: room,
            connection: self.connection,
        };
        self.registry.dispatch(invocation, line).await;
        std::mem::take(&mut *self.outbound.lock().await)
    }
}

/// Texts of private replies.
pub fn privates(out: &[Outbound]) -> Vec<&str> {
    out.iter()
        .filter(|m| matches!(m, Outbound::Private { .. }))
        .map(Outbound::text)
        .collect()
}

/// Texts of lines posted to a room.
pub fn room_lines(out: &[Outbound]) -> Vec<&str> {
    out.iter()
        .filter(|m| matches!(m, Outbound::Room { .. }))
        .map(Outbound::text)
        .collect()
}

/// Popups as `(user, text)`.
pub fn popups(out: &[Outbound]) -> Vec<(&str, &str)> {
    out.iter()
        .filter_map(|m| match m {
            Outbound::Popup { user, text } => Some((user.as_str(), text.as_str())),
            _ => None,
        })
        .collect()
}

/// Moderation log entries.
pub fn mod_log(out: &[Outbound]) -> Vec<&str> {
    out.iter()
        .filter(|m| matches!(m, Outbound::ModLog { .. }))
        .map(Outbound::text)
        .collect()
}
