//! The Hub - shared state for the command core.
//!
//! The Hub holds users, rooms, the game catalog and live settings in
//! concurrent collections accessible from any async task. Rooms and users are
//! keyed independently; no lock spans more than one room.

use super::{LiveSettings, Rank, Room, RoomId, User, UserId};
use crate::broadcast::BroadcastGate;
use crate::caps::{PermissionGate, Subject};
use crate::config::Config;
use dashmap::DashMap;
use dexchat_data::{Catalog, to_id};
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::{debug, warn};

/// Capacity of the hub event channel.
const EVENT_CAPACITY: usize = 256;

/// Events published for collaborators (persistence, relays).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HubEvent {
    /// A room field changed and should be saved.
    RoomSettingsChanged { room: RoomId, field: &'static str },
}

/// Settings handlers read through the hub.
#[derive(Debug, Clone)]
pub struct HubConfig {
    pub server_name: String,
    pub max_depth: usize,
    pub display_cap: usize,
    pub history_limit: usize,
}

impl From<&Config> for HubConfig {
    fn from(config: &Config) -> Self {
        Self {
            server_name: config.server.name.clone(),
            max_depth: config.dispatch.max_depth,
            display_cap: config.search.display_cap,
            history_limit: config.rooms.history_limit,
        }
    }
}

/// Central shared state container.
pub struct Hub {
    pub users: DashMap<UserId, Arc<RwLock<User>>>,
    pub rooms: DashMap<RoomId, Arc<RwLock<Room>>>,
    /// Read-only game data.
    pub catalog: Arc<Catalog>,
    pub settings: LiveSettings,
    pub permissions: PermissionGate,
    pub broadcast_gate: BroadcastGate,
    pub config: HubConfig,
    events: broadcast::Sender<HubEvent>,
}

impl Hub {
    /// Build a hub from configuration, creating the configured rooms.
    pub fn new(config: &Config, catalog: Catalog) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let hub = Self {
            users: DashMap::new(),
            rooms: DashMap::new(),
            catalog: Arc::new(catalog),
            settings: LiveSettings::new(),
            permissions: PermissionGate::new(
                config.rooms.rank_ceiling,
                config.broadcast.min_rank,
            ),
            broadcast_gate: BroadcastGate::new(config.broadcast.cooldown()),
            config: HubConfig::from(config),
            events,
        };

        for block in &config.rooms.rooms {
            let mut room = Room::new(&block.title, hub.config.history_limit);
            room.is_private = block.private;
            room.rules_link = block.rules.clone();
            for (name, rank) in &block.auth {
                room.auth.insert(to_id(name), *rank);
            }
            hub.add_room(room);
        }
        hub
    }

    pub fn add_user(&self, user: User) -> Arc<RwLock<User>> {
        let id = user.id.clone();
        let user = Arc::new(RwLock::new(user));
        if self.users.insert(id.clone(), user.clone()).is_some() {
            warn!(user = %id, "Replaced existing user");
        }
        user
    }

    pub fn add_room(&self, room: Room) -> Arc<RwLock<Room>> {
        let id = room.id.clone();
        self.rooms
            .entry(id)
            .or_insert_with(|| Arc::new(RwLock::new(room)))
            .clone()
    }

    /// Look up a user by normalized id.
    pub fn user(&self, id: &str) -> Option<Arc<RwLock<User>>> {
        self.users.get(id).map(|u| u.value().clone())
    }

    /// Look up a user by any spelling of their name.
    pub fn find_user(&self, name: &str) -> Option<Arc<RwLock<User>>> {
        let id = to_id(name);
        if id.is_empty() {
            return None;
        }
        self.user(&id)
    }

    pub fn room(&self, id: &str) -> Option<Arc<RwLock<Room>>> {
        self.rooms.get(id).map(|r| r.value().clone())
    }

    /// Add a user to a room's member list and the room to the user's.
    pub async fn join(&self, user_id: &str, room_id: &str) -> bool {
        let (Some(user), Some(room)) = (self.user(user_id), self.room(room_id)) else {
            return false;
        };
        room.write().await.members.insert(user_id.to_string());
        user.write().await.rooms.insert(room_id.to_string());
        debug!(user = %user_id, room = %room_id, "Joined room");
        true
    }

    /// Remove a user from the hub and every room they joined.
    ///
    /// Their broadcast cooldowns go with them.
    pub async fn remove_user(&self, user_id: &str) -> bool {
        let Some((_, user)) = self.users.remove(user_id) else {
            return false;
        };
        let rooms: Vec<_> = user.read().await.rooms.iter().cloned().collect();
        for room_id in rooms {
            if let Some(room) = self.room(&room_id) {
                room.write().await.members.remove(user_id);
            }
        }
        self.broadcast_gate.remove_user(user_id);
        debug!(user = %user_id, "User removed");
        true
    }

    /// Global rank of a user, `Unranked` if unknown.
    pub async fn global_rank(&self, user_id: &str) -> Rank {
        match self.user(user_id) {
            Some(user) => user.read().await.rank,
            None => Rank::Unranked,
        }
    }

    /// Rank of a user inside a room after room auth and privacy apply.
    pub async fn effective_rank(&self, user_id: &str, room_id: Option<&str>) -> Rank {
        let subject = Subject {
            id: user_id,
            rank: self.global_rank(user_id).await,
        };
        match room_id.and_then(|id| self.room(id)) {
            Some(room) => {
                let room = room.read().await;
                self.permissions.rank_in(subject, Some(&*room))
            }
            None => subject.rank,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<HubEvent> {
        self.events.subscribe()
    }

    /// Publish an event. Fire-and-forget: no receivers is not an error.
    pub fn emit(&self, event: HubEvent) {
        debug!(?event, "Hub event");
        let _ = self.events.send(event);
    }
}
