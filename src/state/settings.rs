//! Process-wide live settings.
//!
//! Values here can change while the server runs. Each one is held in a
//! `tokio::sync::watch` channel so dependent subsystems see the update
//! without polling.

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tracing::info;

/// The current Pokémon of the Day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Potd {
    /// Species display name.
    pub species: String,
    /// Name of the user who set it.
    pub set_by: String,
    pub at: DateTime<Utc>,
}

/// Live settings store.
pub struct LiveSettings {
    potd: watch::Sender<Option<Potd>>,
}

impl LiveSettings {
    pub fn new() -> Self {
        let (potd, _) = watch::channel(None);
        Self { potd }
    }

    pub fn potd(&self) -> Option<Potd> {
        self.potd.borrow().clone()
    }

    /// Replace the Pokémon of the Day, notifying subscribers. Returns the
    /// previous value.
    pub fn set_potd(&self, potd: Option<Potd>) -> Option<Potd> {
        match &potd {
            Some(p) => info!(species = %p.species, set_by = %p.set_by, "Pokémon of the Day set"),
            None => info!("Pokémon of the Day cleared"),
        }
        self.potd.send_replace(potd)
    }

    /// Receiver notified on every change.
    pub fn subscribe_potd(&self) -> watch::Receiver<Option<Potd>> {
        self.potd.subscribe()
    }
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self::new()
    }
}
