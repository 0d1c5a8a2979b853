//! Broadcast state and cooldowns.
//!
//! A command typed with `!` asks to show its output to the whole room. The
//! request is granted when the actor holds the broadcast capability and the
//! per-room, per-user cooldown has elapsed. The cooldown is a governor
//! token bucket with a burst of one, keyed by room and user.

use dashmap::DashMap;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::fmt;
use std::time::{Duration, Instant};
use tracing::debug;

/// Leading character of a command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sigil {
    /// `/`: reply privately.
    Private,
    /// `!`: show the reply to the room.
    Broadcast,
}

impl Sigil {
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '/' => Some(Sigil::Private),
            '!' => Some(Sigil::Broadcast),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Sigil::Private => '/',
            Sigil::Broadcast => '!',
        }
    }
}

impl fmt::Display for Sigil {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Where an invocation's replies go.
///
/// Starts `Private`. `Broadcasting` is terminal for the invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BroadcastState {
    #[default]
    Private,
    Broadcasting,
}

impl BroadcastState {
    pub fn is_broadcasting(self) -> bool {
        self == BroadcastState::Broadcasting
    }

    /// Move to `Broadcasting`. There is no way back.
    pub fn promote(&mut self) {
        *self = BroadcastState::Broadcasting;
    }
}

/// Per-room, per-user broadcast cooldown.
#[derive(Debug)]
pub struct BroadcastGate {
    limiters: DashMap<(String, String), Slot>,
    quota: Option<Quota>,
    cooldown: Duration,
}

#[derive(Debug)]
struct Slot {
    limiter: DefaultDirectRateLimiter,
    last_acquired: Instant,
}

impl BroadcastGate {
    /// `None` (or a zero duration) disables the cooldown.
    pub fn new(cooldown: Option<Duration>) -> Self {
        Self {
            limiters: DashMap::new(),
            quota: cooldown.and_then(Quota::with_period),
            cooldown: cooldown.unwrap_or_default(),
        }
    }

    /// Take the broadcast slot for `user` in `room`.
    ///
    /// Returns `false` while the previous broadcast's cooldown is running.
    pub fn try_acquire(&self, room: &str, user: &str) -> bool {
        let Some(quota) = self.quota else {
            return true;
        };
        let mut slot = self
            .limiters
            .entry((room.to_string(), user.to_string()))
            .or_insert_with(|| Slot {
                limiter: RateLimiter::direct(quota),
                last_acquired: Instant::now(),
            });

        let allowed = slot.limiter.check().is_ok();
        if allowed {
            slot.last_acquired = Instant::now();
        } else {
            debug!(room = %room, user = %user, "broadcast cooldown active");
        }
        allowed
    }

    /// Forget every cooldown a user holds.
    pub fn remove_user(&self, user: &str) {
        self.limiters.retain(|(_, u), _| u != user);
    }

    /// Drop limiters whose cooldown has elapsed.
    ///
    /// A dropped pair starts with a full bucket on its next broadcast, which
    /// is the state its limiter had already returned to.
    pub fn cleanup(&self) -> usize {
        let before = self.limiters.len();
        self.limiters
            .retain(|_, slot| slot.last_acquired.elapsed() < self.cooldown);
        let removed = before.saturating_sub(self.limiters.len());
        if removed > 0 {
            debug!(removed, "expired broadcast cooldowns dropped");
        }
        removed
    }

    /// Number of tracked (room, user) pairs.
    pub fn tracked(&self) -> usize {
        self.limiters.len()
    }
}
