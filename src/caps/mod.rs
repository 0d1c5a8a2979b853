//! Capability-based permissions.
//!
//! Handlers never compare ranks themselves. They ask the
//! [`CapabilityAuthority`] for a [`Cap<T>`] token, and the authority asks the
//! [`PermissionGate`] whether the actor's rank (with any room grant) is
//! enough, relative to the target when there is one.
//!
//! - [`Cap<T>`](tokens::Cap): unforgeable token, minted only by the authority
//! - [`Capability`](tokens::Capability): implemented by marker types such as `MuteCap`
//! - [`PermissionGate`]: the pure rank rules

mod authority;
mod kinds;
mod rules;
mod tokens;

pub use authority::CapabilityAuthority;
pub use kinds::{
    AltsCap, BroadcastCap, DeclareCap, HourMuteCap, MuteCap, PotdCap, RulesCap, WarnCap,
};
pub use rules::{Permission, PermissionGate, Subject};
pub use tokens::{Cap, Capability, TargetScope};
