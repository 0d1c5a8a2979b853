//! Capability types for chat commands.

use super::Permission;
use super::tokens::{Capability, TargetScope};

/// Macro to declare capability marker types.
macro_rules! define_caps {
    ($(
        $(#[$meta:meta])*
        $name:ident: $scope:ty => $perm:ident, $label:literal;
    )*) => {
        $(
            $(#[$meta])*
            pub struct $name;

            impl Capability for $name {
                type Scope = $scope;
                const NAME: &'static str = $label;
                const PERMISSION: Permission = Permission::$perm;
            }
        )*
    };
}

define_caps! {
    /// Announce a command's output to the whole room.
    BroadcastCap: String => Broadcast, "room:broadcast";
    /// Change the room rules link.
    RulesCap: String => Rules, "room:rules";
    /// Post a declaration to the room.
    DeclareCap: String => Declare, "room:declare";
    /// Warn a lower-ranked user.
    WarnCap: TargetScope => Warn, "user:warn";
    /// Mute a lower-ranked user for a short time.
    MuteCap: TargetScope => Mute, "user:mute";
    /// Mute a lower-ranked user for an hour.
    HourMuteCap: TargetScope => HourMute, "user:hourmute";
    /// See a user's alternate names and addresses.
    AltsCap: TargetScope => Alts, "user:alts";
    /// Set the Pokémon of the Day.
    PotdCap: () => Potd, "server:potd";
}
