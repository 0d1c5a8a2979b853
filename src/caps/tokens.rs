//! Core capability token types.
//!
//! This module defines the unforgeable `Cap<T>` token and the `Capability` trait.

use super::Permission;
use std::fmt;
use std::marker::PhantomData;

/// An unforgeable capability token proving authorization.
///
/// `new()` is `pub(super)`, so only
/// [`CapabilityAuthority`](super::authority::CapabilityAuthority) can mint
/// tokens. The type is neither `Clone` nor `Copy`: a token is moved into the
/// action it authorizes.
///
/// ```ignore
/// let cap: Cap<MuteCap> = authority.request_mute_cap(uid, Some("lobby"), "spammer").await?;
/// room.mute(cap.scope().target.as_str(), until);
/// ```
pub struct Cap<T: Capability> {
    /// The resource this capability is scoped to.
    scope: T::Scope,
    _marker: PhantomData<T>,
}

impl<T: Capability> Cap<T> {
    /// Create a new capability token. Only the authority may call this.
    #[inline]
    pub(super) fn new(scope: T::Scope) -> Self {
        Self {
            scope,
            _marker: PhantomData,
        }
    }

    /// Get the scope of this capability.
    #[inline]
    pub fn scope(&self) -> &T::Scope {
        &self.scope
    }

    /// Consume the capability and return the scope.
    #[inline]
    pub fn into_scope(self) -> T::Scope {
        self.scope
    }
}

impl<T: Capability> fmt::Debug for Cap<T>
where
    T::Scope: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cap")
            .field("capability", &T::NAME)
            .field("scope", &self.scope)
            .finish()
    }
}

impl<T: Capability> fmt::Display for Cap<T>
where
    T::Scope: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cap<{}>({})", T::NAME, self.scope)
    }
}

/// Trait for capability types.
///
/// Each capability names the [`Permission`] it is checked against and the
/// scope its token carries:
/// - `String`: a room id
/// - [`TargetScope`]: a target user, optionally inside a room
/// - `()`: server-wide
pub trait Capability: 'static + Send + Sync {
    type Scope: Clone + Send + Sync;

    /// Human-readable name of this capability (for logging).
    const NAME: &'static str;

    /// Permission evaluated by the gate before minting.
    const PERMISSION: Permission;
}

/// Scope of a capability that acts on another user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetScope {
    pub room: Option<String>,
    pub target: String,
}

impl fmt::Display for TargetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.room {
            Some(room) => write!(f, "{}@{}", self.target, room),
            None => f.write_str(&self.target),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCap;
    impl Capability for TestCap {
        type Scope = String;
        const NAME: &'static str = "test:cap";
        const PERMISSION: Permission = Permission::Declare;
    }

    #[test]
    fn cap_into_scope_consumes() {
        let cap = Cap::<TestCap>::new("lobby".to_string());
        assert_eq!(cap.scope(), "lobby");
        assert_eq!(cap.into_scope(), "lobby");
    }

    #[test]
    fn cap_formats() {
        let cap = Cap::<TestCap>::new("lobby".to_string());
        assert!(format!("{:?}", cap).contains("test:cap"));
        assert_eq!(cap.to_string(), "Cap<test:cap>(lobby)");
    }

    #[test]
    fn target_scope_display() {
        let scope = TargetScope {
            room: Some("lobby".to_string()),
            target: "spammer".to_string(),
        };
        assert_eq!(scope.to_string(), "spammer@lobby");
    }
}
