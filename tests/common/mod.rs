//! Integration test common infrastructure.
//!
//! Provides a hub loaded with the fixture catalog, a registry with every
//! command, and helpers for running command lines and asserting on the
//! outbound traffic they produce.

pub mod hub;

#[allow(unused_imports)]
pub use hub::TestHub;
