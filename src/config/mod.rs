//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Core config struct definitions (Config, ServerConfig, DataConfig, LogConfig)
//! - [`limits`]: Dispatch and search limits (DispatchConfig, SearchConfig)
//! - [`rooms`]: Room and broadcast configuration (RoomsConfig, BroadcastConfig, RoomBlock)
//! - [`validation`]: Startup validation of a loaded config

mod defaults;
mod limits;
mod rooms;
mod types;
mod validation;

pub use limits::{DispatchConfig, SearchConfig};
pub use rooms::{BroadcastConfig, RoomBlock, RoomsConfig};
pub use types::{Config, ConfigError, ConsoleConfig, DataConfig, LogConfig, LogFormat, ServerConfig};
pub use validation::{ValidationError, validate};
