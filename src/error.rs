//! Unified error handling for dexchat.
//!
//! This module provides the error hierarchy for command handling and
//! registry construction, with user-facing notice text and metric labels.

use crate::handlers::Outbound;
use thiserror::Error;
use tokio::sync::mpsc;

/// Notice shown for any fault caught at the dispatch boundary.
pub const INTERNAL_ERROR_NOTICE: &str =
    "An internal error occurred while running this command. It has been logged.";

// ============================================================================
// Handler Errors (command processing)
// ============================================================================

/// Errors that can occur during command handling.
#[derive(Debug, Error)]
#[allow(clippy::large_enum_variant)]
pub enum HandlerError {
    /// Bad user input. The message is shown as-is.
    #[error("{0}")]
    ParseFailure(String),

    /// Permission check failed (notice already sent).
    #[error("access denied")]
    AccessDenied,

    /// An explicitly named user does not exist.
    #[error("user not found: {0}")]
    TargetNotFound(String),

    /// Re-entrant dispatch went too deep (notice already sent).
    #[error("recursion limit exceeded")]
    RecursionLimitExceeded,

    #[error("send error: {0}")]
    Send(#[from] mpsc::error::SendError<Outbound>),

    #[error("internal error: {0}")]
    Internal(String),
}

impl HandlerError {
    /// Get a static error code string for metrics labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ParseFailure(_) => "parse_failure",
            Self::AccessDenied => "access_denied",
            Self::TargetNotFound(_) => "target_not_found",
            Self::RecursionLimitExceeded => "recursion_limit",
            Self::Send(_) => "send_error",
            Self::Internal(_) => "internal_error",
        }
    }

    /// Line to show the actor, or `None` when the notice was already sent
    /// (or cannot be delivered).
    pub fn to_notice(&self) -> Option<String> {
        match self {
            Self::ParseFailure(msg) => Some(msg.clone()),
            Self::TargetNotFound(name) => Some(format!("User {name} not found.")),
            Self::Internal(_) => Some(INTERNAL_ERROR_NOTICE.to_string()),
            Self::AccessDenied | Self::RecursionLimitExceeded | Self::Send(_) => None,
        }
    }

    /// Whether this error is a fault rather than a user mistake.
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Internal(_) | Self::Send(_))
    }
}

/// Result type for command handlers: optional text becomes one private reply.
pub type HandlerResult = Result<Option<String>, HandlerError>;

// ============================================================================
// Alias Errors (registry authoring)
// ============================================================================

/// Errors found while building the command registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AliasError {
    #[error("alias '{alias}' points at unknown command '{target}'")]
    UnknownTarget { alias: String, target: String },

    #[error("alias '{0}' is part of a cycle")]
    Cycle(String),

    #[error("alias '{alias}' needs more than {max} hops to resolve")]
    TooDeep { alias: String, max: usize },

    #[error("alias '{0}' shadows a command of the same name")]
    ShadowsCommand(String),
}
