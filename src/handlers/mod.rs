//! Chat command handlers.
//!
//! Each command is a [`Handler`] registered by name in the [`Registry`];
//! aliases are kept in a separate table and resolved first.

mod core;
pub mod info;
pub mod moderation;
pub mod potd;
pub mod room;
pub mod search;

pub use self::core::{
    ACCESS_DENIED, CommandLine, Context, Handler, HandlerResult, Invocation, Outbound,
    RECURSION_NOTICE, Registry, ResponseMiddleware,
};

use crate::error::HandlerError;

/// Longest accepted moderation reason, in characters.
pub const MAX_REASON_LENGTH: usize = 300;

/// The context's room, or a parse failure for commands that need one.
pub(crate) fn require_room<'a>(ctx: &Context<'a>) -> Result<&'a str, HandlerError> {
    ctx.room_id.ok_or_else(|| {
        HandlerError::ParseFailure("This command can only be used in a room.".to_string())
    })
}

/// Validate a moderation reason and format it as a suffix: `" (reason)"`
/// or empty.
pub(crate) fn reason_suffix(reason: &str) -> Result<String, HandlerError> {
    if reason.chars().count() > MAX_REASON_LENGTH {
        return Err(HandlerError::ParseFailure(format!(
            "The reason is too long. It cannot exceed {MAX_REASON_LENGTH} characters."
        )));
    }
    Ok(if reason.is_empty() {
        String::new()
    } else {
        format!(" ({reason})")
    })
}
