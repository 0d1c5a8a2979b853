//! Response middleware for routing handler output.
//!
//! Direct forwards to the session's outbound channel; Capturing buffers the
//! traffic (tests, the console driver's transcript).

use std::fmt;
use std::time::Duration;
use tokio::sync::{Mutex, mpsc};
use uuid::Uuid;

/// Timeout for attempting to send to a slow consumer before giving up.
const SEND_TIMEOUT: Duration = Duration::from_secs(5);

/// One piece of outbound traffic produced by a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// Reply seen only by the invoking connection.
    Private {
        user: String,
        connection: Uuid,
        text: String,
    },
    /// Line shown to every occupant of a room.
    Room { room: String, text: String },
    /// Modal message for one user.
    Popup { user: String, text: String },
    /// Moderation log entry.
    ModLog { room: Option<String>, text: String },
}

impl Outbound {
    pub fn text(&self) -> &str {
        match self {
            Self::Private { text, .. }
            | Self::Room { text, .. }
            | Self::Popup { text, .. }
            | Self::ModLog { text, .. } => text,
        }
    }
}

impl fmt::Display for Outbound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Private { text, .. } => write!(f, "[private] {text}"),
            Self::Room { room, text } => write!(f, "[{room}] {text}"),
            Self::Popup { user, text } => write!(f, "[popup to {user}] {text}"),
            Self::ModLog { room: Some(room), text } => write!(f, "[modlog {room}] {text}"),
            Self::ModLog { room: None, text } => write!(f, "[modlog] {text}"),
        }
    }
}

/// Middleware for routing handler output.
#[derive(Clone, Copy)]
pub enum ResponseMiddleware<'a> {
    Direct(&'a mpsc::Sender<Outbound>),
    Capturing(&'a Mutex<Vec<Outbound>>),
}

impl<'a> ResponseMiddleware<'a> {
    /// Send or buffer a message depending on middleware mode.
    ///
    /// In Direct mode a consumer that does not drain its queue within
    /// [`SEND_TIMEOUT`] gets the message dropped and an error returned.
    pub async fn send(&self, msg: Outbound) -> Result<(), mpsc::error::SendError<Outbound>> {
        match self {
            Self::Direct(tx) => match tx.send_timeout(msg, SEND_TIMEOUT).await {
                Ok(()) => Ok(()),
                Err(mpsc::error::SendTimeoutError::Closed(msg)) => Err(mpsc::error::SendError(msg)),
                Err(mpsc::error::SendTimeoutError::Timeout(msg)) => {
                    tracing::warn!(
                        "Outbound queue full: consumer not reading (timeout after {:?})",
                        SEND_TIMEOUT
                    );
                    Err(mpsc::error::SendError(msg))
                }
            },
            Self::Capturing(buf) => {
                buf.lock().await.push(msg);
                Ok(())
            }
        }
    }
}
