//! Core handler infrastructure.
//!
//! The handler trait, the per-invocation context, the registry with its
//! alias table and re-entrancy guard, and the response middleware.

pub mod alias;
pub mod context;
pub mod line;
pub mod middleware;
pub mod registry;

pub use context::{ACCESS_DENIED, Context, Handler, HandlerResult, Invocation};
pub use line::CommandLine;
pub use middleware::{Outbound, ResponseMiddleware};
pub use registry::{RECURSION_NOTICE, Registry};
