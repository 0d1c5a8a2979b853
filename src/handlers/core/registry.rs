//! Command handler registry and dispatch.
//!
//! The `Registry` owns the canonical handler table, the alias table and the
//! per-actor, per-room re-entrancy counters. [`Registry::dispatch`] is the
//! boundary where every handler outcome (including a panic) is turned into
//! at most one notice.

use super::alias::AliasTable;
use super::context::{Context, Handler, Invocation};
use super::line::CommandLine;
use crate::config::DispatchConfig;
use crate::error::{AliasError, HandlerError};
use crate::handlers::{
    info::{HelpHandler, WhoamiHandler},
    moderation::{AltsHandler, MuteHandler, UnmuteHandler, WarnHandler},
    potd::PotdHandler,
    room::{DeclareHandler, RulesHandler},
    search::DexsearchHandler,
};
use crate::telemetry::{CommandTimer, spans};
use dashmap::DashMap;
use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use tracing::{Instrument, debug, error, warn};

/// Notice sent when re-entrant dispatch nests too deep.
pub const RECURSION_NOTICE: &str =
    "Recursion limit exceeded: this command dispatched too many nested commands.";

/// Re-entrancy counter key: actor and room.
type ReentryKey = (String, Option<String>);

/// Registry of command handlers.
pub struct Registry {
    handlers: HashMap<&'static str, Box<dyn Handler>>,
    aliases: AliasTable,
    reentry: DashMap<ReentryKey, usize>,
    max_depth: usize,
}

impl Registry {
    /// Create a registry with every chat command registered.
    ///
    /// Alias authoring errors (dangling targets, cycles, over-long chains)
    /// are reported here, at startup.
    pub fn new(config: &DispatchConfig) -> Result<Self, AliasError> {
        let mut registry = Self::empty(config.max_depth);

        // Information
        registry.register("help", HelpHandler);
        registry.register("whoami", WhoamiHandler);

        // Search
        registry.register("dexsearch", DexsearchHandler);

        // Room
        registry.register("rules", RulesHandler);
        registry.register("declare", DeclareHandler);
        registry.register("potd", PotdHandler);

        // Moderation
        registry.register("warn", WarnHandler);
        registry.register("mute", MuteHandler::mute());
        registry.register("hourmute", MuteHandler::hourmute());
        registry.register("unmute", UnmuteHandler);
        registry.register("alts", AltsHandler);

        registry.alias("h", "help");
        registry.alias("?", "help");
        registry.alias("ds", "dexsearch");
        registry.alias("dsearch", "dexsearch");
        registry.alias("m", "mute");
        registry.alias("hm", "hourmute");
        registry.alias("um", "unmute");
        registry.alias("ip", "alts");
        registry.alias("getip", "ip");

        registry.validate()?;
        debug!(
            commands = registry.handlers.len(),
            aliases = registry.aliases.len(),
            "Command registry built"
        );
        Ok(registry)
    }

    /// A registry with no commands.
    pub fn empty(max_depth: usize) -> Self {
        Self {
            handlers: HashMap::new(),
            aliases: AliasTable::new(),
            reentry: DashMap::new(),
            max_depth,
        }
    }

    pub fn register(&mut self, name: &'static str, handler: impl Handler + 'static) {
        self.handlers.insert(name, Box::new(handler));
    }

    pub fn alias(&mut self, alias: &'static str, target: &'static str) {
        self.aliases.insert(alias, target);
    }

    /// Check every alias resolves to a registered command.
    pub fn validate(&self) -> Result<(), AliasError> {
        self.aliases
            .validate(|name| self.handlers.contains_key(name))
    }

    /// Canonical command name for `name`, following aliases.
    ///
    /// Idempotent: a canonical name resolves to itself.
    pub fn canonical_name(&self, name: &str) -> Option<&'static str> {
        let target = match self.aliases.resolve(name) {
            Ok(target) => target,
            Err(e) => {
                warn!(name = %name, error = %e, "Alias resolution failed");
                return None;
            }
        };
        self.handlers.get_key_value(target).map(|(name, _)| *name)
    }

    fn resolve(&self, name: &str) -> Option<(&'static str, &dyn Handler)> {
        let name = self.canonical_name(name)?;
        self.handlers.get(name).map(|h| (name, h.as_ref()))
    }

    /// Canonical command names, sorted.
    pub fn commands(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.handlers.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Aliases resolving to `command`, sorted.
    pub fn aliases_of(&self, command: &str) -> Vec<&'static str> {
        self.aliases.aliases_of(command)
    }

    /// Help lines for a command or alias.
    pub fn help_for(&self, name: &str) -> Option<(&'static str, &'static [&'static str])> {
        self.resolve(name).map(|(name, handler)| (name, handler.help()))
    }

    /// Current nesting counter for an actor in a room.
    pub fn nesting(&self, user: &str, room: Option<&str>) -> usize {
        self.reentry
            .get(&(user.to_string(), room.map(str::to_string)))
            .map(|c| *c)
            .unwrap_or(0)
    }

    /// Dispatch a line typed by a user.
    ///
    /// Chat and unknown commands are silent no-ops. Every error has already
    /// been reported to the actor by the time this returns.
    pub async fn dispatch(&self, invocation: Invocation<'_>, line: &str) {
        if let Err(e) = self.execute(invocation, line.to_string(), 0).await {
            debug!(error = %e, "Dispatch chain aborted");
        }
    }

    /// Run one command line at nesting level `depth`.
    ///
    /// Returns `Err` only for `RecursionLimitExceeded`, which aborts the
    /// whole chain of nested dispatches.
    pub fn execute<'a>(
        &'a self,
        invocation: Invocation<'a>,
        line: String,
        depth: usize,
    ) -> BoxFuture<'a, Result<(), HandlerError>> {
        async move {
            let Some(parsed) = CommandLine::parse(&line) else {
                return Ok(());
            };
            let Some((command, handler)) = self.resolve(&parsed.name) else {
                debug!(command = %parsed.name, user = %invocation.user_id, "Unknown command ignored");
                return Ok(());
            };

            let guard = ReentryGuard::enter(
                &self.reentry,
                (
                    invocation.user_id.to_string(),
                    invocation.room_id.map(str::to_string),
                ),
            );
            let mut ctx = Context::new(
                invocation,
                self,
                command,
                parsed.name.clone(),
                parsed.sigil,
                parsed.target.to_string(),
                depth,
            );

            if guard.nesting() > self.max_depth {
                warn!(
                    command,
                    user = %invocation.user_id,
                    nesting = guard.nesting(),
                    "Recursion limit exceeded"
                );
                crate::metrics::record_recursion_limited();
                crate::metrics::record_command_error(command, "recursion_limit");
                if let Err(e) = ctx.notice(RECURSION_NOTICE).await {
                    warn!(error = %e, "Failed to deliver recursion notice");
                }
                return Err(HandlerError::RecursionLimitExceeded);
            }

            let span = spans::command(
                command,
                invocation.user_id,
                invocation.room_id,
                invocation.connection,
                depth,
            );
            let target = parsed.target.to_string();
            let outcome = {
                let _timer = CommandTimer::new(command);
                AssertUnwindSafe(handler.handle(&mut ctx, &target))
                    .catch_unwind()
                    .instrument(span)
                    .await
            };
            let result = outcome.unwrap_or_else(|panic| {
                Err(HandlerError::Internal(format!(
                    "handler panicked: {}",
                    panic_message(panic.as_ref())
                )))
            });
            drop(guard);

            match result {
                Ok(Some(text)) => {
                    if let Err(e) = ctx.notice(text).await {
                        warn!(command, error = %e, "Failed to deliver reply");
                    }
                    Ok(())
                }
                Ok(None) => Ok(()),
                Err(e) => {
                    crate::metrics::record_command_error(command, e.error_code());
                    if e.is_fault() {
                        error!(command, user = %invocation.user_id, error = %e, "Command failed");
                    } else {
                        debug!(command, error = %e, "Command error");
                    }
                    if let Some(notice) = e.to_notice() {
                        if let Err(send_err) = ctx.notice(notice).await {
                            warn!(command, error = %send_err, "Failed to deliver error notice");
                        }
                    }
                    match e {
                        HandlerError::RecursionLimitExceeded => Err(e),
                        _ => Ok(()),
                    }
                }
            }
        }
        .boxed()
    }
}

/// Increments a re-entrancy counter and decrements it on drop, so the
/// counter is restored on success, error and panic alike.
struct ReentryGuard<'a> {
    counters: &'a DashMap<ReentryKey, usize>,
    key: ReentryKey,
    nesting: usize,
}

impl<'a> ReentryGuard<'a> {
    fn enter(counters: &'a DashMap<ReentryKey, usize>, key: ReentryKey) -> Self {
        let nesting = {
            let mut count = counters.entry(key.clone()).or_insert(0);
            *count += 1;
            *count - 1
        };
        Self {
            counters,
            key,
            nesting,
        }
    }

    /// Number of dispatches already running for this key.
    fn nesting(&self) -> usize {
        self.nesting
    }
}

impl Drop for ReentryGuard<'_> {
    fn drop(&mut self) {
        self.counters.remove_if_mut(&self.key, |_, count| {
            *count = count.saturating_sub(1);
            *count == 0
        });
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s
    } else {
        "unknown panic"
    }
}
