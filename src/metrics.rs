//! Prometheus metrics collection for dexchat.
//!
//! - `dexchat_command_total{command}` - Commands dispatched by canonical name
//! - `dexchat_command_duration_seconds{command}` - Command latency histogram
//! - `dexchat_command_errors_total{command,error}` - Command errors by kind
//! - `dexchat_broadcasts_total{result}` - Broadcast requests granted or denied
//! - `dexchat_search_results` - Matches per search before truncation

use prometheus::{
    Encoder, Histogram, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, Opts, Registry,
    TextEncoder,
};
use std::sync::OnceLock;

/// Global Prometheus registry for all metrics.
pub static REGISTRY: OnceLock<Registry> = OnceLock::new();

pub fn registry() -> &'static Registry {
    REGISTRY.get_or_init(Registry::new)
}

// ========================================================================
// Command Metrics
// ========================================================================

/// Commands dispatched by canonical name.
pub static COMMAND_COUNTER: OnceLock<IntCounterVec> = OnceLock::new();

/// Command processing latency by canonical name.
pub static COMMAND_LATENCY: OnceLock<HistogramVec> = OnceLock::new();

/// Command errors by name and error kind.
pub static COMMAND_ERRORS: OnceLock<IntCounterVec> = OnceLock::new();

/// Dispatches refused for nesting too deep.
pub static RECURSION_LIMITED: OnceLock<IntCounter> = OnceLock::new();

// ========================================================================
// Room & Search Metrics
// ========================================================================

/// Broadcast requests by result (granted, denied, cooldown).
pub static BROADCASTS: OnceLock<IntCounterVec> = OnceLock::new();

/// Matches per search, before display truncation.
pub static SEARCH_RESULTS: OnceLock<Histogram> = OnceLock::new();

/// Initialize the Prometheus metrics registry.
///
/// Call once at startup. Recording before `init()` is a no-op.
pub fn init() {
    let r = registry();

    macro_rules! register {
        ($metric:ident, $init:expr) => {
            if $metric.get().is_none() {
                let m = $init.expect(concat!(stringify!($metric), " creation failed"));
                if let Err(e) = r.register(Box::new(m.clone())) {
                    tracing::warn!(error = %e, concat!("Failed to register metric ", stringify!($metric)));
                }
                let _ = $metric.set(m);
            }
        };
    }

    register!(COMMAND_COUNTER, IntCounterVec::new(Opts::new("dexchat_command_total", "Commands dispatched by name"), &["command"]));
    register!(COMMAND_LATENCY, HistogramVec::new(
        HistogramOpts::new("dexchat_command_duration_seconds", "Command latency by name")
            .buckets(vec![0.00005, 0.0001, 0.0005, 0.001, 0.005, 0.01, 0.05, 0.1, 0.5]),
        &["command"]));
    register!(COMMAND_ERRORS, IntCounterVec::new(Opts::new("dexchat_command_errors_total", "Command errors by name and kind"), &["command", "error"]));
    register!(RECURSION_LIMITED, IntCounter::new("dexchat_recursion_limited_total", "Dispatches refused for nesting too deep"));
    register!(BROADCASTS, IntCounterVec::new(Opts::new("dexchat_broadcasts_total", "Broadcast requests by result"), &["result"]));
    register!(SEARCH_RESULTS, Histogram::with_opts(
        HistogramOpts::new("dexchat_search_results", "Matches per search")
            .buckets(vec![0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 500.0, 1000.0])));
}

/// Gather all metrics and encode them in Prometheus text format.
pub fn gather_metrics() -> String {
    let encoder = TextEncoder::new();
    let metric_families = registry().gather();
    let mut buffer = vec![];
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        tracing::error!(error = %e, "Failed to encode Prometheus metrics");
        return String::new();
    }
    match String::from_utf8(buffer) {
        Ok(s) => s,
        Err(e) => {
            tracing::error!(error = %e, "Prometheus metrics were not valid UTF-8");
            String::new()
        }
    }
}

// ============================================================================
// Recording helpers
// ============================================================================

/// Record a command execution with latency.
#[inline]
pub fn record_command(command: &str, duration_secs: f64) {
    if let Some(c) = COMMAND_COUNTER.get() {
        c.with_label_values(&[command]).inc();
    }
    if let Some(h) = COMMAND_LATENCY.get() {
        h.with_label_values(&[command]).observe(duration_secs);
    }
}

/// Record a command error.
#[inline]
pub fn record_command_error(command: &str, error: &str) {
    if let Some(c) = COMMAND_ERRORS.get() {
        c.with_label_values(&[command, error]).inc();
    }
}

#[inline]
pub fn record_recursion_limited() {
    if let Some(c) = RECURSION_LIMITED.get() {
        c.inc();
    }
}

/// Record a broadcast request outcome: `granted`, `denied` or `cooldown`.
#[inline]
pub fn record_broadcast(result: &str) {
    if let Some(c) = BROADCASTS.get() {
        c.with_label_values(&[result]).inc();
    }
}

#[inline]
pub fn record_search_results(count: usize) {
    if let Some(h) = SEARCH_RESULTS.get() {
        h.observe(count as f64);
    }
}
