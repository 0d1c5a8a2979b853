//! dexchatd - console driver for the dexchat command core.
//!
//! Reads command lines from stdin as a local console user and prints the
//! outbound traffic they produce.

use anyhow::Context as _;
use dexchat::config::{self, Config, LogFormat};
use dexchat::data::Catalog;
use dexchat::handlers::{Invocation, Outbound, Registry, ResponseMiddleware};
use dexchat::state::{Hub, Room, User};
use dexchat::telemetry::spans;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{Instrument, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Queue between handlers and the console printer.
const OUTBOUND_CHANNEL_SIZE: usize = 256;

const DEFAULT_CONFIG: &str = "config.toml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1);
    let config = match config_path.as_deref() {
        Some(path) => Config::load(path).with_context(|| format!("loading {path}"))?,
        None if Path::new(DEFAULT_CONFIG).exists() => {
            Config::load(DEFAULT_CONFIG).with_context(|| format!("loading {DEFAULT_CONFIG}"))?
        }
        None => Config::default(),
    };

    init_tracing(&config);

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(error = %e, "Invalid configuration");
        }
        anyhow::bail!("configuration has {} error(s)", errors.len());
    }

    info!(server = %config.server.name, "Starting dexchatd");
    dexchat::metrics::init();

    let catalog = match &config.data.catalog {
        Some(path) => {
            let catalog = Catalog::load(path).with_context(|| format!("loading catalog {path}"))?;
            info!(path = %path, species = catalog.species_count(), "Catalog loaded");
            catalog
        }
        None => {
            warn!("No data.catalog configured; searches will find nothing");
            Catalog::new()
        }
    };

    let hub = Arc::new(Hub::new(&config, catalog));
    let registry = Registry::new(&config.dispatch).context("building command registry")?;

    // Console user and room
    let console = User::new(&config.console.name, config.console.rank);
    let user_id = console.id.clone();
    hub.add_user(console);
    let room = hub.add_room(Room::new(&config.console.room, config.rooms.history_limit));
    let room_id = room.read().await.id.clone();
    hub.join(&user_id, &room_id).await;
    info!(user = %user_id, room = %room_id, "Console user joined");

    spawn_settings_watcher(&hub);
    spawn_event_logger(&hub);
    spawn_mute_expiry(&hub);
    spawn_cooldown_cleanup(&hub);

    let (tx, mut rx) = mpsc::channel::<Outbound>(OUTBOUND_CHANNEL_SIZE);
    let printer = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            println!("{msg}");
        }
    });

    let connection = uuid::Uuid::new_v4();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let session = async {
        loop {
            tokio::select! {
                line = lines.next_line() => match line {
                    Ok(Some(line)) => {
                        let invocation = Invocation {
                            hub: &hub,
                            sender: ResponseMiddleware::Direct(&tx),
                            user_id: &user_id,
                            room_id: Some(room_id.as_str()),
                            connection,
                        };
                        registry.dispatch(invocation, &line).await;
                    }
                    Ok(None) => break,
                    Err(e) => {
                        error!(error = %e, "Failed to read stdin");
                        break;
                    }
                },
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupted");
                    break;
                }
            }
        }
    };
    session.instrument(spans::console(&user_id, &room_id)).await;
    hub.remove_user(&user_id).await;

    drop(tx);
    if let Err(e) = printer.await {
        warn!(error = %e, "Printer task failed");
    }
    debug!(metrics = %dexchat::metrics::gather_metrics(), "Final metrics");
    info!("Console closed");
    Ok(())
}

fn init_tracing(config: &Config) {
    let default_filter = config.log.filter.as_deref().unwrap_or("info");
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);
    match config.log.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.init(),
    }
}

/// Log every Pokémon of the Day change.
fn spawn_settings_watcher(hub: &Arc<Hub>) {
    let mut rx = hub.settings.subscribe_potd();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let potd = rx.borrow_and_update().clone();
            match potd {
                Some(potd) => info!(species = %potd.species, set_by = %potd.set_by, "Settings changed: potd"),
                None => info!("Settings changed: potd cleared"),
            }
        }
    });
}

/// Log room settings events. Persistence would subscribe here.
fn spawn_event_logger(hub: &Arc<Hub>) {
    let mut rx = hub.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => info!(?event, "Hub event"),
                Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!(skipped, "Hub event logger lagged");
                }
                Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
            }
        }
    });
}

/// Clear expired mutes once a minute.
fn spawn_mute_expiry(hub: &Arc<Hub>) {
    let hub = Arc::clone(hub);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            let rooms: Vec<_> = hub.rooms.iter().map(|r| r.value().clone()).collect();
            let now = chrono::Utc::now();
            for room in rooms {
                let removed = room.write().await.expire_mutes(now);
                if removed > 0 {
                    info!(removed, "Expired mutes removed");
                }
            }
        }
    });
}

/// Drop elapsed broadcast cooldowns every five minutes.
fn spawn_cooldown_cleanup(hub: &Arc<Hub>) {
    let hub = Arc::clone(hub);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(300));
        loop {
            interval.tick().await;
            hub.broadcast_gate.cleanup();
        }
    });
}
