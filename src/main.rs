//! Door latch firmware entry point.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                    │
//! │                                                           │
//! │  serial feed (stdin) ──▶ IdentityQueue                    │
//! │  LogEventSink            PinDriver / SimLine              │
//! │                                                           │
//! │  ─────────────── Port Trait Boundary ───────────────      │
//! │                                                           │
//! │  ┌─────────────────────────────────────────────────────┐  │
//! │  │            DoorLoop (APP_CPU task)                  │  │
//! │  │  classify · unlock · hold · release                 │  │
//! │  └─────────────────────────────────────────────────────┘  │
//! └───────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;

use anyhow::{Result, anyhow};
use log::{info, warn};

use doorlatch::adapters::log_sink::LogEventSink;
use doorlatch::adapters::serial_feed;
use doorlatch::app::door_loop::{DoorContext, DoorLoop, spawn_door_task};
use doorlatch::config::DoorConfig;
use doorlatch::queue::IdentityQueue;
use doorlatch::signals::{StopSignal, VisualStateFlag};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    #[cfg(target_os = "espidf")]
    {
        esp_idf_svc::sys::link_patches();
        esp_idf_logger::init()?;
    }
    #[cfg(not(target_os = "espidf"))]
    init_host_logging()?;

    info!("doorlatch v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let config = match DoorConfig::from_json(include_str!("../door_config.json")) {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("Embedded config rejected ({}), using defaults", e);
            DoorConfig::default()
        }
    };

    // ── 3. Shared state ───────────────────────────────────────
    let queue = Arc::new(IdentityQueue::new());
    let stop = StopSignal::new();
    let ctx = DoorContext {
        source: Arc::clone(&queue),
        stop: stop.clone(),
        visual: VisualStateFlag::new(),
    };

    // ── 4. Door task ──────────────────────────────────────────
    let door = DoorLoop::new(config.timing(), ctx, LogEventSink::new());
    let door_task = open_lines_and_spawn(&config, door)?;

    // ── 5. Identity feed ──────────────────────────────────────
    let _feed = serial_feed::spawn_stdin_feed(queue, stop)?;

    info!("System ready. Waiting for identities.");

    let stats = door_task
        .join()
        .map_err(|_| anyhow!("door task panicked"))??;
    info!(
        "Door task finished: {} processed ({} granted, {} denied, {} failed)",
        stats.processed(),
        stats.granted,
        stats.denied,
        stats.failed
    );
    Ok(())
}

/// Route `log` records to stderr; `RUST_LOG` overrides the `info` default.
#[cfg(not(target_os = "espidf"))]
fn init_host_logging() -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter)
        .try_init()?;
    Ok(())
}

type DoorTask = std::thread::JoinHandle<doorlatch::error::Result<doorlatch::app::events::DoorStats>>;

#[cfg(target_os = "espidf")]
fn open_lines_and_spawn(
    config: &DoorConfig,
    door: DoorLoop<Arc<IdentityQueue>, LogEventSink>,
) -> Result<DoorTask> {
    use doorlatch::drivers::lines::{Line, open_output};

    let actuator = open_output(Line::Actuator, config.actuator_gpio)?;
    let indicator = open_output(Line::Indicator, config.indicator_gpio)?;
    Ok(spawn_door_task(door, actuator, indicator)?)
}

#[cfg(not(target_os = "espidf"))]
fn open_lines_and_spawn(
    config: &DoorConfig,
    door: DoorLoop<Arc<IdentityQueue>, LogEventSink>,
) -> Result<DoorTask> {
    use doorlatch::drivers::lines::Line;
    use doorlatch::drivers::sim_line::SimLine;

    info!(
        "Simulated lines (actuator GPIO{}, indicator GPIO{})",
        config.actuator_gpio, config.indicator_gpio
    );
    Ok(spawn_door_task(
        door,
        SimLine::new(Line::Actuator),
        SimLine::new(Line::Indicator),
    )?)
}
