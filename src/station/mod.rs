// src/station/mod.rs

//! One complete reading of the station, and the session that produces it.
//!
//! [`fetch_snapshot`] drives a [`Console`] through wake-up, live data,
//! high/lows and console info, then closes the link. It never fails: a
//! broken link or an unreachable console lands in
//! [`ReadingSnapshot::error`], while a stage that merely fails leaves its
//! field `None` and the session moves on.

pub mod cache;

use core::fmt::Debug;

use chrono::Local;
use log::{error, info, warn};
use serde::Serialize;

use crate::common::{
    error::VantageError,
    hal_traits::{VantageSerial, VantageTimer},
    packet::{HiLowRecord, Loop2Record, LoopRecord},
};
use crate::console::{Console, ConsoleSettings};

pub use cache::{spawn_refresh, RefreshHandle, SnapshotCache};

/// Shown until the first real snapshot has been published.
pub const PENDING_MESSAGE: &str = "Data is being fetched for the first time. Please wait...";

/// LOOP and LOOP2 merged into one flat record, stamped with the local fetch time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveData {
    #[serde(flatten)]
    pub loop_record: LoopRecord,
    #[serde(flatten)]
    pub loop2_record: Loop2Record,
    pub live_data_timestamp: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleInfo {
    pub console_time: Option<String>,
    pub firmware_date: Option<String>,
    pub firmware_version: Option<String>,
}

/// Everything one session learned.
///
/// `error` is set only when the link failed or the console could not be woken.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingSnapshot {
    pub live_data: Option<LiveData>,
    pub hi_low_data: Option<HiLowRecord>,
    pub console_info: Option<ConsoleInfo>,
    pub error: Option<String>,
}

impl ReadingSnapshot {
    /// A snapshot holding nothing but an error message.
    pub fn failed(message: impl Into<String>) -> Self {
        ReadingSnapshot { error: Some(message.into()), ..Default::default() }
    }

    /// The placeholder served before the first fetch completes.
    pub fn pending() -> Self {
        Self::failed(PENDING_MESSAGE)
    }
}

/// Runs one full session over `interface` and closes it.
pub fn fetch_snapshot<IF>(interface: IF, settings: ConsoleSettings) -> ReadingSnapshot
where
    IF: VantageSerial + VantageTimer,
{
    let mut console = Console::with_settings(interface, settings);
    let mut snapshot = ReadingSnapshot::default();

    match run_session(&mut console, &mut snapshot) {
        Ok(()) => info!("Data fetch complete"),
        Err(e) => {
            error!("Session aborted: {}", e);
            snapshot.error = Some(e.to_string());
        }
    }

    if let Err(e) = console.close() {
        warn!("Failed to close console link: {}", e);
    }
    snapshot
}

fn run_session<IF>(
    console: &mut Console<IF>,
    snapshot: &mut ReadingSnapshot,
) -> Result<(), VantageError<IF::Error>>
where
    IF: VantageSerial + VantageTimer,
{
    console.wake_up()?;

    info!("Fetching LOOP packets...");
    snapshot.live_data = settle("live data", fetch_live(console))?;

    info!("Fetching HILOWS packet...");
    snapshot.hi_low_data = settle("high/low data", fetch_hilows(console))?;

    info!("Fetching console info...");
    snapshot.console_info = Some(ConsoleInfo {
        console_time: settle("console time", console.console_time())?,
        firmware_date: settle("firmware date", console.firmware_date())?,
        firmware_version: settle("firmware version", console.firmware_version())?,
    });
    Ok(())
}

fn fetch_live<IF>(console: &mut Console<IF>) -> Result<LiveData, VantageError<IF::Error>>
where
    IF: VantageSerial + VantageTimer,
{
    let (loop_raw, loop2_raw) = console.loop_packets()?;
    Ok(LiveData {
        loop_record: LoopRecord::decode(&loop_raw)?,
        loop2_record: Loop2Record::decode(&loop2_raw)?,
        live_data_timestamp: Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
    })
}

fn fetch_hilows<IF>(console: &mut Console<IF>) -> Result<HiLowRecord, VantageError<IF::Error>>
where
    IF: VantageSerial + VantageTimer,
{
    let raw = console.hilows_packet()?;
    Ok(HiLowRecord::decode(&raw)?)
}

/// Passes fatal errors up; logs anything else and turns it into `None`.
fn settle<T, E: Debug>(
    stage: &str,
    outcome: Result<T, VantageError<E>>,
) -> Result<Option<T>, VantageError<E>> {
    match outcome {
        Ok(value) => Ok(Some(value)),
        Err(e) if e.is_fatal() => Err(e),
        Err(e) => {
            warn!("Failed to fetch {}: {}", stage, e);
            Ok(None)
        }
    }
}

/// A station reached through a native serial port.
#[cfg(feature = "impl-serialport")]
#[derive(Debug, Clone)]
pub struct Station {
    config: crate::config::StationConfig,
}

#[cfg(feature = "impl-serialport")]
impl Station {
    pub fn new(config: crate::config::StationConfig) -> Self {
        Station { config }
    }

    pub fn config(&self) -> &crate::config::StationConfig {
        &self.config
    }

    /// Opens the configured port, runs one session and returns its snapshot.
    /// A port that cannot be opened yields a snapshot with `error` set.
    pub fn fetch_snapshot(&self) -> ReadingSnapshot {
        info!("Opening serial port {}...", self.config.port);
        match crate::serial::SerialLink::open(&self.config.port, self.config.link_settings()) {
            Ok(link) => fetch_snapshot(link, self.config.console_settings()),
            Err(e) => {
                error!("Could not open {}: {}", self.config.port, e);
                ReadingSnapshot::failed(e.to_string())
            }
        }
    }
}
