// src/lib.rs

//! Client for the Davis Vantage Pro2 console's serial protocol.
//!
//! [`station::fetch_snapshot`] runs one session (wake-up, live data,
//! high/lows, console info) over any link implementing the
//! [`common::hal_traits`] and returns a [`station::ReadingSnapshot`].
//! With the default `impl-serialport` feature, [`station::Station`] does the
//! same over a native serial port.

pub mod common;
pub mod config;
pub mod console;
#[cfg(feature = "impl-serialport")]
pub mod serial;
pub mod station;

// Re-export key types for convenience
pub use common::{DecodeError, VantageError};
pub use config::StationConfig;
pub use console::{Console, ConsoleSettings};
pub use station::{fetch_snapshot, ReadingSnapshot};
