// src/console/mod.rs

//! One session with a console over an exclusively owned link.

mod io_helpers;
mod protocol_helpers;
mod wakeup;

#[cfg(test)]
pub(crate) mod mock;

pub use protocol_helpers::{LoopPair, TEXT_REPLY_CAPACITY};

use crate::common::{
    error::VantageError,
    hal_traits::{VantageSerial, VantageTimer},
    timing,
};
use core::time::Duration;

/// Where the session stands in the wake-up handshake.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WakeState {
    /// No probe sent yet.
    Idle,
    /// Probe number `attempt` (1-based) is in flight.
    Probing { attempt: u8 },
    /// The console answered; commands may be sent.
    Awake,
    /// Every probe failed or the link broke. Terminal.
    Unreachable,
}

/// Session-level knobs.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ConsoleSettings {
    /// Total time one blocking read may take.
    pub read_timeout: Duration,
    /// Wake probes before giving up.
    pub wake_attempts: u8,
    /// Pause after a failed wake probe.
    pub wake_settle: Duration,
}

impl Default for ConsoleSettings {
    fn default() -> Self {
        ConsoleSettings {
            read_timeout: timing::READ_TIMEOUT,
            wake_attempts: timing::WAKE_ATTEMPTS,
            wake_settle: timing::WAKE_SETTLE,
        }
    }
}

/// A Vantage console session for SYNCHRONOUS operations.
///
/// Owns the link for its whole life. The link is released exactly once,
/// by [`Console::close`] or, failing that, when the session is dropped.
#[derive(Debug)]
pub struct Console<IF>
where
    IF: VantageSerial + VantageTimer,
{
    interface: IF,
    settings: ConsoleSettings,
    state: WakeState,
    closed: bool,
}

impl<IF> Console<IF>
where
    IF: VantageSerial + VantageTimer,
{
    pub fn new(interface: IF) -> Self {
        Self::with_settings(interface, ConsoleSettings::default())
    }

    pub fn with_settings(interface: IF, settings: ConsoleSettings) -> Self {
        Console {
            interface,
            settings,
            state: WakeState::Idle,
            closed: false,
        }
    }

    pub fn state(&self) -> WakeState {
        self.state
    }

    pub fn settings(&self) -> &ConsoleSettings {
        &self.settings
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Releases the link. Further calls are no-ops.
    pub fn close(&mut self) -> Result<(), VantageError<IF::Error>> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        log::debug!("Closing console link");
        self.interface.close().map_err(VantageError::Io)
    }

    fn ensure_awake(&self) -> Result<(), VantageError<IF::Error>> {
        if self.closed || self.state != WakeState::Awake {
            return Err(VantageError::NotAwake);
        }
        Ok(())
    }
}

impl<IF> Drop for Console<IF>
where
    IF: VantageSerial + VantageTimer,
{
    fn drop(&mut self) {
        if !self.closed {
            if let Err(e) = self.close() {
                log::warn!("Failed to close console link: {}", e);
            }
        }
    }
}
