// src/common/timing.rs

use core::time::Duration;

// === Link Timing ===

/// Total time allowed for one blocking read (a fixed-length read or a
/// read-until-delimiter) before it returns whatever arrived.
pub const READ_TIMEOUT: Duration = Duration::from_secs(5);

/// Slack added to the nominal transmit time of a command line.
pub const WRITE_MARGIN: Duration = Duration::from_millis(100);
/// Time allowed for the transmit buffer to drain.
pub const FLUSH_TIMEOUT: Duration = Duration::from_millis(100);

/// Pause between polls of a link that returned `WouldBlock`.
pub const POLL_INTERVAL_US: u32 = 100;

// === Wake-up (console sleeps between commands) ===

/// Wake probes sent before the console is declared unreachable.
pub const WAKE_ATTEMPTS: u8 = 3;
/// Settle time after a failed wake probe before the next one.
pub const WAKE_SETTLE: Duration = Duration::from_millis(1200);

// === Byte Timing at 19200 Baud (8N1) ===
// 1 start bit + 8 data bits + 1 stop bit = 10 bits per byte
// Time per byte = 10 / 19200 s = 520.8 us

/// Nominal duration of a single byte (10 bits total) at 19200 baud.
pub const BYTE_DURATION: Duration = Duration::from_micros(521);
