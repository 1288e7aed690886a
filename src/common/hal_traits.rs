// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::Add;
use core::time::Duration;

/// A point in time as reported by a [`VantageTimer`].
pub trait VantageInstant: Copy + Ord + Add<Duration, Output = Self> {}

impl<T> VantageInstant for T where T: Copy + Ord + Add<Duration, Output = T> {}

/// Abstraction for the delays and clock the console protocol needs.
pub trait VantageTimer {
    type Instant: VantageInstant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);

    /// Current time, used to bound blocking reads.
    fn now(&self) -> Self::Instant;
}

/// Abstraction for synchronous (non-blocking) byte I/O with the console.
pub trait VantageSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Attempts to read a single byte from the link.
    ///
    /// Returns `Ok(byte)` if a byte was read, or `Err(nb::Error::WouldBlock)`
    /// if no byte is available yet. Other errors are returned as `Err(nb::Error::Other(Self::Error))`.
    fn read_byte(&mut self) -> nb::Result<u8, Self::Error>;

    /// Attempts to write a single byte to the link.
    ///
    /// Returns `Ok(())` if the byte was accepted for transmission, or `Err(nb::Error::WouldBlock)`
    /// if the write buffer is full.
    fn write_byte(&mut self, byte: u8) -> nb::Result<(), Self::Error>;

    /// Attempts to flush the transmit buffer, ensuring all written bytes have been sent.
    fn flush(&mut self) -> nb::Result<(), Self::Error>;

    /// Releases the link. Called exactly once per session.
    fn close(&mut self) -> Result<(), Self::Error>;
}
