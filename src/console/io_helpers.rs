// src/console/io_helpers.rs

use super::Console;
use crate::common::{
    command::Command,
    error::VantageError,
    hal_traits::{VantageSerial, VantageTimer},
    timing,
};
use core::time::Duration;
use nb::Result as NbResult;

impl<IF> Console<IF>
where
    IF: VantageSerial + VantageTimer,
{
    /// Polls a non-blocking operation (`f`) until it stops returning `WouldBlock`.
    ///
    /// Returns `Ok(None)` once `deadline` passes without a result.
    fn poll_until<FN, T>(
        &mut self,
        deadline: IF::Instant,
        mut f: FN,
    ) -> Result<Option<T>, VantageError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(Some(result)),
                Err(nb::Error::WouldBlock) => {
                    if self.interface.now() >= deadline {
                        return Ok(None);
                    }
                    self.interface.delay_us(timing::POLL_INTERVAL_US);
                }
                Err(nb::Error::Other(e)) => return Err(VantageError::Io(e)),
            }
        }
    }

    /// Like [`poll_until`](Self::poll_until) with a relative timeout that turns into an error.
    pub(super) fn execute_blocking_io_with_timeout<FN, T>(
        &mut self,
        timeout: Duration,
        f: FN,
    ) -> Result<T, VantageError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        let deadline = self.interface.now() + timeout;
        self.poll_until(deadline, f)?.ok_or(VantageError::Timeout)
    }

    /// Writes raw bytes and waits for them to drain.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), VantageError<IF::Error>> {
        let write_timeout = timing::BYTE_DURATION * bytes.len() as u32 + timing::WRITE_MARGIN;
        let deadline = self.interface.now() + write_timeout;

        for &byte in bytes {
            self.poll_until(deadline, |iface| iface.write_byte(byte))?
                .ok_or(VantageError::Timeout)?;
        }

        self.execute_blocking_io_with_timeout(timing::FLUSH_TIMEOUT, |iface| iface.flush())
    }

    /// Formats and sends one command line.
    pub(super) fn write_command(&mut self, command: &Command) -> Result<(), VantageError<IF::Error>> {
        let line = command
            .format_into()
            .map_err(|_| VantageError::CommandFormat)?;
        log::trace!("-> {:?}", line.as_str());
        self.write_bytes(line.as_bytes())
    }

    /// Fills `buffer` from the link, sharing one read timeout across all bytes.
    ///
    /// Returns how many bytes arrived; fewer than `buffer.len()` means the
    /// timeout expired first.
    pub fn read_exact(&mut self, buffer: &mut [u8]) -> Result<usize, VantageError<IF::Error>> {
        let deadline = self.interface.now() + self.settings.read_timeout;

        for (filled, slot) in buffer.iter_mut().enumerate() {
            match self.poll_until(deadline, |iface| iface.read_byte())? {
                Some(byte) => *slot = byte,
                None => {
                    log::debug!("Read timed out after {} bytes", filled);
                    return Ok(filled);
                }
            }
        }
        Ok(buffer.len())
    }

    /// Appends bytes to `buffer` until it ends with `delimiter`.
    ///
    /// Stops early when the buffer is full or the read timeout expires.
    /// Returns whether the delimiter was seen.
    pub fn read_until<const N: usize>(
        &mut self,
        delimiter: &[u8],
        buffer: &mut heapless::Vec<u8, N>,
    ) -> Result<bool, VantageError<IF::Error>> {
        let deadline = self.interface.now() + self.settings.read_timeout;

        while !buffer.ends_with(delimiter) {
            if buffer.is_full() {
                log::debug!("Reply buffer full before delimiter");
                return Ok(false);
            }
            match self.poll_until(deadline, |iface| iface.read_byte())? {
                Some(byte) => {
                    // Capacity checked above.
                    let _ = buffer.push(byte);
                }
                None => return Ok(false),
            }
        }
        Ok(true)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::super::mock::MockLink;
    use super::*;
    use crate::console::ConsoleSettings;

    fn console_over(link: MockLink) -> Console<MockLink> {
        Console::new(link)
    }

    #[test]
    fn test_read_exact_returns_partial_on_timeout() {
        let link = MockLink::new();
        link.feed(b"abc");
        let mut console = console_over(link.clone());
        let mut buf = [0u8; 5];
        assert_eq!(console.read_exact(&mut buf).unwrap(), 3);
        assert_eq!(&buf[..3], b"abc");
        // The whole read shares one 5 s budget.
        assert!(link.elapsed() >= Duration::from_secs(5));
        assert!(link.elapsed() < Duration::from_millis(5_100));
    }

    #[test]
    fn test_read_until_stops_at_delimiter() {
        let link = MockLink::new();
        link.feed(b"\n\rOK\n\rMar 29 2012\n\r");
        let mut console = console_over(link);
        let mut buf: heapless::Vec<u8, 64> = heapless::Vec::new();
        assert!(console.read_until(b"OK\n\r", &mut buf).unwrap());
        assert_eq!(buf.as_slice(), b"\n\rOK\n\r");
        buf.clear();
        assert!(console.read_until(b"\n\r", &mut buf).unwrap());
        assert_eq!(buf.as_slice(), b"Mar 29 2012\n\r");
    }

    #[test]
    fn test_read_until_reports_missing_delimiter() {
        let link = MockLink::new();
        link.feed(b"garbage");
        let mut console = Console::with_settings(
            link,
            ConsoleSettings { read_timeout: Duration::from_millis(50), ..ConsoleSettings::default() },
        );
        let mut buf: heapless::Vec<u8, 64> = heapless::Vec::new();
        assert!(!console.read_until(b"\n\r", &mut buf).unwrap());
        assert_eq!(buf.as_slice(), b"garbage");
    }

    #[test]
    fn test_read_until_stops_when_full() {
        let link = MockLink::new();
        link.feed(b"0123456789");
        let mut console = console_over(link);
        let mut buf: heapless::Vec<u8, 4> = heapless::Vec::new();
        assert!(!console.read_until(b"\n\r", &mut buf).unwrap());
        assert_eq!(buf.as_slice(), b"0123");
    }

    #[test]
    fn test_io_error_propagates() {
        let link = MockLink::new();
        link.fail_reads();
        let mut console = console_over(link);
        let mut buf = [0u8; 2];
        assert!(matches!(console.read_exact(&mut buf), Err(VantageError::Io(_))));
    }

    #[test]
    fn test_write_command_sends_line() {
        let link = MockLink::new();
        let mut console = console_over(link.clone());
        console.write_command(&Command::LIVE_PAIR).unwrap();
        console.write_command(&Command::HiLows).unwrap();
        assert_eq!(link.written_lines(), vec!["LPS 3 2\n", "HILOWS\n"]);
    }
}
