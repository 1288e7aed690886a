// src/serial.rs

//! Console link over a native serial port, built on the `serialport` crate.

use std::io::{self, Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};

use crate::common::frame::LinkSettings;
use crate::common::hal_traits::{VantageSerial, VantageTimer};

/// How long one read or write may block the OS call before reporting `WouldBlock`.
/// The console layer enforces the real timeouts on top.
const PORT_POLL_TIMEOUT: Duration = Duration::from_millis(10);

const RX_CHUNK: usize = 64;

pub struct SerialLink {
    port: Option<Box<dyn SerialPort>>,
    rx: [u8; RX_CHUNK],
    rx_pos: usize,
    rx_len: usize,
}

impl core::fmt::Debug for SerialLink {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerialLink")
            .field("port", &self.port.as_ref().and_then(|p| p.name()))
            .field("buffered", &(self.rx_len - self.rx_pos))
            .finish()
    }
}

impl SerialLink {
    pub fn open(path: &str, settings: LinkSettings) -> serialport::Result<Self> {
        let data_bits = match settings.data_bits {
            5 => DataBits::Five,
            6 => DataBits::Six,
            7 => DataBits::Seven,
            8 => DataBits::Eight,
            other => return Err(invalid_setting(format!("unsupported data bits: {}", other))),
        };
        let stop_bits = match settings.stop_bits {
            1 => StopBits::One,
            2 => StopBits::Two,
            other => return Err(invalid_setting(format!("unsupported stop bits: {}", other))),
        };
        let parity = if settings.parity { Parity::Even } else { Parity::None };

        let port = serialport::new(path, settings.baud_rate)
            .data_bits(data_bits)
            .stop_bits(stop_bits)
            .parity(parity)
            .flow_control(FlowControl::None)
            .timeout(PORT_POLL_TIMEOUT)
            .open()?;
        log::debug!("Opened {} at {} baud", path, settings.baud_rate);

        Ok(SerialLink { port: Some(port), rx: [0; RX_CHUNK], rx_pos: 0, rx_len: 0 })
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, io::Error> {
        self.port
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "serial link is closed"))
    }
}

fn invalid_setting(description: String) -> serialport::Error {
    serialport::Error::new(serialport::ErrorKind::InvalidInput, description)
}

/// Timeouts and interrupts mean "try again"; everything else is a real failure.
fn would_block(e: io::Error) -> nb::Error<io::Error> {
    match e.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted => {
            nb::Error::WouldBlock
        }
        _ => nb::Error::Other(e),
    }
}

impl VantageSerial for SerialLink {
    type Error = io::Error;

    fn read_byte(&mut self) -> nb::Result<u8, io::Error> {
        if self.rx_pos == self.rx_len {
            let mut chunk = [0u8; RX_CHUNK];
            let n = self.port()?.read(&mut chunk).map_err(would_block)?;
            if n == 0 {
                return Err(nb::Error::WouldBlock);
            }
            self.rx = chunk;
            self.rx_pos = 0;
            self.rx_len = n;
        }
        let byte = self.rx[self.rx_pos];
        self.rx_pos += 1;
        Ok(byte)
    }

    fn write_byte(&mut self, byte: u8) -> nb::Result<(), io::Error> {
        match self.port()?.write(&[byte]).map_err(would_block)? {
            0 => Err(nb::Error::WouldBlock),
            _ => Ok(()),
        }
    }

    fn flush(&mut self) -> nb::Result<(), io::Error> {
        self.port()?.flush().map_err(would_block)
    }

    fn close(&mut self) -> Result<(), io::Error> {
        // Dropping the port closes the device.
        match self.port.take() {
            Some(mut port) => {
                log::debug!("Closing serial port {:?}", port.name());
                port.flush()
            }
            None => Ok(()),
        }
    }
}

impl VantageTimer for SerialLink {
    type Instant = Instant;

    fn delay_us(&mut self, us: u32) {
        thread::sleep(Duration::from_micros(us as u64));
    }

    fn delay_ms(&mut self, ms: u32) {
        thread::sleep(Duration::from_millis(ms as u64));
    }

    fn now(&self) -> Instant {
        Instant::now()
    }
}
