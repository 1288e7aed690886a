// src/console/protocol_helpers.rs

use super::Console;
use crate::common::{
    command::Command,
    error::VantageError,
    hal_traits::{VantageSerial, VantageTimer},
    packet::{decode_console_time, ACK, CLOCK_RECORD_LEN, HILOW_PACKET_LEN, LOOP_PACKET_LEN},
};

/// Capacity of the buffer an ASCII reply is collected in.
pub const TEXT_REPLY_CAPACITY: usize = 128;

const OK_LINE: &[u8] = b"OK\n\r";
const OK_MARKER: &[u8] = b"OK";
const LINE_END: &[u8] = b"\n\r";

/// One `LOOP` record followed by one `LOOP2` record, both still raw.
pub type LoopPair = ([u8; LOOP_PACKET_LEN], [u8; LOOP_PACKET_LEN]);

impl<IF> Console<IF>
where
    IF: VantageSerial + VantageTimer,
{
    /// `VER`: firmware build date, e.g. `Apr 24 2002`.
    pub fn firmware_date(&mut self) -> Result<String, VantageError<IF::Error>> {
        self.query_text(Command::FirmwareDate)
    }

    /// `NVER`: firmware version, e.g. `1.90`.
    pub fn firmware_version(&mut self) -> Result<String, VantageError<IF::Error>> {
        self.query_text(Command::FirmwareVersion)
    }

    /// `GETTIME`: the console clock as `YYYY-MM-DD HH:MM:SS`.
    pub fn console_time(&mut self) -> Result<String, VantageError<IF::Error>> {
        self.send(&Command::GetTime)?;
        let record: [u8; CLOCK_RECORD_LEN] = self.read_record()?;
        Ok(decode_console_time(&record)?)
    }

    /// `LPS 3 2`: one LOOP and one LOOP2 record, unvalidated.
    pub fn loop_packets(&mut self) -> Result<LoopPair, VantageError<IF::Error>> {
        self.send(&Command::LIVE_PAIR)?;
        let first = self.read_record()?;
        let second = self.read_record()?;
        Ok((first, second))
    }

    /// `HILOWS`: the 438-byte high/low record, unvalidated.
    pub fn hilows_packet(&mut self) -> Result<[u8; HILOW_PACKET_LEN], VantageError<IF::Error>> {
        self.send(&Command::HiLows)?;
        self.read_record()
    }

    /// Sends a command with an ASCII reply of the form `\n\rOK\n\r<text>\n\r`.
    fn query_text(&mut self, command: Command) -> Result<String, VantageError<IF::Error>> {
        self.send(&command)?;

        let mut reply: heapless::Vec<u8, TEXT_REPLY_CAPACITY> = heapless::Vec::new();
        self.read_until(OK_LINE, &mut reply)?;
        if !reply.windows(OK_MARKER.len()).any(|w| w == OK_MARKER) {
            return Err(VantageError::MissingDelimiter);
        }

        reply.clear();
        self.read_until(LINE_END, &mut reply)?;
        let text = core::str::from_utf8(&reply).map_err(|_| VantageError::InvalidText)?;
        if !text.is_ascii() {
            return Err(VantageError::InvalidText);
        }
        Ok(text.trim().to_string())
    }

    /// Writes `command` on an awake console and consumes its ACK if it sends one.
    fn send(&mut self, command: &Command) -> Result<(), VantageError<IF::Error>> {
        self.ensure_awake()?;
        self.write_command(command)?;
        if command.expects_ack() {
            self.read_ack()?;
        }
        Ok(())
    }

    fn read_ack(&mut self) -> Result<(), VantageError<IF::Error>> {
        let mut ack = [0u8; 1];
        match self.read_exact(&mut ack)? {
            0 => Err(VantageError::NotAcknowledged { received: None }),
            _ if ack[0] != ACK => Err(VantageError::NotAcknowledged { received: Some(ack[0]) }),
            _ => Ok(()),
        }
    }

    fn read_record<const N: usize>(&mut self) -> Result<[u8; N], VantageError<IF::Error>> {
        let mut record = [0u8; N];
        let got = self.read_exact(&mut record)?;
        if got != N {
            return Err(VantageError::ShortRead { expected: N, got });
        }
        Ok(record)
    }
}
