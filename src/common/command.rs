//! Console command definitions.
//!
//! Every command is a line of ASCII terminated by a line feed.

use core::fmt::{self, Write};

use arrayvec::ArrayString;

/// Capacity of a formatted command line.
pub const COMMAND_CAPACITY: usize = 16;

/// LPS bitmask selecting LOOP packets.
pub const LOOP_MASK_LOOP: u8 = 0x01;
/// LPS bitmask selecting LOOP2 packets.
pub const LOOP_MASK_LOOP2: u8 = 0x02;

/// Represents a console command.
///
/// The `Display` implementation produces the exact line sent on the wire,
/// including the trailing `\n`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Command {
    /// Bare line feed used to wake the console (`\n`).
    Wake,
    /// Firmware build date (`VER`).
    FirmwareDate,
    /// Firmware version number (`NVER`).
    FirmwareVersion,
    /// Console clock (`GETTIME`).
    GetTime,
    /// Live records (`LPS <mask> <count>`). Records alternate LOOP/LOOP2 when both are selected.
    LoopPackets { mask: u8, count: u8 },
    /// Daily/monthly/yearly extremes block (`HILOWS`).
    HiLows,
}

/// The command line did not fit [`COMMAND_CAPACITY`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CommandFormatError;

impl Command {
    /// The LOOP + LOOP2 pair the snapshot needs.
    pub const LIVE_PAIR: Command = Command::LoopPackets {
        mask: LOOP_MASK_LOOP | LOOP_MASK_LOOP2,
        count: 2,
    };

    /// Formats the command line into a fixed-capacity buffer.
    pub fn format_into(&self) -> Result<ArrayString<COMMAND_CAPACITY>, CommandFormatError> {
        let mut buffer = ArrayString::<COMMAND_CAPACITY>::new();
        write!(buffer, "{}", self).map_err(|_| CommandFormatError)?;
        Ok(buffer)
    }

    /// Whether the console sends a lone ACK byte before the binary reply.
    ///
    /// `GETTIME` also starts with an ACK, but it is part of the 9-byte clock record.
    pub fn expects_ack(&self) -> bool {
        matches!(self, Command::LoopPackets { .. } | Command::HiLows)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Wake => f.write_str("\n"),
            Command::FirmwareDate => f.write_str("VER\n"),
            Command::FirmwareVersion => f.write_str("NVER\n"),
            Command::GetTime => f.write_str("GETTIME\n"),
            Command::LoopPackets { mask, count } => writeln!(f, "LPS {} {}", mask, count),
            Command::HiLows => f.write_str("HILOWS\n"),
        }
    }
}
