// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod crc;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod packet;
pub mod timing;
pub mod units;

// --- Re-export key types/traits/functions for easier access ---

// From command.rs
pub use command::{Command, CommandFormatError};

// From crc.rs
pub use crc::{calculate_crc16, decode_crc_binary, encode_crc_binary, verify_packet_crc_binary, CrcValue};

// From error.rs
pub use error::{DecodeError, VantageError};

// From frame.rs
pub use frame::LinkSettings;

// From hal_traits.rs
pub use hal_traits::{VantageInstant, VantageSerial, VantageTimer};

// From packet/mod.rs
pub use packet::{decode_console_time, HiLowRecord, Loop2Record, LoopKind, LoopRecord, ValidatedPacket};
