// src/common/packet/mod.rs

//! Validation and decoding of the console's binary records.
//!
//! A record is decoded in two steps. First the raw bytes are checked
//! (length, `LOO` tag, record-type byte, trailing big-endian CRC) and wrapped
//! in a [`ValidatedPacket`]. Only then are fields read from fixed offsets,
//! each one independently mapped from its "no data" sentinel to `None` and
//! converted to metric.

mod clock;
mod hilow;
mod loop2_record;
mod loop_record;

pub use clock::decode_console_time;
pub use hilow::HiLowRecord;
pub use loop2_record::Loop2Record;
pub use loop_record::LoopRecord;

use super::crc::verify_packet_crc_binary;
use super::error::DecodeError;

/// Acknowledge byte sent by the console after accepting a command.
pub const ACK: u8 = 0x06;

/// Length of a LOOP or LOOP2 record including its CRC.
pub const LOOP_PACKET_LEN: usize = 99;
/// Length of the HILOWS record including its CRC.
pub const HILOW_PACKET_LEN: usize = 438;
/// Length of the HILOWS payload covered by the CRC.
pub const HILOW_PAYLOAD_LEN: usize = HILOW_PACKET_LEN - CRC_LEN;
/// Length of the GETTIME reply: ACK, six time fields, CRC.
pub const CLOCK_RECORD_LEN: usize = 9;

/// Tag every LOOP/LOOP2 record starts with.
pub const LOOP_TAG: &[u8; 3] = b"LOO";
/// Offset of the record-type byte in a LOOP/LOOP2 record.
pub const PACKET_TYPE_OFFSET: usize = 4;

const CRC_LEN: usize = 2;

// --- Sentinels ---

/// "No data" for signed 16-bit measurements (temperatures, indices).
pub const NO_DATA_I16: i16 = 32767;
/// "No data" for unsigned 16-bit high-resolution wind speeds.
pub const NO_DATA_U16: u16 = 32767;
/// "No data" for 8-bit percentages.
pub const NO_DATA_U8: u8 = 255;
/// "No data" for raw barometer readings.
pub const NO_DATA_BAROMETER: u16 = 0;

/// Record-type discriminator of a live-data record.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u8)]
pub enum LoopKind {
    Loop = 0,
    Loop2 = 1,
}

/// Bytes of a record that passed length, tag, type and CRC validation.
///
/// Holds the CRC-covered part of the record; offsets used by the field
/// readers are relative to the start of the record.
#[derive(Debug, Copy, Clone)]
pub struct ValidatedPacket<'a> {
    payload: &'a [u8],
}

impl<'a> ValidatedPacket<'a> {
    /// Validates a 99-byte LOOP or LOOP2 record.
    pub fn loop_packet(packet: &'a [u8], kind: LoopKind) -> Result<Self, DecodeError> {
        check_len(packet, LOOP_PACKET_LEN)?;
        if &packet[..LOOP_TAG.len()] != LOOP_TAG {
            return Err(DecodeError::InvalidTag);
        }
        let packet_type = packet[PACKET_TYPE_OFFSET];
        if packet_type != kind as u8 {
            return Err(DecodeError::PacketTypeMismatch { expected: kind as u8, got: packet_type });
        }
        Self::with_trailing_crc(packet)
    }

    /// Validates the 438-byte HILOWS record. It carries no tag; length and CRC are all there is.
    pub fn hilow_packet(packet: &'a [u8]) -> Result<Self, DecodeError> {
        check_len(packet, HILOW_PACKET_LEN)?;
        Self::with_trailing_crc(packet)
    }

    fn with_trailing_crc(packet: &'a [u8]) -> Result<Self, DecodeError> {
        verify_packet_crc_binary(packet)?;
        Ok(ValidatedPacket { payload: &packet[..packet.len() - CRC_LEN] })
    }

    /// The CRC-covered bytes.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    fn field<const N: usize>(&self, offset: usize) -> Result<[u8; N], DecodeError> {
        self.payload
            .get(offset..offset + N)
            .and_then(|bytes| bytes.try_into().ok())
            .ok_or(DecodeError::FieldOutOfBounds { offset, width: N })
    }

    /// 1-byte unsigned field.
    pub fn u8_at(&self, offset: usize) -> Result<u8, DecodeError> {
        self.field::<1>(offset).map(|[b]| b)
    }

    /// 2-byte signed little-endian field.
    pub fn i16_at(&self, offset: usize) -> Result<i16, DecodeError> {
        self.field::<2>(offset).map(i16::from_le_bytes)
    }

    /// 2-byte unsigned little-endian field.
    pub fn u16_at(&self, offset: usize) -> Result<u16, DecodeError> {
        self.field::<2>(offset).map(u16::from_le_bytes)
    }
}

fn check_len(packet: &[u8], expected: usize) -> Result<(), DecodeError> {
    if packet.len() != expected {
        return Err(DecodeError::LengthMismatch { expected, got: packet.len() });
    }
    Ok(())
}

/// `None` when `raw` is the field's "no data" encoding.
#[inline]
pub(crate) fn present<T: PartialEq>(raw: T, sentinel: T) -> Option<T> {
    if raw == sentinel { None } else { Some(raw) }
}

// --- Test Helpers ---

/// Builders for well-formed records, shared by the decoder and session tests.
#[cfg(test)]
pub(crate) mod testutil {
    use super::*;
    use crate::common::crc::{calculate_crc16, encode_crc_binary};

    pub fn put_u16(buf: &mut [u8], offset: usize, value: u16) {
        buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    pub fn put_i16(buf: &mut [u8], offset: usize, value: i16) {
        buf[offset..offset + 2].copy_from_slice(&value.to_le_bytes());
    }

    /// Recomputes the trailing CRC in place.
    pub fn seal(buf: &mut [u8]) {
        let data_len = buf.len() - CRC_LEN;
        let crc = calculate_crc16(&buf[..data_len]);
        buf[data_len..].copy_from_slice(&encode_crc_binary(crc));
    }

    /// A LOOP/LOOP2 record with every field zeroed, then filled by `fill`.
    pub fn loop_packet(kind: LoopKind, fill: impl FnOnce(&mut [u8])) -> [u8; LOOP_PACKET_LEN] {
        let mut buf = [0u8; LOOP_PACKET_LEN];
        buf[..3].copy_from_slice(LOOP_TAG);
        buf[3] = b'P';
        buf[PACKET_TYPE_OFFSET] = kind as u8;
        fill(&mut buf);
        buf[95] = b'\n';
        buf[96] = b'\r';
        seal(&mut buf);
        buf
    }

    /// A `GETTIME` reply for the given second, minute, hour, day, month, year-1900.
    pub fn clock_record(fields: [u8; 6]) -> [u8; CLOCK_RECORD_LEN] {
        let mut record = [0u8; CLOCK_RECORD_LEN];
        record[0] = ACK;
        record[1..7].copy_from_slice(&fields);
        record[7..9].copy_from_slice(&encode_crc_binary(calculate_crc16(&fields)));
        record
    }

    /// A HILOWS record with every field zeroed, then filled by `fill`.
    pub fn hilow_packet(fill: impl FnOnce(&mut [u8])) -> [u8; HILOW_PACKET_LEN] {
        let mut buf = [0u8; HILOW_PACKET_LEN];
        fill(&mut buf);
        seal(&mut buf);
        buf
    }
}
