// src/common/packet/clock.rs

use super::{check_len, ACK, CLOCK_RECORD_LEN};
use crate::common::crc::{calculate_crc16, decode_crc_binary};
use crate::common::error::DecodeError;

/// Decodes the 9-byte `GETTIME` reply into `YYYY-MM-DD HH:MM:SS`.
///
/// Layout: ACK, then second, minute, hour, day, month, years since 1900,
/// then the big-endian CRC of those six bytes. Field ranges are not checked.
pub fn decode_console_time(record: &[u8]) -> Result<String, DecodeError> {
    check_len(record, CLOCK_RECORD_LEN)?;
    if record[0] != ACK {
        return Err(DecodeError::MissingAck);
    }

    let fields = &record[1..7];
    let received = decode_crc_binary(&record[7..9]);
    let calculated = calculate_crc16(fields);
    if received != calculated {
        return Err(DecodeError::CrcMismatch { expected: received, calculated });
    }

    let [second, minute, hour, day, month, year_offset] = [
        fields[0], fields[1], fields[2], fields[3], fields[4], fields[5],
    ];
    let year = 1900 + year_offset as u16;

    Ok(format!(
        "{}-{:02}-{:02} {:02}:{:02}:{:02}",
        year, month, day, hour, minute, second
    ))
}
