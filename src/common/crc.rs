// src/common/crc.rs

use super::error::DecodeError;
use crc::{Algorithm, Crc};

/// A CRC value as computed by [`calculate_crc16`] or read off the wire.
pub type CrcValue = u16;

/// CRC algorithm used by the Vantage console (CRC-CCITT, CRC-16/XMODEM variant).
/// Polynomial: 0x1021
/// Initial Value: 0x0000
/// Input Reflected: false
/// Output Reflected: false
/// Final XOR: 0x0000
/// Check Value: 0x31C3 (for "123456789")
/// Residue: 0x0000
pub const VANTAGE_CRC: Algorithm<u16> = Algorithm {
    width: 16,
    poly: 0x1021,
    init: 0x0000,
    refin: false,
    refout: false,
    xorout: 0x0000,
    check: 0x31C3,
    residue: 0x0000,
};

// The 256-entry table is built at compile time.
const CRC_COMPUTER: Crc<u16> = Crc::<u16>::new(&VANTAGE_CRC);

/// Calculates the console CRC-16 over `data`.
///
/// Equivalent to running `crc = table[(crc >> 8) ^ byte] ^ (crc << 8)` from
/// zero across every byte. The console sends this value big-endian right
/// after the bytes it covers.
#[inline]
pub fn calculate_crc16(data: &[u8]) -> CrcValue {
    CRC_COMPUTER.checksum(data)
}

/// Encodes a CRC into the two big-endian bytes the console puts on the wire.
pub fn encode_crc_binary(crc_value: CrcValue) -> [u8; 2] {
    crc_value.to_be_bytes()
}

/// Decodes the two trailing big-endian CRC bytes of a record.
///
/// # Panics
///
/// Panics if `crc_bytes` does not have a length of exactly 2.
pub fn decode_crc_binary(crc_bytes: &[u8]) -> CrcValue {
    assert_eq!(crc_bytes.len(), 2, "Binary CRC must be 2 bytes long");
    u16::from_be_bytes([crc_bytes[0], crc_bytes[1]])
}

/// Verifies a record whose last two bytes are the big-endian CRC of everything before them.
///
/// # Returns
///
/// * `Ok(())` if the CRC is valid.
/// * `Err(DecodeError::LengthMismatch)` if there is no room for a CRC.
/// * `Err(DecodeError::CrcMismatch)` if the CRCs don't match.
pub fn verify_packet_crc_binary(packet_with_crc: &[u8]) -> Result<(), DecodeError> {
    if packet_with_crc.len() < 2 {
        return Err(DecodeError::LengthMismatch { expected: 2, got: packet_with_crc.len() });
    }
    let data_len = packet_with_crc.len() - 2;
    let data_part = &packet_with_crc[..data_len];
    let received_crc = decode_crc_binary(&packet_with_crc[data_len..]);

    let calculated_crc = calculate_crc16(data_part);

    if calculated_crc == received_crc {
        Ok(())
    } else {
        Err(DecodeError::CrcMismatch { expected: received_crc, calculated: calculated_crc })
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_value() {
        assert_eq!(calculate_crc16(b"123456789"), 0x31C3);
    }

    #[test]
    fn test_empty_input_is_zero() {
        assert_eq!(calculate_crc16(&[]), 0x0000);
    }

    #[test]
    fn test_single_bytes_match_table_entries() {
        // With a zero accumulator the result is table[byte].
        assert_eq!(calculate_crc16(&[0x00]), 0x0000);
        assert_eq!(calculate_crc16(&[0x01]), 0x1021);
        assert_eq!(calculate_crc16(&[0x02]), 0x2042);
        assert_eq!(calculate_crc16(&[0x10]), 0x1231);
        assert_eq!(calculate_crc16(&[0x80]), 0x9188);
        assert_eq!(calculate_crc16(&[0xFF]), 0x1EF0);
    }

    #[test]
    fn test_matches_table_loop() {
        // Bitwise reference for the table-driven update.
        fn reference(data: &[u8]) -> u16 {
            let mut crc: u16 = 0;
            for &byte in data {
                crc ^= (byte as u16) << 8;
                for _ in 0..8 {
                    crc = if crc & 0x8000 != 0 { (crc << 1) ^ 0x1021 } else { crc << 1 };
                }
            }
            crc
        }
        let samples: [&[u8]; 4] = [b"LOO", b"\x06\x1e\x0c\x11\x05\x7c", &[0xAA; 97], b"Vantage"];
        for sample in samples {
            assert_eq!(calculate_crc16(sample), reference(sample));
        }
    }

    #[test]
    fn test_appended_crc_yields_zero_residue() {
        let data = b"some console payload";
        let mut packet = data.to_vec();
        packet.extend_from_slice(&encode_crc_binary(calculate_crc16(data)));
        assert_eq!(calculate_crc16(&packet), 0x0000);
        assert!(verify_packet_crc_binary(&packet).is_ok());
    }

    #[test]
    fn test_crc_is_big_endian_on_the_wire() {
        assert_eq!(encode_crc_binary(0x31C3), [0x31, 0xC3]);
        assert_eq!(decode_crc_binary(&[0x31, 0xC3]), 0x31C3);
    }

    #[test]
    fn test_verify_binary_crc_invalid_cases() {
        let data = b"123456789";
        let mut packet_bad_crc = data.to_vec();
        packet_bad_crc.extend_from_slice(&[0x31, 0xC4]);
        assert_eq!(
            verify_packet_crc_binary(&packet_bad_crc),
            Err(DecodeError::CrcMismatch { expected: 0x31C4, calculated: 0x31C3 })
        );

        let mut packet_bad_data = b"123456788".to_vec();
        packet_bad_data.extend_from_slice(&[0x31, 0xC3]);
        assert!(matches!(verify_packet_crc_binary(&packet_bad_data), Err(DecodeError::CrcMismatch { .. })));

        assert!(matches!(verify_packet_crc_binary(&[0x31]), Err(DecodeError::LengthMismatch { .. })));
        assert!(matches!(verify_packet_crc_binary(b""), Err(DecodeError::LengthMismatch { .. })));
    }

    #[test]
    #[should_panic]
    fn test_decode_binary_panic_short() { decode_crc_binary(&[0xC2]); }
    #[test]
    #[should_panic]
    fn test_decode_binary_panic_long() { decode_crc_binary(&[0xC2, 0xAC, 0x00]); }
}
