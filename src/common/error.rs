// src/common/error.rs

/// Errors raised while talking to the console over a link whose I/O error type is `E`.
#[derive(Debug, thiserror::Error)]
pub enum VantageError<E = ()>
where
    E: core::fmt::Debug,
{
    /// Underlying I/O error from the link implementation.
    #[error("I/O error: {0:?}")]
    Io(E),

    /// A write or flush did not complete in time.
    #[error("Operation timed out")]
    Timeout,

    /// The console never answered the wake-up probe.
    #[error("Failed to wake up console after {attempts} attempts")]
    HandshakeFailed { attempts: u8 },

    /// A command was issued before the wake-up handshake succeeded.
    #[error("Console is not awake")]
    NotAwake,

    /// The console did not answer a command with the ACK byte.
    #[error("Command not acknowledged: expected 0x06, got {received:?}")]
    NotAcknowledged { received: Option<u8> },

    /// Fewer bytes than the reply format requires arrived before the timeout.
    #[error("Short read: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },

    /// An ASCII reply did not contain the `OK` marker.
    #[error("Reply is missing the OK delimiter")]
    MissingDelimiter,

    /// An ASCII reply was not valid text.
    #[error("Reply is not valid ASCII text")]
    InvalidText,

    /// A command line did not fit the command buffer.
    #[error("Command formatting failed")]
    CommandFormat,

    /// A reply failed validation or decoding.
    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),
}

impl<E: core::fmt::Debug> VantageError<E> {
    /// Whether this error ends the whole session.
    ///
    /// Link failures and an unreachable console are fatal; everything else
    /// only fails the fetch or decode that raised it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, VantageError::Io(_) | VantageError::HandshakeFailed { .. })
    }
}

/// Errors raised while validating or decoding a binary record.
#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The record does not have the length its format requires.
    #[error("Length mismatch: expected {expected} bytes, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    /// A LOOP record did not start with `LOO`.
    #[error("Missing LOO tag")]
    InvalidTag,

    /// The record-type byte did not match the decoder.
    #[error("Packet type mismatch: expected {expected}, got {got}")]
    PacketTypeMismatch { expected: u8, got: u8 },

    /// Received CRC does not match calculated CRC.
    #[error("CRC mismatch: expected {expected:#06x}, calculated {calculated:#06x}")]
    CrcMismatch { expected: u16, calculated: u16 },

    /// A fixed-offset field extends past the validated payload.
    #[error("Field at offset {offset} ({width} bytes) is out of bounds")]
    FieldOutOfBounds { offset: usize, width: usize },

    /// A reply that must start with the ACK byte did not.
    #[error("Missing ACK byte")]
    MissingAck,
}
