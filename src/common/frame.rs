// src/common/frame.rs

/// Serial line settings spoken by the console: 19200 baud, 8 data bits, no parity, 1 stop bit.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LinkSettings {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub stop_bits: u8,
    pub parity: bool,
}

impl LinkSettings {
    pub const DEFAULT_BAUD: u32 = 19_200;

    /// 8N1 at the given baud rate.
    pub const fn eight_n_one(baud_rate: u32) -> Self {
        LinkSettings { baud_rate, data_bits: 8, stop_bits: 1, parity: false }
    }
}

impl Default for LinkSettings {
    fn default() -> Self {
        Self::eight_n_one(Self::DEFAULT_BAUD)
    }
}
