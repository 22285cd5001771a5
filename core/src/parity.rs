use std::fmt;
use std::str::FromStr;

/// Population count of every byte value, used for parity
pub const BIT_COUNT: [u8; 256] = build_bit_count();

const fn build_bit_count() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = (i as u8).count_ones() as u8;
        i += 1;
    }
    table
}

/// Parity bit appended after the data bits of each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParityMode {
    #[default]
    None,
    Odd,
    Even,
}

impl ParityMode {
    pub fn is_enabled(self) -> bool {
        self != ParityMode::None
    }

    /// Parity bit to transmit for `byte`, or `None` when parity is disabled
    ///
    /// Odd parity makes the total set-bit count of byte + parity odd, even
    /// parity makes it even.
    pub fn parity_bit(self, byte: u8) -> Option<bool> {
        let ones = BIT_COUNT[byte as usize];
        match self {
            ParityMode::None => None,
            ParityMode::Odd => Some(ones % 2 == 0),
            ParityMode::Even => Some(ones % 2 == 1),
        }
    }

    /// Whether a received parity bit agrees with the received byte
    pub fn check(self, byte: u8, parity_bit: bool) -> bool {
        let total = BIT_COUNT[byte as usize] + parity_bit as u8;
        match self {
            ParityMode::None => true,
            ParityMode::Odd => total % 2 == 1,
            ParityMode::Even => total % 2 == 0,
        }
    }
}

impl fmt::Display for ParityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ParityMode::None => "none",
            ParityMode::Odd => "odd",
            ParityMode::Even => "even",
        };
        f.write_str(name)
    }
}

impl FromStr for ParityMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" | "n" => Ok(ParityMode::None),
            "odd" | "o" => Ok(ParityMode::Odd),
            "even" | "e" => Ok(ParityMode::Even),
            other => Err(format!("unknown parity mode '{}'", other)),
        }
    }
}
