use crate::CYCLE_LENGTH;

// Tone cycle tables (8-bit unsigned, 22050 Hz)
//
// Both tables span the same 18 samples:
// - LOW: one full period (~1225 Hz), encodes a 0 bit
// - HIGH: two full periods (~2450 Hz), encodes a 1 bit
//
// Every period reaches 255 and then 0 exactly once. The decoder relies on this
// geometry, so the tables must never be resampled or scaled.

/// One period of the low tone
const LOW_CYCLE: [u8; CYCLE_LENGTH] = [
    155, 193, 217, 232, 242, 249, 252, 255, 160, 100, 62, 38, 23, 13, 6, 3, 0, 95,
];

/// Two periods of the high tone
const HIGH_CYCLE: [u8; CYCLE_LENGTH] = [
    157, 220, 245, 255, 151, 85, 43, 17, 0, 157, 220, 245, 255, 151, 85, 43, 17, 0,
];

/// Tone variant of one 18-sample cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    Low,
    High,
}

impl Cycle {
    /// `true` bits are carried by the high tone, `false` bits by the low tone
    pub const fn for_bit(bit: bool) -> Self {
        if bit {
            Cycle::High
        } else {
            Cycle::Low
        }
    }

    pub const fn bit(self) -> bool {
        matches!(self, Cycle::High)
    }

    pub const fn samples(self) -> &'static [u8; CYCLE_LENGTH] {
        match self {
            Cycle::Low => &LOW_CYCLE,
            Cycle::High => &HIGH_CYCLE,
        }
    }

    /// Number of top-to-zero periods the variant contains
    pub const fn periods(self) -> usize {
        match self {
            Cycle::Low => 1,
            Cycle::High => 2,
        }
    }
}
