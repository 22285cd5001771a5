use crate::error::{KcsError, Result};
use crate::parity::ParityMode;
use crate::{BASE_BAUD, CYCLES_PER_SECOND, CYCLE_LENGTH, MAX_DATA_BITS, MIN_DATA_BITS};

/// Line code parameters shared by one encode or decode call
///
/// Both ends must use identical parameters; nothing about them is carried in
/// the waveform itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CodecParams {
    /// Bit periods per second (300, 600 or 1200)
    pub baud: u32,
    /// Data bits per frame, least significant first (7 or 8)
    pub data_bits: u8,
    /// Stop bits per frame (1 or 2)
    pub stop_bits: u8,
    /// Start bits per frame
    pub start_bits: u8,
    pub parity: ParityMode,
    /// Carrier tone before and after the frames, in seconds (0 disables it)
    pub leader_seconds: f64,
}

impl Default for CodecParams {
    fn default() -> Self {
        Self {
            baud: 300,
            data_bits: 8,
            stop_bits: 2,
            start_bits: 1,
            parity: ParityMode::None,
            leader_seconds: 0.0,
        }
    }
}

impl CodecParams {
    /// Reject parameter combinations the line code cannot represent
    pub fn validate(&self) -> Result<()> {
        if self.baud == 0 || self.baud > BASE_BAUD || BASE_BAUD % self.baud != 0 {
            return Err(KcsError::InvalidBaud(self.baud));
        }
        if !(MIN_DATA_BITS..=MAX_DATA_BITS).contains(&self.data_bits) {
            return Err(KcsError::InvalidDataBits(self.data_bits));
        }
        if !(1..=2).contains(&self.stop_bits) {
            return Err(KcsError::InvalidStopBits(self.stop_bits));
        }
        if self.start_bits == 0 {
            return Err(KcsError::InvalidStartBits(self.start_bits));
        }
        self.leader_cycles()?;
        Ok(())
    }

    /// Cycles per bit period: 1200 / baud
    pub fn cycles_per_bit(&self) -> usize {
        (BASE_BAUD / self.baud.max(1)) as usize
    }

    pub fn samples_per_bit(&self) -> usize {
        self.cycles_per_bit() * CYCLE_LENGTH
    }

    /// Bit periods in one frame
    pub fn frame_bits(&self) -> usize {
        self.start_bits as usize
            + self.data_bits as usize
            + self.parity.is_enabled() as usize
            + self.stop_bits as usize
    }

    /// HIGH cycles in each of the leading and trailing leaders
    ///
    /// The leader is shortened by one bit period so that a whole number of
    /// seconds of carrier plus the first start bit lines up on the cycle grid.
    pub fn leader_cycles(&self) -> Result<usize> {
        let seconds = self.leader_seconds;
        if !seconds.is_finite() || seconds < 0.0 {
            return Err(KcsError::InvalidLeader(seconds));
        }
        if seconds == 0.0 {
            return Ok(0);
        }

        // Both leaders together must still be addressable as a sample count
        let max_cycles = usize::MAX / (2 * CYCLE_LENGTH);
        let cycles = (seconds * CYCLES_PER_SECOND as f64).floor();
        if cycles > max_cycles as f64 {
            return Err(KcsError::InvalidLeader(seconds));
        }

        let cycles = cycles as usize;
        cycles
            .checked_sub(self.cycles_per_bit())
            .ok_or(KcsError::LeaderTooShort { seconds, cycles })
    }

    /// Exact number of samples the encoder emits for `data_len` bytes
    pub fn encoded_samples(&self, data_len: usize) -> Result<usize> {
        let leader = self.leader_cycles()? * CYCLE_LENGTH;
        data_len
            .checked_mul(self.frame_bits() * self.samples_per_bit())
            .and_then(|frames| frames.checked_add(2 * leader))
            .ok_or(KcsError::OutputTooLarge { data_len })
    }

    /// Whether bytes lose their most significant bit on the wire
    pub fn drops_msb(&self) -> bool {
        self.data_bits < 8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params_are_valid() {
        let params = CodecParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.cycles_per_bit(), 4);
        assert_eq!(params.frame_bits(), 11);
    }

    #[test]
    fn test_cycles_per_bit_by_baud() {
        for (baud, cycles) in [(300, 4), (600, 2), (1200, 1)] {
            let params = CodecParams { baud, ..Default::default() };
            assert_eq!(params.cycles_per_bit(), cycles);
            assert_eq!(params.samples_per_bit(), cycles * CYCLE_LENGTH);
        }
    }

    #[test]
    fn test_rejects_baud_not_dividing_1200() {
        for baud in [0, 350, 500, 2400] {
            let params = CodecParams { baud, ..Default::default() };
            assert!(matches!(params.validate(), Err(KcsError::InvalidBaud(b)) if b == baud));
        }
    }

    #[test]
    fn test_rejects_bad_bit_counts() {
        let params = CodecParams { data_bits: 6, ..Default::default() };
        assert!(matches!(params.validate(), Err(KcsError::InvalidDataBits(6))));

        let params = CodecParams { stop_bits: 3, ..Default::default() };
        assert!(matches!(params.validate(), Err(KcsError::InvalidStopBits(3))));

        let params = CodecParams { start_bits: 0, ..Default::default() };
        assert!(matches!(params.validate(), Err(KcsError::InvalidStartBits(0))));
    }

    #[test]
    fn test_leader_cycles() {
        let params = CodecParams { leader_seconds: 1.0, ..Default::default() };
        assert_eq!(params.leader_cycles().unwrap(), CYCLES_PER_SECOND - 4);

        let params = CodecParams { leader_seconds: 0.5, baud: 1200, ..Default::default() };
        assert_eq!(params.leader_cycles().unwrap(), 612 - 1);

        let params = CodecParams { leader_seconds: 0.0, ..Default::default() };
        assert_eq!(params.leader_cycles().unwrap(), 0);
    }

    #[test]
    fn test_rejects_bad_leader() {
        let params = CodecParams { leader_seconds: -1.0, ..Default::default() };
        assert!(matches!(params.validate(), Err(KcsError::InvalidLeader(_))));

        let params = CodecParams { leader_seconds: f64::NAN, ..Default::default() };
        assert!(matches!(params.validate(), Err(KcsError::InvalidLeader(_))));

        // 0.002s is two cycles, shorter than a 4-cycle bit period
        let params = CodecParams { leader_seconds: 0.002, ..Default::default() };
        assert!(matches!(
            params.validate(),
            Err(KcsError::LeaderTooShort { cycles: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_leader_overflowing_sample_count() {
        let params = CodecParams { leader_seconds: 1e16, ..Default::default() };
        assert!(matches!(params.validate(), Err(KcsError::InvalidLeader(_))));
        assert!(matches!(params.encoded_samples(1), Err(KcsError::InvalidLeader(_))));

        let params = CodecParams { leader_seconds: f64::MAX, ..Default::default() };
        assert!(matches!(params.leader_cycles(), Err(KcsError::InvalidLeader(_))));
    }

    #[test]
    fn test_encoded_samples_overflow() {
        let params = CodecParams::default();
        assert!(matches!(
            params.encoded_samples(usize::MAX / 2),
            Err(KcsError::OutputTooLarge { .. })
        ));
    }

    #[test]
    fn test_encoded_samples() {
        let params = CodecParams::default();
        assert_eq!(params.encoded_samples(1).unwrap(), 11 * 4 * CYCLE_LENGTH);

        let params = CodecParams { parity: ParityMode::Odd, leader_seconds: 1.0, ..Default::default() };
        let leader = (CYCLES_PER_SECOND - 4) * CYCLE_LENGTH;
        assert_eq!(params.encoded_samples(3).unwrap(), 2 * leader + 3 * 12 * 4 * CYCLE_LENGTH);
    }
}
