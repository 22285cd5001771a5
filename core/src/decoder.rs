use crate::config::CodecParams;
use crate::error::{KcsError, Result};
use crate::sample::{self, Sample};
use crate::CYCLE_LENGTH;

/// Outcome of one decode call
///
/// Parity mismatches, bad stop bits and truncation are in-stream anomalies:
/// they are reported here alongside the data rather than failing the call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodeReport {
    pub data: Vec<u8>,
    /// Frames whose parity bit disagreed with the data bits (0 without parity)
    pub parity_errors: usize,
    /// Stop bit periods that classified as 0
    pub stop_bit_errors: usize,
    /// The buffer ended before the last frame's stop bits were read
    pub stop_bit_clipped: bool,
    /// The buffer ended inside a frame's start, data or parity bits
    pub truncated_frame: bool,
    /// Sample index of the first start bit, `None` when only carrier was found
    pub sync_offset: Option<usize>,
    /// Leader cycles consumed before the first start bit
    pub leader_cycles: usize,
}

/// Kansas City Standard decoder
///
/// Bits are recovered by counting top-to-zero transitions in each bit period:
/// a period holding exactly twice as many transitions as cycles is a 1, any
/// other count is a 0. The decision is exact, so it assumes the clean
/// synthetic geometry produced by the encoder at 22050 Hz; noisy, resampled
/// or drifted recordings are silently misclassified.
#[derive(Debug, Clone)]
pub struct Decoder {
    params: CodecParams,
}

impl Decoder {
    pub fn new(params: CodecParams) -> Result<Self> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &CodecParams {
        &self.params
    }

    /// Decode every sample of `samples`
    pub fn decode<S: Sample>(&self, samples: &[S]) -> DecodeReport {
        log::debug!("Decoding {} samples of {} byte(s)", samples.len(), S::WIDTH);
        self.decode_with_total(samples, samples.len())
    }

    /// Decode the first `total_samples` samples of `samples`
    pub fn decode_with_total<S: Sample>(&self, samples: &[S], total_samples: usize) -> DecodeReport {
        let samples = &samples[..total_samples.min(samples.len())];
        let report = self.run(samples);

        if report.parity_errors > 0 {
            log::warn!("{} parity error(s) detected", report.parity_errors);
        }
        if report.stop_bit_errors > 0 {
            log::warn!("{} stop bit(s) read as 0", report.stop_bit_errors);
        }
        log::debug!(
            "Decoded {} bytes after {} leader cycles",
            report.data.len(),
            report.leader_cycles
        );
        report
    }

    /// Decode a raw little-endian buffer of unsigned samples `sample_width`
    /// bytes wide
    pub fn decode_bytes(
        &self,
        buffer: &[u8],
        total_samples: usize,
        sample_width: usize,
    ) -> Result<DecodeReport> {
        if !matches!(sample_width, 1 | 2 | 4) {
            return Err(KcsError::InvalidSampleWidth(sample_width));
        }
        let expected = total_samples
            .checked_mul(sample_width)
            .ok_or(KcsError::BufferTooLarge { total_samples, sample_width })?;
        if buffer.len() < expected {
            return Err(KcsError::InsufficientData {
                expected,
                actual: buffer.len(),
            });
        }

        let buffer = &buffer[..expected];
        let report = match sample_width {
            1 => self.decode(buffer),
            2 => self.decode(&sample::from_le_bytes::<2, u16>(buffer, u16::from_le_bytes)),
            _ => self.decode(&sample::from_le_bytes::<4, u32>(buffer, u32::from_le_bytes)),
        };
        Ok(report)
    }

    fn run<S: Sample>(&self, samples: &[S]) -> DecodeReport {
        let mut report = DecodeReport::default();
        let mut reader = BitReader::new(samples);
        let cycles_per_bit = self.params.cycles_per_bit();
        let period = self.params.samples_per_bit();

        // The trailing leader mirrors the leading one, so every carrier cycle
        // skipped here also moves the end of the data back by one cycle.
        let mut end = samples.len();
        loop {
            if !reader.has(CYCLE_LENGTH) {
                // Carrier with no frames is a valid empty recording
                if report.leader_cycles > 0 {
                    log::debug!("Carrier only: no start bit after {} leader cycles", report.leader_cycles);
                } else {
                    log::warn!("No start bit found in {} samples", samples.len());
                }
                return report;
            }
            if reader.read_bit(1) {
                end = end.saturating_sub(CYCLE_LENGTH);
                report.leader_cycles += 1;
            } else {
                reader.rewind(CYCLE_LENGTH);
                break;
            }
        }
        report.sync_offset = Some(reader.position());
        log::debug!("First start bit at sample {}", reader.position());

        'frames: while reader.position() < end {
            for _ in 0..self.params.start_bits {
                if !reader.has(period) {
                    report.truncated_frame = true;
                    break 'frames;
                }
                reader.read_bit(cycles_per_bit);
            }

            let mut byte = 0u8;
            for i in 0..self.params.data_bits {
                if reader.position() >= end || !reader.has(period) {
                    report.truncated_frame = true;
                    break 'frames;
                }
                byte |= (reader.read_bit(cycles_per_bit) as u8) << i;
            }
            report.data.push(byte);

            if self.params.parity.is_enabled() {
                if !reader.has(period) {
                    report.truncated_frame = true;
                    break 'frames;
                }
                let parity_bit = reader.read_bit(cycles_per_bit);
                if !self.params.parity.check(byte, parity_bit) {
                    report.parity_errors += 1;
                }
            }

            for _ in 0..self.params.stop_bits {
                if reader.position() >= end || !reader.has(period) {
                    log::warn!("Stop bit clipped at sample {}", reader.position());
                    report.stop_bit_clipped = true;
                    break 'frames;
                }
                if !reader.read_bit(cycles_per_bit) {
                    report.stop_bit_errors += 1;
                }
            }
        }

        if report.truncated_frame {
            log::warn!(
                "Input ended inside a frame at sample {}, partial frame dropped",
                reader.position()
            );
        }
        report
    }
}

/// Sequential cursor over a borrowed sample buffer
struct BitReader<'a, S> {
    samples: &'a [S],
    cursor: usize,
}

impl<'a, S: Sample> BitReader<'a, S> {
    fn new(samples: &'a [S]) -> Self {
        Self { samples, cursor: 0 }
    }

    fn position(&self) -> usize {
        self.cursor
    }

    fn has(&self, len: usize) -> bool {
        self.samples.len() - self.cursor >= len
    }

    fn rewind(&mut self, len: usize) {
        self.cursor -= len;
    }

    /// Read one bit period of `cycles` cycles; callers check `has` first
    fn read_bit(&mut self, cycles: usize) -> bool {
        let len = cycles * CYCLE_LENGTH;
        let window = &self.samples[self.cursor..self.cursor + len];
        self.cursor += len;
        classify(window, cycles)
    }
}

/// Envelope classification of one bit period
///
/// A sample at the width's maximum arms the detector; the next zero sample
/// completes one cycle and disarms it.
pub fn classify<S: Sample>(window: &[S], cycles: usize) -> bool {
    let mut armed = false;
    let mut completed = 0;
    for &s in window {
        if s == S::TOP {
            armed = true;
        }
        if s == S::ZERO && armed {
            completed += 1;
            armed = false;
        }
    }
    completed == 2 * cycles
}
