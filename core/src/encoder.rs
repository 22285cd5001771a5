use crate::config::CodecParams;
use crate::cycle::Cycle;
use crate::error::Result;
use crate::CYCLE_LENGTH;

/// Append-only destination for 8-bit unsigned mono samples
pub trait SampleSink {
    fn write_samples(&mut self, samples: &[u8]) -> Result<()>;
}

impl SampleSink for Vec<u8> {
    fn write_samples(&mut self, samples: &[u8]) -> Result<()> {
        self.extend_from_slice(samples);
        Ok(())
    }
}

/// Kansas City Standard encoder
///
/// Output layout: leader + (start, data, parity, stop bits per byte) + leader.
/// Every bit period is a run of identical 18-sample cycles, so the output
/// length is always a multiple of the cycle length.
#[derive(Debug, Clone)]
pub struct Encoder {
    params: CodecParams,
    leader_cycles: usize,
}

impl Encoder {
    pub fn new(params: CodecParams) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            leader_cycles: params.leader_cycles()?,
            params,
        })
    }

    pub fn params(&self) -> &CodecParams {
        &self.params
    }

    /// Encode binary data into 8-bit unsigned samples
    pub fn encode(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut samples = Vec::with_capacity(self.params.encoded_samples(data.len())?);
        self.encode_into(data, &mut samples)?;
        Ok(samples)
    }

    /// Stream the encoded waveform into `sink`, returning the sample count
    pub fn encode_into<S: SampleSink + ?Sized>(&self, data: &[u8], sink: &mut S) -> Result<usize> {
        if self.params.drops_msb() {
            let clipped = data.iter().filter(|&&b| b & 0x80 != 0).count();
            if clipped > 0 {
                log::warn!(
                    "7 data bits: the most significant bit of {} byte(s) will be lost (11111111 -> 01111111)",
                    clipped
                );
            }
        }

        let mut written = self.write_leader(sink)?;

        let mask = (0xFFu16 >> (8 - self.params.data_bits)) as u8;

        for &byte in data {
            // Parity covers only the bits that go on the wire
            let byte = byte & mask;

            for _ in 0..self.params.start_bits {
                written += self.write_bit(sink, false)?;
            }

            for i in 0..self.params.data_bits {
                written += self.write_bit(sink, (byte >> i) & 1 == 1)?;
            }

            if let Some(parity) = self.params.parity.parity_bit(byte) {
                written += self.write_bit(sink, parity)?;
            }

            for _ in 0..self.params.stop_bits {
                written += self.write_bit(sink, true)?;
            }
        }

        written += self.write_leader(sink)?;

        log::debug!(
            "Encoded {} bytes into {} samples ({} leader cycles each side)",
            data.len(),
            written,
            self.leader_cycles
        );
        Ok(written)
    }

    /// Carrier tone: a flat run of HIGH cycles
    fn write_leader<S: SampleSink + ?Sized>(&self, sink: &mut S) -> Result<usize> {
        for _ in 0..self.leader_cycles {
            sink.write_samples(Cycle::High.samples())?;
        }
        Ok(self.leader_cycles * CYCLE_LENGTH)
    }

    fn write_bit<S: SampleSink + ?Sized>(&self, sink: &mut S, bit: bool) -> Result<usize> {
        let cycle = Cycle::for_bit(bit);
        let cycles = self.params.cycles_per_bit();
        for _ in 0..cycles {
            sink.write_samples(cycle.samples())?;
        }
        Ok(cycles * CYCLE_LENGTH)
    }
}
