//! WAV container adapter around the codec core

use crate::error::{CliError, Result};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use kcsmodem_core::{DecodeReport, Decoder, Encoder, KcsError, SampleSink, SAMPLE_RATE};
use std::io::{Seek, Write};
use std::path::Path;

/// Output format: 8-bit unsigned PCM, mono, 22050 Hz
pub fn output_spec() -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 8,
        sample_format: SampleFormat::Int,
    }
}

/// Sample sink writing straight into a WAV file
pub struct WavSink<W: Write + Seek> {
    writer: WavWriter<W>,
}

impl<W: Write + Seek> WavSink<W> {
    pub fn new(writer: WavWriter<W>) -> Self {
        Self { writer }
    }

    pub fn finalize(self) -> Result<()> {
        self.writer.finalize()?;
        Ok(())
    }
}

impl<W: Write + Seek> SampleSink for WavSink<W> {
    fn write_samples(&mut self, samples: &[u8]) -> kcsmodem_core::Result<()> {
        for &s in samples {
            // hound stores 8-bit samples as signed and re-biases them on disk
            self.writer
                .write_sample((s as i16 - 128) as i8)
                .map_err(|e| KcsError::Sink(e.to_string()))?;
        }
        Ok(())
    }
}

/// Encode `data` into a new WAV file at `path`, returning the sample count
pub fn write_wav(path: &Path, encoder: &Encoder, data: &[u8]) -> Result<usize> {
    let writer = WavWriter::create(path, output_spec())?;
    let mut sink = WavSink::new(writer);
    let written = encoder.encode_into(data, &mut sink)?;
    sink.finalize()?;
    Ok(written)
}

/// Unsigned samples read from a WAV file, at their native width
#[derive(Debug, Clone, PartialEq)]
pub enum WavSamples {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl WavSamples {
    pub fn len(&self) -> usize {
        match self {
            WavSamples::U8(s) => s.len(),
            WavSamples::U16(s) => s.len(),
            WavSamples::U32(s) => s.len(),
        }
    }

    pub fn decode(&self, decoder: &Decoder) -> DecodeReport {
        match self {
            WavSamples::U8(s) => decoder.decode(s.as_slice()),
            WavSamples::U16(s) => decoder.decode(s.as_slice()),
            WavSamples::U32(s) => decoder.decode(s.as_slice()),
        }
    }
}

/// A mono integer WAV file converted to unsigned samples
#[derive(Debug, Clone)]
pub struct WavInput {
    pub spec: WavSpec,
    pub samples: WavSamples,
}

pub fn read_wav(path: &Path) -> Result<WavInput> {
    let mut reader = WavReader::open(path)?;
    let spec = reader.spec();

    if spec.channels != 1 {
        return Err(CliError::UnsupportedWav(format!(
            "{} channels, only mono is supported",
            spec.channels
        )));
    }
    if spec.sample_format != SampleFormat::Int {
        return Err(CliError::UnsupportedWav("floating point samples".to_string()));
    }
    if spec.sample_rate != SAMPLE_RATE {
        log::warn!(
            "WAV sample rate is {} Hz, expected {} Hz; cycle geometry may not match",
            spec.sample_rate,
            SAMPLE_RATE
        );
    }

    // hound yields signed samples; shift them back to unsigned so the
    // full-scale peak maps to the width's maximum value
    let samples = match spec.bits_per_sample {
        8 => WavSamples::U8(
            reader
                .samples::<i8>()
                .map(|s| s.map(|v| (v as i16 + 128) as u8))
                .collect::<std::result::Result<_, _>>()?,
        ),
        16 => WavSamples::U16(
            reader
                .samples::<i16>()
                .map(|s| s.map(|v| (v as i32 + 32768) as u16))
                .collect::<std::result::Result<_, _>>()?,
        ),
        32 => WavSamples::U32(
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| (v as i64 + (1i64 << 31)) as u32))
                .collect::<std::result::Result<_, _>>()?,
        ),
        bits => {
            return Err(CliError::UnsupportedWav(format!("{}-bit samples", bits)));
        }
    };

    Ok(WavInput { spec, samples })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kcsmodem_core::{CodecParams, ParityMode};

    #[test]
    fn test_wav_round_trip_8bit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.wav");
        let params = CodecParams { baud: 1200, leader_seconds: 0.5, ..Default::default() };

        let encoder = Encoder::new(params).unwrap();
        let written = write_wav(&path, &encoder, b"Hello").unwrap();
        assert_eq!(written, encoder.encode(b"Hello").unwrap().len());

        let input = read_wav(&path).unwrap();
        assert_eq!(input.spec, output_spec());
        assert_eq!(input.samples, WavSamples::U8(encoder.encode(b"Hello").unwrap()));

        let report = input.samples.decode(&Decoder::new(params).unwrap());
        assert_eq!(report.data, b"Hello");
    }

    #[test]
    fn test_reads_16bit_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wide.wav");
        let params = CodecParams::default();
        let samples = Encoder::new(params).unwrap().encode(b"16").unwrap();

        let spec = WavSpec { bits_per_sample: 16, ..output_spec() };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for &s in &samples {
            let wide = (s as i32 * 257 - 32768) as i16;
            writer.write_sample(wide).unwrap();
        }
        writer.finalize().unwrap();

        let input = read_wav(&path).unwrap();
        assert!(matches!(input.samples, WavSamples::U16(_)));
        let report = input.samples.decode(&Decoder::new(params).unwrap());
        assert_eq!(report.data, b"16");
    }

    #[test]
    fn test_reads_32bit_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widest.wav");
        let params = CodecParams { baud: 600, parity: ParityMode::Odd, ..Default::default() };
        let samples = Encoder::new(params).unwrap().encode(b"32").unwrap();

        let spec = WavSpec { bits_per_sample: 32, ..output_spec() };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        for &s in &samples {
            let wide = (s as i64 * 0x0101_0101 - (1i64 << 31)) as i32;
            writer.write_sample(wide).unwrap();
        }
        writer.finalize().unwrap();

        let input = read_wav(&path).unwrap();
        let expected: Vec<u32> = samples.iter().map(|&s| s as u32 * 0x0101_0101).collect();
        assert_eq!(input.samples, WavSamples::U32(expected));

        let report = input.samples.decode(&Decoder::new(params).unwrap());
        assert_eq!(report.data, b"32");
        assert_eq!(report.parity_errors, 0);
    }

    #[test]
    fn test_rejects_stereo() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stereo.wav");
        let spec = WavSpec { channels: 2, ..output_spec() };
        let mut writer = WavWriter::create(&path, spec).unwrap();
        writer.write_sample(0i8).unwrap();
        writer.write_sample(0i8).unwrap();
        writer.finalize().unwrap();

        assert!(matches!(read_wav(&path), Err(CliError::UnsupportedWav(_))));
    }
}
