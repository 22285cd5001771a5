//! Kansas City Standard style audio modem
//!
//! Each bit is carried by a run of fixed 18-sample tone cycles: one hump for a
//! 0 bit, two humps in the same span for a 1 bit. Bytes are framed with start,
//! data, optional parity and stop bits and padded by a carrier-tone leader.

pub mod error;
pub mod cycle;
pub mod parity;
pub mod config;
pub mod sample;
pub mod encoder;
pub mod decoder;

pub use config::CodecParams;
pub use cycle::Cycle;
pub use decoder::{DecodeReport, Decoder};
pub use encoder::{Encoder, SampleSink};
pub use error::{KcsError, Result};
pub use parity::ParityMode;
pub use sample::Sample;

/// Nominal output sample rate in Hz (8-bit unsigned mono)
pub const SAMPLE_RATE: u32 = 22050;

/// Samples in one tone cycle, shared by the encoder and decoder
pub const CYCLE_LENGTH: usize = 18;

/// Cycles emitted per second of leader (integer division, 1225)
pub const CYCLES_PER_SECOND: usize = SAMPLE_RATE as usize / CYCLE_LENGTH;

/// Baud rate at which a bit period is exactly one cycle long
pub const BASE_BAUD: u32 = 1200;

/// Bit widths accepted for the data portion of a frame
pub const MIN_DATA_BITS: u8 = 7;
pub const MAX_DATA_BITS: u8 = 8;
