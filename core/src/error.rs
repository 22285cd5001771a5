use thiserror::Error;

#[derive(Debug, Error)]
pub enum KcsError {
    #[error("Invalid baud rate {0}: must be a positive divisor of 1200")]
    InvalidBaud(u32),

    #[error("Invalid data bit count {0}: expected 7 or 8")]
    InvalidDataBits(u8),

    #[error("Invalid stop bit count {0}: expected 1 or 2")]
    InvalidStopBits(u8),

    #[error("Invalid start bit count {0}: at least one start bit is required")]
    InvalidStartBits(u8),

    #[error("Invalid leader duration {0}s: must be a finite, non-negative number")]
    InvalidLeader(f64),

    #[error("Leader of {seconds}s is too short: {cycles} cycles is less than one bit period")]
    LeaderTooShort { seconds: f64, cycles: usize },

    #[error("Unsupported sample width: {0} bytes")]
    InvalidSampleWidth(usize),

    #[error("Insufficient data: expected {expected} bytes, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    #[error("Encoded output for {data_len} bytes does not fit in memory")]
    OutputTooLarge { data_len: usize },

    #[error("Buffer of {total_samples} samples of {sample_width} bytes is too large")]
    BufferTooLarge { total_samples: usize, sample_width: usize },

    #[error("Sample sink error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, KcsError>;
