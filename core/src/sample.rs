/// Unsigned PCM sample as seen by the decoder
///
/// Cycle detection only needs two levels: the width's maximum value (the top
/// of a hump) and zero (the bottom).
pub trait Sample: Copy + PartialEq {
    const TOP: Self;
    const ZERO: Self;

    /// Sample width in bytes
    const WIDTH: usize;
}

impl Sample for u8 {
    const TOP: Self = u8::MAX;
    const ZERO: Self = 0;
    const WIDTH: usize = 1;
}

impl Sample for u16 {
    const TOP: Self = u16::MAX;
    const ZERO: Self = 0;
    const WIDTH: usize = 2;
}

impl Sample for u32 {
    const TOP: Self = u32::MAX;
    const ZERO: Self = 0;
    const WIDTH: usize = 4;
}

/// Split a little-endian byte buffer into unsigned samples of `N` bytes each
pub(crate) fn from_le_bytes<const N: usize, S>(buffer: &[u8], convert: fn([u8; N]) -> S) -> Vec<S> {
    buffer
        .chunks_exact(N)
        .map(|chunk| {
            let mut raw = [0u8; N];
            raw.copy_from_slice(chunk);
            convert(raw)
        })
        .collect()
}
