//! Decompression of reassembled IDAT data

use crate::{
    error::{Error, Result},
    segment::MAX_INFLATE_SIZE,
};
use flate2::{Decompress, FlushDecompress, Status};

/// Turns a complete zlib stream into raw scan-line bytes
///
/// The walker calls this once per run of consecutive IDAT chunks with the
/// concatenation of their payloads. A failure is reported, never fatal.
pub trait Inflate {
    fn inflate(&self, compressed: &[u8]) -> Result<Vec<u8>>;
}

/// Output buffer growth step while inflating (32KB)
const INFLATE_GROW: usize = 32 * 1024;

/// zlib inflater backed by flate2
///
/// A stream that ends before its final block is a decode error, not a
/// short result. Output beyond `max_output` bytes is a decode error too.
#[derive(Debug, Clone, Copy)]
pub struct ZlibInflater {
    max_output: u64,
}

impl ZlibInflater {
    /// Inflater capped at [`MAX_INFLATE_SIZE`]
    pub fn new() -> Self {
        Self::with_limit(MAX_INFLATE_SIZE)
    }

    /// Inflater capped at `max_output` decompressed bytes
    pub fn with_limit(max_output: u64) -> Self {
        Self { max_output }
    }

    pub fn max_output(&self) -> u64 {
        self.max_output
    }
}

impl Default for ZlibInflater {
    fn default() -> Self {
        Self::new()
    }
}

impl Inflate for ZlibInflater {
    fn inflate(&self, compressed: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = Decompress::new(true);
        let initial = compressed
            .len()
            .saturating_mul(2)
            .clamp(INFLATE_GROW, INFLATE_GROW.max(self.max_output as usize));
        let mut out = Vec::with_capacity(initial);

        loop {
            if out.len() == out.capacity() {
                out.reserve(INFLATE_GROW);
            }
            let consumed = decoder.total_in();
            let produced = decoder.total_out();
            let input = compressed.get(consumed as usize..).unwrap_or_default();

            let status = decoder
                .decompress_vec(input, &mut out, FlushDecompress::None)
                .map_err(|e| Error::Decode(e.to_string()))?;

            if decoder.total_out() > self.max_output {
                return Err(Error::Decode(format!(
                    "decompressed image data exceeds {} bytes",
                    self.max_output
                )));
            }

            match status {
                Status::StreamEnd => return Ok(out),
                Status::Ok | Status::BufError => {
                    let stalled =
                        decoder.total_in() == consumed && decoder.total_out() == produced;
                    if stalled && out.len() < out.capacity() {
                        return Err(Error::Decode(format!(
                            "zlib stream ended early after {} of {} bytes",
                            consumed,
                            compressed.len()
                        )));
                    }
                }
            }
        }
    }
}

impl<F> Inflate for F
where
    F: Fn(&[u8]) -> Result<Vec<u8>>,
{
    fn inflate(&self, compressed: &[u8]) -> Result<Vec<u8>> {
        self(compressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::zlib;

    #[test]
    fn test_zlib_inflate() {
        let raw: Vec<u8> = (0..=255).cycle().take(1000).collect();
        let compressed = zlib(&raw);
        assert_eq!(ZlibInflater::new().inflate(&compressed).unwrap(), raw);
    }

    #[test]
    fn test_split_stream_inflates_only_when_joined() {
        let raw = vec![7u8; 4096];
        let compressed = zlib(&raw);
        let (head, tail) = compressed.split_at(compressed.len() / 2);

        assert!(ZlibInflater::new().inflate(head).is_err());

        let joined = [head, tail].concat();
        assert_eq!(ZlibInflater::new().inflate(&joined).unwrap(), raw);
    }

    #[test]
    fn test_output_larger_than_one_buffer() {
        // Several refills of the output buffer
        let raw: Vec<u8> = (0u32..200_000).map(|i| (i % 251) as u8).collect();
        let compressed = zlib(&raw);
        assert_eq!(ZlibInflater::new().inflate(&compressed).unwrap(), raw);
    }

    #[test]
    fn test_highly_compressible_output() {
        let raw = vec![0u8; 65_537];
        let compressed = zlib(&raw);
        assert!(compressed.len() * 2 < INFLATE_GROW);
        assert_eq!(ZlibInflater::new().inflate(&compressed).unwrap(), raw);
    }

    #[test]
    fn test_output_limit() {
        let compressed = zlib(&vec![0u8; 100_000]);

        let err = ZlibInflater::with_limit(50_000)
            .inflate(&compressed)
            .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));

        let exact = ZlibInflater::with_limit(100_000).inflate(&compressed).unwrap();
        assert_eq!(exact.len(), 100_000);
    }

    #[test]
    fn test_default_limit() {
        assert_eq!(ZlibInflater::default().max_output(), MAX_INFLATE_SIZE);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let err = ZlibInflater::new().inflate(b"definitely not zlib").unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }

    #[test]
    fn test_closure_inflater() {
        let reverse = |bytes: &[u8]| -> Result<Vec<u8>> { Ok(bytes.iter().rev().copied().collect()) };
        assert_eq!(reverse.inflate(&[1, 2, 3]).unwrap(), vec![3, 2, 1]);
    }
}
