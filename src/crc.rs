//! Chunk integrity checking
//!
//! PNG chunks carry a CRC-32 (ISO 3309 / ITU-T V.42, the zlib polynomial)
//! over the type tag followed by the payload. The length field is not covered.

use crate::error::{Error, Result};
use crc32fast::Hasher;

/// What to do when a stored CRC does not match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChecksumPolicy {
    /// Abort the walk with [`Error::ChecksumMismatch`] (default)
    #[default]
    Strict,
    /// Record the mismatch and keep walking
    Lenient,
}

/// CRC-32 of `bytes`
pub fn crc32(bytes: &[u8]) -> u32 {
    crc32fast::hash(bytes)
}

/// CRC-32 over a chunk type followed by its payload
pub fn chunk_crc(chunk_type: &[u8; 4], payload: &[u8]) -> u32 {
    let mut hasher = Hasher::new();
    hasher.update(chunk_type);
    hasher.update(payload);
    hasher.finalize()
}

/// Compare the CRC of `type_and_payload` against `expected`
pub fn verify_checksum(type_and_payload: &[u8], expected: u32) -> bool {
    crc32(type_and_payload) == expected
}

/// Outcome of checking one chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumCheck {
    /// CRC stored in the file
    pub stored: u32,
    /// CRC computed over type + payload
    pub computed: u32,
}

impl ChecksumCheck {
    /// Compute the CRC for a chunk and pair it with the stored value
    pub fn new(chunk_type: &[u8; 4], payload: &[u8], stored: u32) -> Self {
        Self {
            stored,
            computed: chunk_crc(chunk_type, payload),
        }
    }

    pub fn is_match(&self) -> bool {
        self.stored == self.computed
    }

    /// Apply `policy` to this check
    ///
    /// Returns `Ok(true)` on a match, `Ok(false)` on a mismatch tolerated by
    /// [`ChecksumPolicy::Lenient`], and an error on a strict mismatch.
    pub fn enforce(&self, policy: ChecksumPolicy, chunk_type: &str, offset: u64) -> Result<bool> {
        if self.is_match() {
            return Ok(true);
        }
        match policy {
            ChecksumPolicy::Strict => Err(Error::ChecksumMismatch {
                chunk_type: chunk_type.to_string(),
                offset,
                expected: self.stored,
                computed: self.computed,
            }),
            ChecksumPolicy::Lenient => Ok(false),
        }
    }
}
