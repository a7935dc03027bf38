//! Error types for png-splice

use std::io;

/// Result type for png-splice operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while walking or splicing a PNG stream
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O error other than running out of bytes
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Signature mismatch, wrong first chunk or wrong IHDR size
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// Fewer bytes available than a field requires
    #[error("Truncated stream at offset {offset}: {what} needs {needed} bytes, {available} available")]
    Truncated {
        offset: u64,
        needed: u64,
        available: u64,
        what: &'static str,
    },

    /// Stored CRC does not match the computed one
    #[error(
        "CRC checksum failed for {chunk_type} chunk at offset {offset}: stored {expected:#010x}, computed {computed:#010x}"
    )]
    ChecksumMismatch {
        chunk_type: String,
        offset: u64,
        expected: u32,
        computed: u32,
    },

    /// Compressed image data could not be inflated
    #[error("Decode error: {0}")]
    Decode(String),

    /// Chunk type tag is not ASCII
    #[error("Invalid chunk type at offset {offset}: {bytes:02x?} is not ASCII")]
    Encoding { offset: u64, bytes: [u8; 4] },

    /// Chunk length field exceeds 2^31 - 1
    #[error("Chunk length too large at offset {offset}: {length}")]
    ChunkTooLarge { offset: u64, length: u32 },

    /// Bad filename or options, detected before any I/O
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

