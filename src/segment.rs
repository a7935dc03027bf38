//! Byte ranges and per-chunk location tracking

use crate::chunk::ChunkType;

/// A byte range in a stream (offset and size)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// Offset from start of stream
    pub offset: u64,
    /// Size in bytes
    pub size: u64,
}

impl ByteRange {
    /// Create a new byte range
    pub fn new(offset: u64, size: u64) -> Self {
        Self { offset, size }
    }

    /// Get the end offset of this range
    pub fn end_offset(&self) -> u64 {
        self.offset + self.size
    }
}

/// Maximum chunk payload length allowed by PNG (2^31 - 1)
pub const MAX_CHUNK_LENGTH: u32 = 0x7FFF_FFFF;

/// Maximum decompressed size of one IDAT run (256 MB)
///
/// A small zlib stream can expand by three orders of magnitude; anything past
/// this is reported as a decode failure instead of being allocated.
pub const MAX_INFLATE_SIZE: u64 = 256 * 1024 * 1024;

/// Where a walked chunk lives and whether its CRC held
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkSummary {
    /// Chunk type tag
    pub chunk_type: ChunkType,
    /// Whole record: length + type + payload + CRC
    pub record: ByteRange,
    /// CRC stored in the stream
    pub stored_crc: u32,
    /// Whether the stored CRC matched the computed one
    pub crc_ok: bool,
}

impl ChunkSummary {
    /// Payload length in bytes
    pub fn payload_len(&self) -> u64 {
        self.record.size - 12
    }
}
