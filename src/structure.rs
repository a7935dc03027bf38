//! Results of walking a PNG stream

use crate::{
    chunk::ChunkType,
    ihdr::ImageHeader,
    segment::{ByteRange, ChunkSummary},
};

/// One run of consecutive IDAT chunks, inflated as a single stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDataBlock {
    /// Offset of the first IDAT chunk in the run
    pub offset: u64,
    /// Number of IDAT chunks in the run
    pub chunk_count: usize,
    /// Total compressed bytes (sum of payloads)
    pub compressed_len: u64,
    /// Inflated size, `None` if inflating failed
    pub decompressed_len: Option<u64>,
    /// Every `stride`-th inflated byte, for inspection only
    pub samples: Vec<u8>,
    pub stride: usize,
}

/// Non-fatal things that happened during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkEvent {
    /// Stored CRC did not match (lenient mode only)
    ChecksumMismatch {
        chunk_type: ChunkType,
        offset: u64,
        expected: u32,
        computed: u32,
    },
    /// An IDAT run could not be inflated
    DecodeFailed { offset: u64, reason: String },
}

/// Everything learned from one successful walk
///
/// A report only exists for walks that reached IEND; fatal problems are
/// returned as errors instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkReport {
    /// Decoded IHDR
    pub image_header: ImageHeader,

    /// Every chunk walked, in stream order (the signature is not a chunk)
    pub chunks: Vec<ChunkSummary>,

    /// IDAT runs in stream order
    pub image_data: Vec<ImageDataBlock>,

    /// Recorded non-fatal events
    pub events: Vec<WalkEvent>,

    /// Where the injected text chunk was written, if one was
    pub inserted: Option<ByteRange>,

    /// Stream offset just past the IEND CRC
    pub end_offset: u64,

    /// Bytes present after IEND
    pub trailing_bytes: u64,
}

impl WalkReport {
    pub(crate) fn new(image_header: ImageHeader) -> Self {
        Self {
            image_header,
            chunks: Vec::new(),
            image_data: Vec::new(),
            events: Vec::new(),
            inserted: None,
            end_offset: 0,
            trailing_bytes: 0,
        }
    }

    /// Chunk types in stream order
    pub fn chunk_types(&self) -> Vec<ChunkType> {
        self.chunks.iter().map(|c| c.chunk_type).collect()
    }

    /// Number of lenient-mode checksum mismatches
    pub fn checksum_mismatches(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, WalkEvent::ChecksumMismatch { .. }))
            .count()
    }

    /// Number of IDAT runs that failed to inflate
    pub fn decode_failures(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, WalkEvent::DecodeFailed { .. }))
            .count()
    }

    /// True when no non-fatal events were recorded
    pub fn is_clean(&self) -> bool {
        self.events.is_empty()
    }

    /// Find the first chunk of a given type
    pub fn find(&self, chunk_type: ChunkType) -> Option<&ChunkSummary> {
        self.chunks.iter().find(|c| c.chunk_type == chunk_type)
    }
}
