//! Streaming PNG chunk walker with text chunk splicing.
//!
//! This crate walks a PNG byte store one chunk at a time, validating the
//! signature, the IHDR header and every chunk CRC, and reassembling runs of
//! IDAT chunks into a single zlib stream for inspection. It can also splice a
//! text chunk into the file immediately before IEND while keeping every
//! length and CRC consistent.
//!
//! # Design Principles
//!
//! - **Streaming**: Chunks are read in order through one cursor; only the
//!   current chunk and the open IDAT run are held in memory
//! - **Typed failures**: Every validation returns a [`Result`]; callers match
//!   on [`Error`] variants
//! - **Configurable integrity**: Strict mode aborts on the first bad CRC,
//!   lenient mode records it in the [`WalkReport`] and keeps going
//!
//! # Quick Start
//!
//! ```no_run
//! use png_splice::{process_file, WalkOptions};
//!
//! # fn main() -> png_splice::Result<()> {
//! // Validate a file without touching it
//! let report = process_file("image.png", &WalkOptions::new())?;
//! println!("{}", report.image_header);
//!
//! // Splice a text chunk in front of IEND
//! let options = WalkOptions::new().insert_text("hello").keyword("Comment");
//! let report = process_file("image.png", &options)?;
//! if let Some(range) = report.inserted {
//!     println!("wrote {} bytes at offset {}", range.size, range.offset);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Walker API
//!
//! For in-memory stores or a custom inflater, drive a [`ChunkWalker`]
//! directly:
//!
//! ```
//! use png_splice::{test_utils::minimal_png, ChunkWalker, WalkOptions};
//! use std::io::Cursor;
//!
//! # fn main() -> png_splice::Result<()> {
//! let mut store = Cursor::new(minimal_png(8, 8));
//! let report = ChunkWalker::new(WalkOptions::new().lenient()).walk(&mut store)?;
//! assert_eq!(report.chunks.len(), 2);
//! # Ok(())
//! # }
//! ```

mod chunk;
pub mod codec;
pub mod crc;
mod error;
mod ihdr;
mod inflate;
pub mod inject;
mod options;
mod segment;
mod store;
mod structure;
mod walker;

pub use chunk::{
    read_header, validate_signature, ChunkHeader, ChunkRecord, ChunkType, CHUNK_OVERHEAD,
    PNG_SIGNATURE,
};
pub use crc::ChecksumPolicy;
pub use error::{Error, Result};
pub use ihdr::{ImageHeader, IHDR_LENGTH};
pub use inflate::{Inflate, ZlibInflater};
pub use inject::TextChunk;
pub use options::{WalkOptions, DEFAULT_KEYWORD, MAX_KEYWORD_LEN};
pub use segment::{ByteRange, ChunkSummary, MAX_CHUNK_LENGTH, MAX_INFLATE_SIZE};
pub use store::{ByteStore, ReadOnly};
pub use structure::{ImageDataBlock, WalkEvent, WalkReport};
pub use walker::ChunkWalker;

// Test utilities - only compiled for tests or when explicitly enabled
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

/// Walk the PNG file at `path` with the given options
///
/// The filename and options are validated before the file is opened, and the
/// file is closed again on every exit path.
pub fn process_file<P: AsRef<std::path::Path>>(
    path: P,
    options: &WalkOptions,
) -> Result<WalkReport> {
    ChunkWalker::new(options.clone()).walk_file(path)
}
