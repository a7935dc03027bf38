//! Text chunk injection before IEND
//!
//! The injector builds a `tEXT` record and splices it into the store in front
//! of the IEND record. Byte stores can't insert mid-file, so the tail starting
//! at IEND is read into memory and written back after the new record.

use crate::{
    chunk::{ChunkHeader, ChunkRecord, ChunkType},
    error::{Error, Result},
    segment::ByteRange,
};
use log::info;
use std::io::{Read, Seek, SeekFrom, Write};

/// Keyword/message pair for the injected chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunk<'a> {
    pub keyword: &'a str,
    pub message: &'a str,
}

impl<'a> TextChunk<'a> {
    pub fn new(keyword: &'a str, message: &'a str) -> Self {
        Self { keyword, message }
    }

    /// `keyword || NUL || message`
    pub fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.keyword.len() + 1 + self.message.len());
        payload.extend_from_slice(self.keyword.as_bytes());
        payload.push(0);
        payload.extend_from_slice(self.message.as_bytes());
        payload
    }

    /// Full `tEXT` record with its CRC
    pub fn to_record(&self) -> Result<ChunkRecord> {
        ChunkRecord::new(ChunkType::TEXT, self.payload())
    }
}

/// Insert `record` at `offset`, shifting every following byte forward
///
/// The store grows by exactly `record.encoded_len()` bytes. On return the
/// cursor sits at the end of the rewritten tail.
pub fn splice_at<S: Read + Write + Seek>(
    store: &mut S,
    offset: u64,
    record: &ChunkRecord,
) -> Result<ByteRange> {
    store.seek(SeekFrom::Start(offset))?;
    let mut tail = Vec::new();
    store.read_to_end(&mut tail)?;

    let mut out = Vec::with_capacity(record.encoded_len() as usize + tail.len());
    record.write_to(&mut out)?;
    out.extend_from_slice(&tail);

    store.seek(SeekFrom::Start(offset))?;
    store.write_all(&out)?;
    store.flush()?;

    Ok(ByteRange::new(offset, record.encoded_len()))
}

/// Splice a text chunk in front of the IEND record described by `iend`
pub fn inject_before_iend<S: Read + Write + Seek>(
    store: &mut S,
    iend: &ChunkHeader,
    text: &TextChunk<'_>,
) -> Result<ByteRange> {
    if iend.chunk_type != ChunkType::IEND {
        return Err(Error::InvalidFormat(format!(
            "text chunk must be injected before IEND, not {}",
            iend.chunk_type
        )));
    }

    let record = text.to_record()?;
    let range = splice_at(store, iend.offset, &record)?;

    info!(
        "injected {} chunk at offset {} ({} bytes, keyword {:?}, crc {:#010x})",
        record.chunk_type,
        range.offset,
        range.size,
        text.keyword,
        record.crc
    );

    Ok(range)
}
