//! Chunk stream walker
//!
//! Walks a PNG byte store chunk by chunk:
//!
//! ```text
//! ExpectSignature -> ExpectImageHeader -> Streaming -> Done
//! ```
//!
//! `Streaming` repeats until an IEND record has been read and verified.
//! Running out of bytes anywhere before that is a truncation error. Runs of
//! consecutive IDAT payloads are concatenated and handed to the inflater when
//! the first non-IDAT chunk shows up. If a text injection is pending when IEND
//! is reached, the new chunk is spliced in front of IEND and the walk resumes
//! at the new chunk, so both it and the moved IEND get verified.

use crate::{
    chunk::{read_array, read_field, read_header, validate_signature, ChunkHeader, ChunkType},
    codec::decode_u32_be,
    crc::ChecksumCheck,
    error::{Error, Result},
    ihdr::{ImageHeader, IHDR_LENGTH},
    inflate::{Inflate, ZlibInflater},
    inject::{inject_before_iend, TextChunk},
    options::WalkOptions,
    segment::ChunkSummary,
    store::{ByteStore, ReadOnly},
    structure::{ImageDataBlock, WalkEvent, WalkReport},
};
use log::{debug, info, log_enabled, warn, Level};
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Position of a walk in the PNG grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WalkState {
    ExpectSignature,
    ExpectImageHeader,
    Streaming,
    Done,
}

/// Walks PNG byte stores according to a set of [`WalkOptions`]
///
/// # Example
///
/// ```
/// use png_splice::{test_utils::minimal_png, ChunkWalker, WalkOptions};
/// use std::io::Cursor;
///
/// # fn main() -> png_splice::Result<()> {
/// let mut store = Cursor::new(minimal_png(2, 2));
/// let walker = ChunkWalker::new(WalkOptions::new().insert_text("hello"));
/// let report = walker.walk(&mut store)?;
///
/// assert_eq!(report.image_header.width, 2);
/// assert!(report.inserted.is_some());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ChunkWalker<I = ZlibInflater> {
    options: WalkOptions,
    inflater: I,
}

impl ChunkWalker<ZlibInflater> {
    /// Create a walker that inflates image data with zlib
    pub fn new(options: WalkOptions) -> Self {
        Self::with_inflater(options, ZlibInflater::new())
    }
}

impl<I: Inflate> ChunkWalker<I> {
    /// Create a walker with a custom decompression collaborator
    pub fn with_inflater(options: WalkOptions, inflater: I) -> Self {
        Self { options, inflater }
    }

    pub fn options(&self) -> &WalkOptions {
        &self.options
    }

    /// Walk `store` from its current position to the end of IEND
    ///
    /// Options are validated before any I/O. On success the cursor sits just
    /// past the IEND CRC.
    pub fn walk<S: ByteStore>(&self, store: &mut S) -> Result<WalkReport> {
        self.options.validate()?;
        Walk::new(self, store).run()
    }

    /// Walk a source that can't be written to
    ///
    /// Fails with [`Error::InvalidConfiguration`] when injection is enabled.
    pub fn inspect<R: Read + Seek>(&self, source: &mut R) -> Result<WalkReport> {
        if self.options.inserts_text() {
            return Err(Error::InvalidConfiguration(
                "text injection needs a writable byte store".into(),
            ));
        }
        self.walk(&mut ReadOnly(source))
    }

    /// Open `path`, walk it and close it again
    ///
    /// The file is opened for writing only when injection is enabled. It is
    /// closed on every exit path.
    pub fn walk_file<P: AsRef<Path>>(&self, path: P) -> Result<WalkReport> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(Error::InvalidConfiguration(
                "file name must not be empty".into(),
            ));
        }
        self.options.validate()?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(self.options.inserts_text())
            .open(path)?;
        debug!("walking {}", path.display());
        self.walk(&mut file)
    }
}

/// An open run of consecutive IDAT payloads
#[derive(Debug)]
struct IdatAccumulator {
    offset: u64,
    chunk_count: usize,
    data: Vec<u8>,
}

impl IdatAccumulator {
    fn new(offset: u64) -> Self {
        Self {
            offset,
            chunk_count: 0,
            data: Vec::new(),
        }
    }

    fn append(&mut self, payload: &[u8]) {
        self.chunk_count += 1;
        self.data.extend_from_slice(payload);
    }
}

/// State of a single walk; owns the cursor bookkeeping
struct Walk<'a, S, I> {
    walker: &'a ChunkWalker<I>,
    store: &'a mut S,
    state: WalkState,
    insert_pending: bool,
    idat: Option<IdatAccumulator>,
}

impl<'a, S: ByteStore, I: Inflate> Walk<'a, S, I> {
    fn new(walker: &'a ChunkWalker<I>, store: &'a mut S) -> Self {
        Self {
            walker,
            store,
            state: WalkState::ExpectSignature,
            insert_pending: walker.options.inserts_text(),
            idat: None,
        }
    }

    fn run(mut self) -> Result<WalkReport> {
        self.read_signature()?;
        let mut report = self.read_image_header()?;
        while self.state == WalkState::Streaming {
            self.step(&mut report)?;
        }
        self.finish(&mut report)?;
        Ok(report)
    }

    fn transition(&mut self, next: WalkState) {
        debug!("walk state {:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn read_signature(&mut self) -> Result<()> {
        let offset = self.store.stream_position()?;
        let sig = read_array::<_, 8>(self.store, offset, "signature")?;
        validate_signature(&sig)?;
        self.transition(WalkState::ExpectImageHeader);
        Ok(())
    }

    fn read_image_header(&mut self) -> Result<WalkReport> {
        let header = read_header(self.store)?;
        if header.chunk_type != ChunkType::IHDR {
            return Err(Error::InvalidFormat(format!(
                "first chunk must be IHDR, found {} at offset {}",
                header.chunk_type, header.offset
            )));
        }
        if header.length as usize != IHDR_LENGTH {
            return Err(Error::InvalidFormat(format!(
                "IHDR payload must be {} bytes, found {}",
                IHDR_LENGTH, header.length
            )));
        }

        let payload = self.read_payload(&header)?;
        let image_header = ImageHeader::decode(&payload)?;
        info!("ihdr {}", image_header);

        let mut report = WalkReport::new(image_header);
        let stored = self.read_crc(&header)?;
        self.check_crc(&header, &payload, stored, &mut report)?;

        self.transition(WalkState::Streaming);
        Ok(report)
    }

    fn step(&mut self, report: &mut WalkReport) -> Result<()> {
        let header = read_header(self.store)?;
        debug!(
            "chunk_type={} chunk_length={} offset={} properties={}",
            header.chunk_type,
            header.length,
            header.offset,
            header.chunk_type.properties()
        );
        if header.chunk_type.is_reserved_set() {
            warn!(
                "{} chunk at offset {} has the reserved bit set",
                header.chunk_type, header.offset
            );
        }

        if header.chunk_type == ChunkType::IEND && self.insert_pending {
            return self.inject(&header, report);
        }

        let payload = self.read_payload(&header)?;
        if header.chunk_type == ChunkType::IDAT {
            self.idat
                .get_or_insert_with(|| IdatAccumulator::new(header.offset))
                .append(&payload);
        } else if let Some(run) = self.idat.take() {
            self.close_idat(run, report);
        }

        let stored = self.read_crc(&header)?;
        self.check_crc(&header, &payload, stored, report)?;

        if header.chunk_type == ChunkType::IEND {
            report.end_offset = header.record_range().end_offset();
            self.transition(WalkState::Done);
        }
        Ok(())
    }

    /// Splice the pending text chunk in front of IEND, then rewind to it
    ///
    /// IEND is read and its CRC enforced first, so a strict walk never writes
    /// into a file whose IEND is damaged or cut short. The outcome is recorded
    /// when the moved IEND is walked again.
    fn inject(&mut self, iend: &ChunkHeader, report: &mut WalkReport) -> Result<()> {
        let payload = self.read_payload(iend)?;
        let stored = self.read_crc(iend)?;
        ChecksumCheck::new(iend.chunk_type.bytes(), &payload, stored).enforce(
            self.walker.options.checksum_policy(),
            iend.chunk_type.as_str(),
            iend.offset,
        )?;

        let options = &self.walker.options;
        let text = TextChunk::new(options.keyword_str(), options.message().unwrap_or_default());
        let range = inject_before_iend(self.store, iend, &text)?;

        report.inserted = Some(range);
        self.insert_pending = false;

        // The new chunk and the moved IEND are walked as ordinary content
        self.store.seek(SeekFrom::Start(range.offset))?;
        Ok(())
    }

    fn read_payload(&mut self, header: &ChunkHeader) -> Result<Vec<u8>> {
        read_field(
            self.store,
            header.length as u64,
            header.payload_offset(),
            "chunk payload",
        )
    }

    fn read_crc(&mut self, header: &ChunkHeader) -> Result<u32> {
        let bytes = read_array::<_, 4>(self.store, header.crc_offset(), "chunk CRC")?;
        Ok(decode_u32_be(&bytes))
    }

    fn check_crc(
        &self,
        header: &ChunkHeader,
        payload: &[u8],
        stored: u32,
        report: &mut WalkReport,
    ) -> Result<()> {
        let check = ChecksumCheck::new(header.chunk_type.bytes(), payload, stored);
        let crc_ok = check.enforce(
            self.walker.options.checksum_policy(),
            header.chunk_type.as_str(),
            header.offset,
        )?;

        if !crc_ok {
            warn!(
                "{} chunk at offset {}: stored crc {:#010x} does not equal computed {:#010x}",
                header.chunk_type, header.offset, check.stored, check.computed
            );
            report.events.push(WalkEvent::ChecksumMismatch {
                chunk_type: header.chunk_type,
                offset: header.offset,
                expected: check.stored,
                computed: check.computed,
            });
        }

        report.chunks.push(ChunkSummary {
            chunk_type: header.chunk_type,
            record: header.record_range(),
            stored_crc: stored,
            crc_ok,
        });
        Ok(())
    }

    /// Inflate a finished IDAT run; failures are recorded, not raised
    fn close_idat(&self, run: IdatAccumulator, report: &mut WalkReport) {
        let stride = self
            .walker
            .options
            .effective_stride(report.image_header.width);
        let mut block = ImageDataBlock {
            offset: run.offset,
            chunk_count: run.chunk_count,
            compressed_len: run.data.len() as u64,
            decompressed_len: None,
            samples: Vec::new(),
            stride,
        };

        match self.walker.inflater.inflate(&run.data) {
            Ok(raw) => {
                block.decompressed_len = Some(raw.len() as u64);
                block.samples = raw.iter().step_by(stride).copied().collect();
                debug!(
                    "image data at offset {}: {} chunks, {} -> {} bytes",
                    run.offset,
                    run.chunk_count,
                    run.data.len(),
                    raw.len()
                );
                if log_enabled!(Level::Debug) {
                    let hex: Vec<String> =
                        block.samples.iter().map(|b| format!("{b:#04x}")).collect();
                    debug!("every {}th decompressed byte: {}", stride, hex.join(" "));
                }
            }
            Err(e) => {
                warn!("image data at offset {} failed to inflate: {}", run.offset, e);
                report.events.push(WalkEvent::DecodeFailed {
                    offset: run.offset,
                    reason: e.to_string(),
                });
            }
        }

        report.image_data.push(block);
    }

    fn finish(&mut self, report: &mut WalkReport) -> Result<()> {
        let end = self.store.stream_position()?;
        let total = self.store.seek(SeekFrom::End(0))?;
        self.store.seek(SeekFrom::Start(end))?;

        report.trailing_bytes = total.saturating_sub(end);
        if report.trailing_bytes > 0 {
            warn!("{} bytes after IEND", report.trailing_bytes);
        }

        info!(
            "Successfully parsed png file: {} chunks, {} checksum mismatches, {} decode failures",
            report.chunks.len(),
            report.checksum_mismatches(),
            report.decode_failures()
        );
        Ok(())
    }
}
