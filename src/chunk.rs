//! PNG chunk primitives: signature, type tags, headers and full records
//!
//! On the wire a chunk is `length(4) || type(4) || payload(length) || crc(4)`,
//! with the CRC covering `type || payload` only.

use crate::{
    codec::{decode_ascii_tag, decode_u32_be, encode_u32_be},
    crc::chunk_crc,
    error::{Error, Result},
    segment::{ByteRange, MAX_CHUNK_LENGTH},
};
use byteorder::{BigEndian, WriteBytesExt};
use std::fmt;
use std::io::{Read, Seek, Write};

/// PNG signature: 89 50 4E 47 0D 0A 1A 0A
pub const PNG_SIGNATURE: [u8; 8] = [137, 80, 78, 71, 13, 10, 26, 10];

/// Bytes of framing around a payload: length + type + CRC
pub const CHUNK_OVERHEAD: u64 = 12;

/// Check the 8-byte signature byte for byte
pub fn validate_signature(bytes: &[u8; 8]) -> Result<()> {
    if *bytes == PNG_SIGNATURE {
        Ok(())
    } else {
        Err(Error::InvalidFormat(format!(
            "bad signature: expected {:02x?}, found {:02x?}",
            PNG_SIGNATURE, bytes
        )))
    }
}

/// A 4-byte ASCII chunk type tag
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkType([u8; 4]);

impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");
    /// Type tag of the injected text chunk
    pub const TEXT: Self = Self(*b"tEXT");

    /// Build a type from raw bytes, rejecting non-ASCII tags
    pub fn from_bytes(bytes: [u8; 4], offset: u64) -> Result<Self> {
        decode_ascii_tag(&bytes, offset).map(Self)
    }

    pub fn bytes(&self) -> &[u8; 4] {
        &self.0
    }

    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("????")
    }

    /// Ancillary bit (lowercase first letter)
    pub fn is_ancillary(&self) -> bool {
        self.0[0] & 0x20 != 0
    }

    /// Private bit (lowercase second letter)
    pub fn is_private(&self) -> bool {
        self.0[1] & 0x20 != 0
    }

    /// Reserved bit (lowercase third letter); must be clear in conforming files
    pub fn is_reserved_set(&self) -> bool {
        self.0[2] & 0x20 != 0
    }

    /// Safe-to-copy bit (lowercase fourth letter)
    pub fn is_safe_to_copy(&self) -> bool {
        self.0[3] & 0x20 != 0
    }

    /// Property bits as a short label, e.g. `ancillary,public,unsafe-to-copy`
    pub fn properties(&self) -> String {
        let mut label = String::from(if self.is_ancillary() {
            "ancillary"
        } else {
            "critical"
        });
        label.push_str(if self.is_private() { ",private" } else { ",public" });
        if self.is_reserved_set() {
            label.push_str(",reserved");
        }
        label.push_str(if self.is_safe_to_copy() {
            ",safe-to-copy"
        } else {
            ",unsafe-to-copy"
        });
        label
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({:?})", self.as_str())
    }
}

/// The 8-byte (length, type) prefix of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Stream offset of the length field
    pub offset: u64,
    /// Payload length, excluding type and CRC
    pub length: u32,
    pub chunk_type: ChunkType,
}

impl ChunkHeader {
    /// Decode a header read at `offset`
    pub fn parse(bytes: &[u8; 8], offset: u64) -> Result<Self> {
        let mut len_bytes = [0u8; 4];
        let mut type_bytes = [0u8; 4];
        len_bytes.copy_from_slice(&bytes[..4]);
        type_bytes.copy_from_slice(&bytes[4..]);

        let length = decode_u32_be(&len_bytes);
        if length > MAX_CHUNK_LENGTH {
            return Err(Error::ChunkTooLarge { offset, length });
        }

        Ok(Self {
            offset,
            length,
            chunk_type: ChunkType::from_bytes(type_bytes, offset + 4)?,
        })
    }

    /// Re-encode the header exactly as it appeared on the wire
    pub fn to_bytes(&self) -> [u8; 8] {
        let mut out = [0u8; 8];
        out[..4].copy_from_slice(&encode_u32_be(self.length));
        out[4..].copy_from_slice(self.chunk_type.bytes());
        out
    }

    /// Offset of the first payload byte
    pub fn payload_offset(&self) -> u64 {
        self.offset + 8
    }

    /// Offset of the trailing CRC field
    pub fn crc_offset(&self) -> u64 {
        self.payload_offset() + self.length as u64
    }

    /// Whole record: length + type + payload + CRC
    pub fn record_range(&self) -> ByteRange {
        ByteRange::new(self.offset, CHUNK_OVERHEAD + self.length as u64)
    }
}

/// Read a chunk header at the current position
///
/// Consumes exactly 8 bytes. Running out of bytes, including at a clean
/// end of stream, is a truncation error.
pub fn read_header<R: Read + Seek>(source: &mut R) -> Result<ChunkHeader> {
    let offset = source.stream_position()?;
    let bytes = read_array::<_, 8>(source, offset, "chunk header")?;
    ChunkHeader::parse(&bytes, offset)
}

/// Read exactly `len` bytes or report how many were available
pub(crate) fn read_field<R: Read>(
    source: &mut R,
    len: u64,
    offset: u64,
    what: &'static str,
) -> Result<Vec<u8>> {
    // Grow as data arrives rather than trusting `len` up front
    let mut buf = Vec::new();
    let available = source.by_ref().take(len).read_to_end(&mut buf)? as u64;
    if available < len {
        return Err(Error::Truncated {
            offset,
            needed: len,
            available,
            what,
        });
    }
    Ok(buf)
}

/// Fixed-size variant of [`read_field`]
pub(crate) fn read_array<R: Read, const N: usize>(
    source: &mut R,
    offset: u64,
    what: &'static str,
) -> Result<[u8; N]> {
    let bytes = read_field(source, N as u64, offset, what)?;
    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}

/// A complete chunk as it appears on the wire
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    pub chunk_type: ChunkType,
    pub payload: Vec<u8>,
    /// CRC over type + payload
    pub crc: u32,
}

impl ChunkRecord {
    /// Build a record, computing its CRC
    pub fn new(chunk_type: ChunkType, payload: Vec<u8>) -> Result<Self> {
        if payload.len() as u64 > MAX_CHUNK_LENGTH as u64 {
            return Err(Error::InvalidFormat(format!(
                "{} payload of {} bytes exceeds the chunk length limit",
                chunk_type,
                payload.len()
            )));
        }
        let crc = chunk_crc(chunk_type.bytes(), &payload);
        Ok(Self {
            chunk_type,
            payload,
            crc,
        })
    }

    /// Payload length as stored in the length field
    pub fn length(&self) -> u32 {
        self.payload.len() as u32
    }

    /// Total bytes on the wire
    pub fn encoded_len(&self) -> u64 {
        CHUNK_OVERHEAD + self.payload.len() as u64
    }

    /// Write the record: length, type, payload, CRC
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<BigEndian>(self.length())?;
        writer.write_all(self.chunk_type.bytes())?;
        writer.write_all(&self.payload)?;
        writer.write_u32::<BigEndian>(self.crc)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len() as usize);
        out.extend_from_slice(&encode_u32_be(self.length()));
        out.extend_from_slice(self.chunk_type.bytes());
        out.extend_from_slice(&self.payload);
        out.extend_from_slice(&encode_u32_be(self.crc));
        out
    }
}
