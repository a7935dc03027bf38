//! Test utilities for building PNG byte streams.
//!
//! These builders produce well-formed (or deliberately broken) PNG data in
//! memory so tests and fuzz targets don't need fixture files on disk.
//!
//! # Usage
//!
//! ```
//! use png_splice::test_utils::*;
//!
//! // Signature + IHDR + IEND, all CRCs valid
//! let png = minimal_png(4, 4);
//! assert_eq!(png.len(), 8 + 25 + 12);
//!
//! // Same, with two IDAT chunks carrying one zlib stream
//! let raw = vec![0u8; 4 * (1 + 4 * 3)];
//! let png = png_with_idat(4, 4, &raw, 2);
//! ```

use flate2::{write::ZlibEncoder, Compression};
use std::io::Write;

use crate::chunk::{ChunkRecord, ChunkType, PNG_SIGNATURE};

/// Encode one chunk record with a correct CRC
pub fn make_chunk(chunk_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut chunk = Vec::with_capacity(12 + payload.len());
    chunk.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    chunk.extend_from_slice(chunk_type);
    chunk.extend_from_slice(payload);
    chunk.extend_from_slice(&crate::crc::chunk_crc(chunk_type, payload).to_be_bytes());
    chunk
}

/// IHDR payload for an 8-bit truecolour image
pub fn ihdr_payload(width: u32, height: u32) -> [u8; 13] {
    let mut payload = [0u8; 13];
    payload[..4].copy_from_slice(&width.to_be_bytes());
    payload[4..8].copy_from_slice(&height.to_be_bytes());
    payload[8] = 8; // Bit depth
    payload[9] = 2; // Colour type: RGB
    payload
}

/// Encoded IHDR chunk
pub fn ihdr_chunk(width: u32, height: u32) -> Vec<u8> {
    make_chunk(b"IHDR", &ihdr_payload(width, height))
}

/// Encoded IEND chunk
pub fn iend_chunk() -> Vec<u8> {
    make_chunk(b"IEND", &[])
}

/// Signature followed by the given encoded chunks
pub fn png_from_chunks(chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut data = PNG_SIGNATURE.to_vec();
    for chunk in chunks {
        data.extend_from_slice(chunk);
    }
    data
}

/// Signature + IHDR + IEND
pub fn minimal_png(width: u32, height: u32) -> Vec<u8> {
    png_from_chunks(&[ihdr_chunk(width, height), iend_chunk()])
}

/// Signature + IHDR + `parts` IDAT chunks holding `zlib(raw)` + IEND
pub fn png_with_idat(width: u32, height: u32, raw: &[u8], parts: usize) -> Vec<u8> {
    let mut chunks = vec![ihdr_chunk(width, height)];
    for piece in split_evenly(&zlib(raw), parts) {
        chunks.push(make_chunk(b"IDAT", piece));
    }
    chunks.push(iend_chunk());
    png_from_chunks(&chunks)
}

/// zlib-compress `raw`
pub fn zlib(raw: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(raw).expect("writing to a Vec cannot fail");
    encoder.finish().expect("writing to a Vec cannot fail")
}

/// Split `data` into `parts` non-empty pieces (fewer if `data` is short)
pub fn split_evenly(data: &[u8], parts: usize) -> Vec<&[u8]> {
    let size = data.len().div_ceil(parts.max(1)).max(1);
    data.chunks(size).collect()
}

/// Offset of the last chunk (IEND in a well-formed file)
pub fn iend_offset(png: &[u8]) -> usize {
    png.len() - 12
}

/// Flip one bit in the CRC field of the chunk starting at `chunk_offset`
pub fn corrupt_crc(png: &mut [u8], chunk_offset: usize) {
    let len = u32::from_be_bytes([
        png[chunk_offset],
        png[chunk_offset + 1],
        png[chunk_offset + 2],
        png[chunk_offset + 3],
    ]) as usize;
    png[chunk_offset + 8 + len] ^= 0x01;
}

/// The text chunk the injector builds for `keyword` and `message`
pub fn text_chunk(keyword: &str, message: &str) -> Vec<u8> {
    let mut payload = keyword.as_bytes().to_vec();
    payload.push(0);
    payload.extend_from_slice(message.as_bytes());
    ChunkRecord::new(ChunkType::TEXT, payload)
        .map(|record| record.to_bytes())
        .expect("test payloads are small")
}
