//! Big-endian field codec and ASCII chunk type tags
//!
//! Every multi-byte integer in a PNG stream is a 4-byte big-endian unsigned
//! value. The functions here take fixed-size arrays so a short or long slice
//! is rejected at the call site rather than silently coerced.

use crate::error::{Error, Result};
use byteorder::{BigEndian, ByteOrder};

/// Decode a 4-byte big-endian unsigned integer
pub fn decode_u32_be(bytes: &[u8; 4]) -> u32 {
    BigEndian::read_u32(bytes)
}

/// Encode a u32 as 4 big-endian bytes
pub fn encode_u32_be(value: u32) -> [u8; 4] {
    let mut buf = [0u8; 4];
    BigEndian::write_u32(&mut buf, value);
    buf
}

/// Decode a 4-byte chunk type tag, failing if any byte is not ASCII
///
/// `offset` is only used for error reporting.
pub fn decode_ascii_tag(bytes: &[u8; 4], offset: u64) -> Result<[u8; 4]> {
    if bytes.is_ascii() {
        Ok(*bytes)
    } else {
        Err(Error::Encoding {
            offset,
            bytes: *bytes,
        })
    }
}
