//! IHDR image header decoding

use crate::{
    codec::decode_u32_be,
    error::{Error, Result},
};
use std::fmt;

/// Fixed IHDR payload length
pub const IHDR_LENGTH: usize = 13;

/// Decoded IHDR payload
///
/// Field values are taken as-is; a zero width or an unknown colour type is
/// accepted here and left for image decoders to reject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHeader {
    pub width: u32,
    pub height: u32,
    pub bit_depth: u8,
    pub colour_type: u8,
    pub comp_method: u8,
    pub filter_method: u8,
    pub interlace_method: u8,
}

impl ImageHeader {
    /// Decode a 13-byte IHDR payload
    pub fn decode(payload: &[u8]) -> Result<Self> {
        let bytes: &[u8; IHDR_LENGTH] = payload.try_into().map_err(|_| {
            Error::InvalidFormat(format!(
                "IHDR payload must be {} bytes, found {}",
                IHDR_LENGTH,
                payload.len()
            ))
        })?;

        Ok(Self {
            width: decode_u32_be(&[bytes[0], bytes[1], bytes[2], bytes[3]]),
            height: decode_u32_be(&[bytes[4], bytes[5], bytes[6], bytes[7]]),
            bit_depth: bytes[8],
            colour_type: bytes[9],
            comp_method: bytes[10],
            filter_method: bytes[11],
            interlace_method: bytes[12],
        })
    }

    /// Human-readable colour type label
    pub fn colour_type_label(&self) -> &'static str {
        match self.colour_type {
            0 => "greyscale",
            2 => "truecolour",
            3 => "indexed",
            4 => "greyscale+alpha",
            6 => "truecolour+alpha",
            _ => "unknown",
        }
    }
}

impl fmt::Display for ImageHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} bit_depth={} colour_type={} ({}) comp_method={} filter_method={} interlace_method={}",
            self.width,
            self.height,
            self.bit_depth,
            self.colour_type,
            self.colour_type_label(),
            self.comp_method,
            self.filter_method,
            self.interlace_method
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fields() {
        let payload = [
            0x00, 0x00, 0x01, 0x00, // Width: 256
            0x00, 0x01, 0x00, 0x00, // Height: 65536
            0x10, // Bit depth: 16
            0x06, // Color type: RGBA
            0x00, // Compression: deflate
            0x00, // Filter: adaptive
            0x01, // Interlace: Adam7
        ];
        let header = ImageHeader::decode(&payload).unwrap();
        assert_eq!(
            header,
            ImageHeader {
                width: 256,
                height: 65536,
                bit_depth: 16,
                colour_type: 6,
                comp_method: 0,
                filter_method: 0,
                interlace_method: 1,
            }
        );
        assert_eq!(header.colour_type_label(), "truecolour+alpha");
    }

    #[test]
    fn test_zero_dimensions_are_structurally_valid() {
        let header = ImageHeader::decode(&[0u8; 13]).unwrap();
        assert_eq!(header.width, 0);
        assert_eq!(header.height, 0);
    }

    #[test]
    fn test_wrong_length_is_format_error() {
        for len in [0usize, 12, 14] {
            let err = ImageHeader::decode(&vec![0u8; len]).unwrap_err();
            assert!(matches!(err, Error::InvalidFormat(_)), "len {len}");
        }
    }
}
