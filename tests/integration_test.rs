// Integration tests against real files on disk

#[cfg(test)]
mod file_tests {
    use png_splice::{
        crc::verify_checksum, process_file, test_utils::*, ChunkType, Error, WalkOptions,
    };
    use std::fs;
    use std::path::PathBuf;
    use tempdir::TempDir;

    fn write_fixture(dir: &TempDir, name: &str, data: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, data).expect("Failed to write fixture");
        path
    }

    #[test]
    fn test_walk_leaves_file_untouched() {
        let dir = TempDir::new("png_splice").unwrap();
        let png = png_with_idat(4, 4, &[0u8; 4 * (1 + 4 * 3)], 2);
        let path = write_fixture(&dir, "plain.png", &png);

        let report = process_file(&path, &WalkOptions::new()).expect("Failed to walk");
        assert_eq!(report.image_header.width, 4);
        assert_eq!(report.image_data.len(), 1);
        assert_eq!(report.image_data[0].chunk_count, 2);
        assert!(report.is_clean());

        assert_eq!(fs::read(&path).unwrap(), png, "Walking must not modify the file");
    }

    #[test]
    fn test_inject_into_file() {
        let dir = TempDir::new("png_splice").unwrap();
        let png = minimal_png(16, 16);
        let path = write_fixture(&dir, "inject.png", &png);

        let options = WalkOptions::new().insert_text("hello");
        let report = process_file(&path, &options).expect("Failed to inject");

        let out = fs::read(&path).unwrap();
        let added = 12 + "mykey".len() + 1 + "hello".len();
        assert_eq!(out.len(), png.len() + added);

        // The new chunk's CRC verifies on its own
        let range = report.inserted.expect("Should record the inserted range");
        let start = range.offset as usize;
        let chunk = &out[start..start + added];
        let crc = u32::from_be_bytes(chunk[added - 4..].try_into().unwrap());
        assert!(verify_checksum(&chunk[4..added - 4], crc));
        assert_eq!(&chunk[4..8], b"tEXT");

        // Original IEND follows bit for bit
        assert_eq!(&out[start + added..], &iend_chunk()[..]);
    }

    #[test]
    fn test_round_trip_after_injection() {
        let dir = TempDir::new("png_splice").unwrap();
        let png = png_with_idat(3, 2, &[1u8; 2 * (1 + 3 * 3)], 3);
        let path = write_fixture(&dir, "round_trip.png", &png);

        let before = process_file(&path, &WalkOptions::new()).unwrap();
        process_file(&path, &WalkOptions::new().insert_text("round trip")).unwrap();
        let after = process_file(&path, &WalkOptions::new()).unwrap();

        assert_eq!(before.image_header, after.image_header);
        assert_eq!(
            after.chunk_types(),
            vec![
                ChunkType::IHDR,
                ChunkType::IDAT,
                ChunkType::IDAT,
                ChunkType::IDAT,
                ChunkType::TEXT,
                ChunkType::IEND
            ]
        );
        assert!(after.is_clean());
    }

    #[test]
    fn test_corrupt_crc_strict_vs_lenient() {
        let dir = TempDir::new("png_splice").unwrap();
        let mut png = minimal_png(1, 1);
        let iend = iend_offset(&png);
        corrupt_crc(&mut png, iend);
        let path = write_fixture(&dir, "bad_crc.png", &png);

        let strict = process_file(&path, &WalkOptions::new());
        assert!(matches!(strict, Err(Error::ChecksumMismatch { .. })));

        let lenient = process_file(&path, &WalkOptions::new().lenient()).unwrap();
        assert_eq!(lenient.checksum_mismatches(), 1);
    }

    #[test]
    fn test_strict_failure_does_not_inject() {
        let dir = TempDir::new("png_splice").unwrap();
        let mut png = minimal_png(1, 1);
        corrupt_crc(&mut png, 8);
        let path = write_fixture(&dir, "bad_ihdr.png", &png);

        let result = process_file(&path, &WalkOptions::new().insert_text("x"));
        assert!(matches!(result, Err(Error::ChecksumMismatch { offset: 8, .. })));
        assert_eq!(fs::read(&path).unwrap(), png);
    }

    #[test]
    fn test_strict_failure_at_iend_does_not_inject() {
        let dir = TempDir::new("png_splice").unwrap();
        let mut png = minimal_png(1, 1);
        let iend = iend_offset(&png);
        corrupt_crc(&mut png, iend);
        let path = write_fixture(&dir, "bad_iend.png", &png);

        let result = process_file(&path, &WalkOptions::new().insert_text("x"));
        assert!(matches!(result, Err(Error::ChecksumMismatch { .. })));
        assert_eq!(fs::read(&path).unwrap(), png, "File must be left as it was");
    }

    #[test]
    fn test_large_image_data_file() {
        let dir = TempDir::new("png_splice").unwrap();
        let raw: Vec<u8> = (0..128 * (1 + 128 * 3)).map(|i| (i % 13) as u8).collect();
        let png = png_with_idat(128, 128, &raw, 3);
        let path = write_fixture(&dir, "large.png", &png);

        let report = process_file(&path, &WalkOptions::new().insert_text("big")).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.image_data[0].decompressed_len, Some(raw.len() as u64));
        assert!(report.inserted.is_some());
    }

    #[test]
    fn test_empty_filename_is_configuration_error() {
        let result = process_file("", &WalkOptions::new());
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_bad_options_checked_before_open() {
        // The path doesn't exist; option validation must fail first
        let options = WalkOptions::new().insert_text("x").keyword("bad\0key");
        let result = process_file("/nonexistent/dir/file.png", &options);
        assert!(matches!(result, Err(Error::InvalidConfiguration(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new("png_splice").unwrap();
        let result = process_file(dir.path().join("missing.png"), &WalkOptions::new());
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_truncated_file() {
        let dir = TempDir::new("png_splice").unwrap();
        let png = minimal_png(1, 1);
        let path = write_fixture(&dir, "truncated.png", &png[..png.len() - 9]);

        let result = process_file(&path, &WalkOptions::new());
        assert!(matches!(result, Err(Error::Truncated { .. })));
    }
}
