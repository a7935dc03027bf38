#![no_main]

use libfuzzer_sys::fuzz_target;
use png_splice::{ChunkWalker, WalkOptions};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Walking any input should NEVER panic, only return errors
    let strict = ChunkWalker::new(WalkOptions::new());
    let _ = strict.inspect(&mut Cursor::new(data));

    let lenient = ChunkWalker::new(WalkOptions::new().lenient());
    if let Ok(report) = lenient.inspect(&mut Cursor::new(data)) {
        // A successful walk always ends on IEND inside the input
        assert!(report.end_offset <= data.len() as u64);
        let _ = report.chunk_types();
        let _ = report.checksum_mismatches();
    }
});
