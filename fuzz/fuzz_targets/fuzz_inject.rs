#![no_main]

use libfuzzer_sys::fuzz_target;
use png_splice::{ChunkWalker, WalkOptions};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    let mut store = Cursor::new(data.to_vec());
    let walker = ChunkWalker::new(WalkOptions::new().lenient().insert_text("fuzz"));

    if let Ok(report) = walker.walk(&mut store) {
        // Injection grows the store by exactly one record
        let range = report.inserted.expect("successful walk must have injected");
        assert_eq!(store.get_ref().len() as u64, data.len() as u64 + range.size);

        // And the result walks again without injecting
        let mut again = Cursor::new(store.into_inner());
        let second = ChunkWalker::new(WalkOptions::new().lenient())
            .walk(&mut again)
            .expect("injected output must walk");
        assert_eq!(second.image_header, report.image_header);
    }
});
