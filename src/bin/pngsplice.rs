use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use png_splice::{process_file, WalkEvent, WalkOptions, WalkReport, DEFAULT_KEYWORD};

#[derive(Parser, Debug)]
#[command(name = "pngsplice")]
#[command(about = "Walk a PNG file chunk by chunk and optionally splice a text chunk before IEND", long_about = None)]
struct Cli {
    /// PNG file to walk (modified in place with --insert)
    file: PathBuf,

    /// Insert a text chunk carrying this message before IEND
    #[arg(long, short = 'i', value_name = "MESSAGE")]
    insert: Option<String>,

    /// Keyword for the inserted text chunk
    #[arg(long, short = 'k', default_value = DEFAULT_KEYWORD)]
    keyword: String,

    /// Report CRC mismatches instead of aborting
    #[arg(long, short = 'l')]
    lenient: bool,

    /// Sample every Nth decompressed byte (default: image width)
    #[arg(long, value_name = "N")]
    stride: Option<usize>,
}

impl Cli {
    fn options(&self) -> WalkOptions {
        let mut options = WalkOptions::new()
            .keyword(self.keyword.clone())
            .fail_on_checksum_mismatch(!self.lenient);
        if let Some(message) = &self.insert {
            options = options.insert_text(message.clone());
        }
        if let Some(stride) = self.stride {
            options = options.stride(stride);
        }
        options
    }
}

fn print_report(report: &WalkReport) {
    println!("ihdr {}", report.image_header);
    for chunk in &report.chunks {
        println!(
            "chunk_type={} chunk_length={} offset={} crc={:#010x} properties={}{}",
            chunk.chunk_type,
            chunk.payload_len(),
            chunk.record.offset,
            chunk.stored_crc,
            chunk.chunk_type.properties(),
            if chunk.crc_ok { "" } else { " (mismatch)" }
        );
    }
    for block in &report.image_data {
        match block.decompressed_len {
            Some(len) => println!(
                "image data at {}: {} chunks, {} -> {} bytes, {} samples every {} bytes",
                block.offset,
                block.chunk_count,
                block.compressed_len,
                len,
                block.samples.len(),
                block.stride
            ),
            None => println!(
                "image data at {}: {} chunks, {} bytes, not decodable",
                block.offset, block.chunk_count, block.compressed_len
            ),
        }
    }
    for event in &report.events {
        match event {
            WalkEvent::ChecksumMismatch {
                chunk_type,
                offset,
                expected,
                computed,
            } => println!(
                "crc mismatch in {} at {}: stored {:#010x}, computed {:#010x}",
                chunk_type, offset, expected, computed
            ),
            WalkEvent::DecodeFailed { offset, reason } => {
                println!("decode failed at {}: {}", offset, reason)
            }
        }
    }
    if let Some(range) = report.inserted {
        println!("inserted {} bytes at offset {}", range.size, range.offset);
    }
    println!("Successfully parsed png file");
}

fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();
    match process_file(&cli.file, &cli.options()) {
        Ok(report) => {
            print_report(&report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {}", cli.file.display(), e);
            ExitCode::FAILURE
        }
    }
}
