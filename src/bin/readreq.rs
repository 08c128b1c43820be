//! CLI tool for inspecting read-range descriptors.
//!
//! Builds a request from command-line bounds, validates it, and prints the
//! descriptor plus its derived lengths. Handy for eyeballing misaligned
//! ranges coming out of an alignment stage.

use clap::Parser;
use readreq::{DestBuffer, ReadRequest, RequestError};

/// Build and validate a read-range descriptor.
///
/// Takes the backend (block-aligned) and actual (client-requested) ranges,
/// both end-exclusive, along with the destination buffer geometry and the
/// backend file size, and reports whether they form a well-formed request.
#[derive(Parser, Debug)]
#[command(name = "readreq")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Start of the block-aligned backend range
    #[arg(long)]
    backend_start: i64,

    /// End of the backend range, exclusive
    #[arg(long)]
    backend_end: i64,

    /// Start of the client-requested range
    #[arg(long)]
    actual_start: i64,

    /// End of the client-requested range, exclusive
    #[arg(long)]
    actual_end: i64,

    /// Length of the destination buffer in bytes (default: actual length)
    #[arg(long)]
    buffer_len: Option<usize>,

    /// Offset into the destination buffer
    #[arg(long, default_value = "0")]
    buffer_offset: usize,

    /// Backend file size; 0 means unknown and skips the end-of-file check
    #[arg(long, default_value = "0")]
    file_size: i64,
}

fn main() {
    simplelog::TermLogger::init(
        simplelog::LevelFilter::Debug,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )
    .expect("failed to initialize logger");

    let args = Args::parse();

    if let Err(e) = run(&args) {
        log::error!("invalid read request: {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), RequestError> {
    let buffer_len = args
        .buffer_len
        .unwrap_or_else(|| args.actual_end.saturating_sub(args.actual_start).max(0) as usize);

    let request = ReadRequest::builder()
        .with_backend_read_bounds(args.backend_start, args.backend_end)
        .with_actual_read_bounds(args.actual_start, args.actual_end)
        .with_dest_buffer(DestBuffer::with_len(buffer_len))
        .with_dest_buffer_offset(args.buffer_offset)
        .with_backend_file_size(args.file_size)
        .build()?;

    println!("{request}");
    println!("actual read length:  {}", request.actual_read_len());
    println!("backend read length: {}", request.backend_read_len());
    println!(
        "alignment overhead:  {} byte(s)",
        request.backend_read_len() - request.actual_read_len()
    );

    Ok(())
}
