#![allow(clippy::uninlined_format_args)]
//! Example: Scan a plain-text file for inline encoded blocks
//!
//! Reads a file in 4 KiB chunks, optionally strips the signature first, and
//! prints the parts the scanner found.
//!
//! ## Running
//!
//! ```bash
//! cargo run --package plainscan --features serde --example scan_file -- message.txt
//! cargo run --package plainscan --features serde --example scan_file -- message.txt --strip-signature
//! PLAINSCAN_CONFIG=scanner.json RUST_LOG=plainscan=trace cargo run ...
//! ```
//!
//! `PLAINSCAN_CONFIG` may point at a JSON file such as
//! `{"detectors": {"pgp_signed": false}, "sniff_octet_stream": true}`.

use std::fs::File;
use std::io::Read;

use plainscan::{
    ContentType, Filter, InlineScanner, ScannerConfig, SignatureStripper, TransferEncoding,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const CHUNK_SIZE: usize = 4096;

fn load_config() -> Result<ScannerConfig, Box<dyn std::error::Error>> {
    match std::env::var_os("PLAINSCAN_CONFIG") {
        Some(path) => {
            let contents = std::fs::read_to_string(&path)?;
            let config = serde_json::from_str(&contents)?;
            info!("Loaded scanner config from {:?}", path);
            Ok(config)
        }
        None => Ok(ScannerConfig::default()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "plainscan=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut args = std::env::args().skip(1);
    let path = args.next().ok_or("usage: scan_file <file> [--strip-signature]")?;
    let strip = args.any(|a| a == "--strip-signature");

    let config = load_config()?;
    let mut stripper = SignatureStripper::new();
    let mut scanner = InlineScanner::with_config(
        config,
        ContentType::text_plain(),
        TransferEncoding::EightBit,
    );

    let mut file = File::open(&path)?;
    let mut chunk = vec![0u8; CHUNK_SIZE];
    let mut stripped = Vec::new();
    let mut passthrough = Vec::new();

    loop {
        let n = file.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        if strip {
            stripped.clear();
            stripper.filter(&chunk[..n], &mut stripped);
            scanner.filter(&stripped, &mut passthrough);
        } else {
            scanner.filter(&chunk[..n], &mut passthrough);
        }
    }

    if strip {
        stripped.clear();
        stripper.complete(&[], &mut stripped);
        scanner.complete(&stripped, &mut passthrough);
        println!("Signature found: {}", stripper.is_truncated());
    } else {
        scanner.complete(&[], &mut passthrough);
    }

    let parts = scanner.take_parts();
    println!("{} part(s) in {}", parts.len(), path);
    println!("==========================\n");

    for (i, part) in parts.iter().enumerate() {
        println!("Part {}: {} ({})", i + 1, part.state, part.content_type);
        println!("  Transfer-Encoding: {}", part.transfer_encoding);
        if let Some(name) = &part.filename {
            println!("  Filename: {}", name);
        }
        println!("  Size: {} bytes", part.len());
    }

    Ok(())
}
