//! # plainscan
//!
//! Streaming filters for legacy content embedded in plain-text mail bodies.
//!
//! ## Features
//!
//! - **Inline content scanner**: splits a text stream into typed parts where
//!   uuencode, BinHex, PostScript or PGP blocks appear inline
//! - **Signature stripper**: truncates quoted text at the `-- ` separator
//! - **Chunk-boundary invariant**: identical results however the input is
//!   split across calls; no byte is ever dropped or duplicated
//! - **Never fails on content**: malformed or truncated blocks degrade to
//!   "emit what we have"
//!
//! ## Quick Start
//!
//! ### Scanning
//!
//! ```
//! use plainscan::{Filter, InlineScanner, ScanState};
//!
//! let mut scanner = InlineScanner::from_headers("text/plain; charset=utf-8", "8bit")?;
//! let mut out = Vec::new();
//! scanner.filter(b"hello\nbeg", &mut out);
//! scanner.complete(b"in 644 x\n!!!!\nend\n", &mut out);
//!
//! let parts = scanner.take_parts();
//! assert_eq!(parts.len(), 2);
//! assert_eq!(parts[0].bytes, b"hello\n");
//! assert_eq!(parts[1].state, ScanState::Uuencode);
//! assert_eq!(parts[1].filename.as_deref(), Some("x"));
//! # Ok::<(), plainscan::Error>(())
//! ```
//!
//! ### Stripping signatures
//!
//! ```
//! use plainscan::{Filter, SignatureStripper};
//!
//! let mut stripper = SignatureStripper::new();
//! let out = stripper.run([&b"Hi there.\n-"[..], &b"- \nJohn\n"[..]]);
//! assert_eq!(out, b"Hi there.\n");
//! ```
//!
//! ## Filter lifecycle
//!
//! Every filter is fed zero or more [`Filter::filter`] chunks, then exactly
//! one [`Filter::complete`]. Feeding a completed filter panics; call
//! [`Filter::reset`] first. Retrieve scanner parts before resetting, since
//! `reset()` discards them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod filter;
pub mod scanner;
pub mod stripper;

mod error;

pub use config::{Detectors, ScannerConfig, ScannerConfigBuilder};
pub use error::{Error, Result};
pub use filter::{Backup, Filter};
pub use scanner::{EmittedPart, InlineScanner, ScanState, scan};
pub use stripper::{SIGNATURE_DELIMITER, SignatureStripper, strip_signature};

pub use plainscan_mime::{ContentType, TransferEncoding, TypeSniffer};
