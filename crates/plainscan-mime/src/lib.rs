//! # plainscan-mime
//!
//! MIME building blocks for the plainscan filters.
//!
//! ## Features
//!
//! - **Content types**: parsing, display and parameter-preserving retyping
//! - **Transfer encodings**: including the legacy `x-uuencode`
//! - **Header decoding**: RFC 2047 encoded words with charset conversion
//! - **Type sniffing**: extension and magic-number based guesses
//!
//! ## Quick Start
//!
//! ```
//! use plainscan_mime::{ContentType, TransferEncoding};
//! use plainscan_mime::encoding::decode_filename;
//!
//! let base = ContentType::parse("text/plain; charset=iso-8859-1")?;
//! let uu = base.with_essence("application", "octet-stream");
//! assert_eq!(uu.charset(), Some("iso-8859-1"));
//!
//! assert_eq!(TransferEncoding::parse("x-uuencode"), TransferEncoding::Uuencode);
//! assert_eq!(decode_filename(b"=?utf-8?Q?r=C3=A9sum=C3=A9?=.pdf", None), "résumé.pdf");
//! # Ok::<(), plainscan_mime::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod transfer_encoding;

pub mod encoding;
pub mod sniff;

pub use content_type::ContentType;
pub use error::{Error, Result};
pub use sniff::{ExtensionSniffer, TypeSniffer};
pub use transfer_encoding::TransferEncoding;
