//! Inline content scanner.
//!
//! Splits a plain-text stream into typed parts wherever a legacy encoded
//! block (uuencode, BinHex, PostScript, PGP) appears inline. Classification
//! happens line by line; an unterminated trailing line is pushed back until
//! the next chunk arrives, so the parts produced never depend on how the
//! stream was chunked.
//!
//! ```text
//!            begin NNN name            end
//!   Plain ─────────────────→ Uuencode ─────→ Plain
//!     │  ←─────────────────────┘
//!     │   bad length byte (line re-read as plain)
//!     │
//!     ├── BinHex banner ──→ BinHex ── line ending ':' ──→ Plain
//!     ├── %!PS-Adobe- ────→ PostScript ── %%EOF ──────────→ Plain
//!     ├── BEGIN PGP SIGNED → PgpSigned ── END PGP SIGNATURE → Plain
//!     └── BEGIN PGP MESSAGE → PgpEncrypted ── END PGP MESSAGE → Plain
//! ```

mod part;
mod state;

use std::fmt;

use plainscan_mime::encoding::decode_filename;
use plainscan_mime::{ContentType, ExtensionSniffer, TransferEncoding, TypeSniffer};
use tracing::{debug, trace};

use crate::config::ScannerConfig;
use crate::error::Result;
use crate::filter::{Backup, Filter, Lifecycle, next_line_end, trim_eol};

pub use part::EmittedPart;
pub use state::ScanState;
use state::{Start, detect_start, is_uuencode_data};

/// Streaming scanner producing an ordered list of [`EmittedPart`]s.
///
/// Bytes handed to [`Filter::filter`] are passed through to the output once
/// their line is complete; the typed segmentation is collected separately and
/// read with [`InlineScanner::parts`] or [`InlineScanner::take_parts`].
pub struct InlineScanner {
    config: ScannerConfig,
    base_type: ContentType,
    base_encoding: TransferEncoding,
    sniffer: Box<dyn TypeSniffer + Send + Sync>,
    state: ScanState,
    pending: Vec<u8>,
    filename: Option<String>,
    backup: Backup,
    parts: Vec<EmittedPart>,
    lifecycle: Lifecycle,
}

impl InlineScanner {
    /// Creates a scanner for a part of the given type and encoding.
    #[must_use]
    pub fn new(base_type: ContentType, base_encoding: TransferEncoding) -> Self {
        Self::with_config(ScannerConfig::default(), base_type, base_encoding)
    }

    /// Creates a scanner with explicit configuration.
    #[must_use]
    pub fn with_config(
        config: ScannerConfig,
        base_type: ContentType,
        base_encoding: TransferEncoding,
    ) -> Self {
        Self {
            config,
            base_type,
            base_encoding,
            sniffer: Box::new(ExtensionSniffer),
            state: ScanState::Plain,
            pending: Vec::new(),
            filename: None,
            backup: Backup::new(),
            parts: Vec::new(),
            lifecycle: Lifecycle::default(),
        }
    }

    /// Creates a scanner from `Content-Type` and `Content-Transfer-Encoding`
    /// header values.
    ///
    /// # Errors
    ///
    /// Returns an error if the content type cannot be parsed.
    pub fn from_headers(content_type: &str, transfer_encoding: &str) -> Result<Self> {
        Ok(Self::new(
            ContentType::parse(content_type)?,
            TransferEncoding::parse(transfer_encoding),
        ))
    }

    /// Replaces the type sniffer consulted for `application/octet-stream` parts.
    #[must_use]
    pub fn with_sniffer(mut self, sniffer: impl TypeSniffer + Send + Sync + 'static) -> Self {
        self.sniffer = Box::new(sniffer);
        self
    }

    /// Returns the active state.
    #[must_use]
    pub const fn state(&self) -> ScanState {
        self.state
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ScannerConfig {
        &self.config
    }

    /// Returns the enclosing part's content type.
    #[must_use]
    pub const fn base_type(&self) -> &ContentType {
        &self.base_type
    }

    /// Returns the enclosing part's transfer encoding.
    #[must_use]
    pub const fn base_encoding(&self) -> TransferEncoding {
        self.base_encoding
    }

    /// Returns the parts emitted so far.
    #[must_use]
    pub fn parts(&self) -> &[EmittedPart] {
        &self.parts
    }

    /// Moves the emitted parts out, leaving the list empty.
    pub fn take_parts(&mut self) -> Vec<EmittedPart> {
        std::mem::take(&mut self.parts)
    }

    /// Returns the number of bytes held but not yet emitted as a part.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.pending.len() + self.backup.len()
    }

    fn scan(&mut self, input: &[u8], is_final: bool, out: &mut Vec<u8>) {
        self.lifecycle.enter(is_final);

        let data = self.backup.prepend(input);
        let data = data.as_ref();
        let mut pos = 0;

        while pos < data.len() {
            let end = match next_line_end(&data[pos..]) {
                Some(len) => pos + len,
                None if is_final => data.len(),
                None => {
                    trace!(bytes = data.len() - pos, "pushing back partial line");
                    self.backup.save(&data[pos..]);
                    break;
                }
            };
            let line = &data[pos..end];
            self.scan_line(line);
            out.extend_from_slice(line);
            pos = end;
        }

        if is_final {
            self.flush();
            if self.state != ScanState::Plain {
                debug!(state = %self.state, "stream ended inside block");
                self.state = ScanState::Plain;
            }
        }
    }

    fn scan_line(&mut self, line: &[u8]) {
        let visible = trim_eol(line);

        match self.state {
            ScanState::Plain => {}
            ScanState::Uuencode if visible == b"end" || is_uuencode_data(visible) => {
                self.pending.extend_from_slice(line);
                if visible == b"end" {
                    self.close_block();
                }
                return;
            }
            ScanState::Uuencode => {
                // Not uuencode after all: the begin line and anything since
                // become plain text, and this line is read again as plain.
                debug!(
                    filename = self.filename.as_deref(),
                    "uuencode length check failed, treating block as plain text"
                );
                self.state = ScanState::Plain;
                self.filename = None;
            }
            state => {
                self.pending.extend_from_slice(line);
                if state.is_end_line(visible) {
                    self.close_block();
                }
                return;
            }
        }

        if let Some(start) = detect_start(visible) {
            self.open_block(start);
        }
        self.pending.extend_from_slice(line);
    }

    fn open_block(&mut self, start: Start<'_>) {
        let next = start.state();
        if !self.config.detectors.enabled(next) {
            return;
        }

        self.flush();
        if let Start::Uuencode(raw_name) = start {
            let name = decode_filename(raw_name, self.base_type.charset());
            debug!(filename = %name, "uuencode block started");
            self.filename = Some(name);
        } else {
            debug!(state = %next, "block started");
        }
        self.state = next;
    }

    fn close_block(&mut self) {
        debug!(state = %self.state, "block ended");
        self.flush();
        self.state = ScanState::Plain;
    }

    /// Emits the pending bytes as a part tagged with the current state.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }

        let bytes = std::mem::take(&mut self.pending);
        let mut part = EmittedPart::materialize(
            self.state,
            &self.base_type,
            self.base_encoding,
            self.filename.take(),
            bytes,
        );
        if self.config.sniff_octet_stream && part.refine_type(self.sniffer.as_ref()) {
            debug!(content_type = %part.content_type, "sniffed part type");
        }

        trace!(
            state = %part.state,
            content_type = %part.content_type,
            len = part.len(),
            "emitting part"
        );
        self.parts.push(part);
    }
}

impl Filter for InlineScanner {
    fn filter(&mut self, input: &[u8], out: &mut Vec<u8>) {
        self.scan(input, false, out);
    }

    fn complete(&mut self, input: &[u8], out: &mut Vec<u8>) {
        self.scan(input, true, out);
    }

    fn reset(&mut self) {
        self.state = ScanState::Plain;
        self.pending.clear();
        self.filename = None;
        self.backup.clear();
        self.parts.clear();
        self.lifecycle.reset();
    }
}

impl fmt::Debug for InlineScanner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InlineScanner")
            .field("config", &self.config)
            .field("base_type", &self.base_type)
            .field("base_encoding", &self.base_encoding)
            .field("state", &self.state)
            .field("pending", &self.pending.len())
            .field("filename", &self.filename)
            .field("backup", &self.backup.len())
            .field("parts", &self.parts.len())
            .finish_non_exhaustive()
    }
}

/// Scans a complete buffer in one call and returns its parts.
#[must_use]
pub fn scan(
    input: &[u8],
    base_type: ContentType,
    base_encoding: TransferEncoding,
) -> Vec<EmittedPart> {
    let mut scanner = InlineScanner::new(base_type, base_encoding);
    let mut passthrough = Vec::with_capacity(input.len());
    scanner.complete(input, &mut passthrough);
    scanner.take_parts()
}
