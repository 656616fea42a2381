//! Typed segments produced by the inline scanner.

use plainscan_mime::{ContentType, TransferEncoding, TypeSniffer};

use super::state::ScanState;

/// A contiguous, typed run of bytes from the scanned stream.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EmittedPart {
    /// The region kind the bytes were collected in.
    pub state: ScanState,
    /// Content type; parameters of the enclosing part are preserved.
    pub content_type: ContentType,
    /// Transfer encoding of the bytes as they stand.
    pub transfer_encoding: TransferEncoding,
    /// Filename from a uuencode `begin` line.
    pub filename: Option<String>,
    /// The raw segment bytes, markers included, never transcoded.
    pub bytes: Vec<u8>,
}

impl EmittedPart {
    /// Builds a part for bytes collected in `state`.
    ///
    /// Plain-like states inherit the enclosing type and encoding; encoded
    /// states get their fixed type with the enclosing parameters kept.
    pub(crate) fn materialize(
        state: ScanState,
        base_type: &ContentType,
        base_encoding: TransferEncoding,
        filename: Option<String>,
        bytes: Vec<u8>,
    ) -> Self {
        let (content_type, transfer_encoding) = match state.fixed_type() {
            Some((main, sub, encoding)) => (base_type.with_essence(main, sub), encoding),
            None => (base_type.clone(), base_encoding),
        };

        Self {
            state,
            content_type,
            transfer_encoding,
            filename,
            bytes,
        }
    }

    /// Replaces a generic `application/octet-stream` type with a sniffed guess.
    ///
    /// Returns true if the type changed.
    pub(crate) fn refine_type(&mut self, sniffer: &dyn TypeSniffer) -> bool {
        if !self.content_type.is_octet_stream() {
            return false;
        }
        match sniffer.sniff(&self.bytes, self.filename.as_deref()) {
            Some(guess) if !guess.is_octet_stream() => {
                self.content_type = self
                    .content_type
                    .with_essence(&guess.main_type, &guess.sub_type);
                true
            }
            _ => false,
        }
    }

    /// Returns the number of bytes in the part.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the part holds no bytes. Emitted parts never do.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the bytes as text, replacing invalid UTF-8.
    #[must_use]
    pub fn text_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }
}
