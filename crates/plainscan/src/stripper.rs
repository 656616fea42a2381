//! Signature stripping.
//!
//! Truncates a stream at the first line that is exactly `-- \n`, the
//! conventional signature separator. The separator line and everything after
//! it are dropped; everything before passes through untouched. A stream
//! without a separator comes out unchanged.

use tracing::{debug, trace};

use crate::filter::{Backup, Filter, Lifecycle, next_line_end};

/// The signature separator line.
pub const SIGNATURE_DELIMITER: &[u8] = b"-- \n";

/// Streaming filter removing a trailing signature block.
///
/// Lookahead is bounded: at most the first three bytes of a line are held
/// back while they could still turn out to be the separator.
#[derive(Debug, Default)]
pub struct SignatureStripper {
    backup: Backup,
    mid_line: bool,
    truncated: bool,
    lifecycle: Lifecycle,
}

impl SignatureStripper {
    /// Creates a new stripper.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true once the separator has been seen.
    #[must_use]
    pub const fn is_truncated(&self) -> bool {
        self.truncated
    }

    fn strip(&mut self, input: &[u8], is_final: bool, out: &mut Vec<u8>) {
        self.lifecycle.enter(is_final);
        if self.truncated {
            return;
        }

        let data = self.backup.prepend(input);
        let data = data.as_ref();
        let mut pos = 0;

        // The rest of a line already known not to be the separator
        if self.mid_line {
            match next_line_end(data) {
                Some(len) => {
                    pos = len;
                    self.mid_line = false;
                }
                None => {
                    out.extend_from_slice(data);
                    return;
                }
            }
        }

        while pos < data.len() {
            let rest = &data[pos..];
            if rest.starts_with(SIGNATURE_DELIMITER) {
                debug!(offset = pos, "signature separator found, truncating");
                self.truncated = true;
                break;
            }

            match next_line_end(rest) {
                Some(len) => pos += len,
                None if !is_final && SIGNATURE_DELIMITER.starts_with(rest) => {
                    trace!(bytes = rest.len(), "holding back possible separator");
                    self.backup.save(rest);
                    break;
                }
                None => {
                    self.mid_line = !is_final;
                    pos = data.len();
                }
            }
        }

        out.extend_from_slice(&data[..pos]);
    }
}

impl Filter for SignatureStripper {
    fn filter(&mut self, input: &[u8], out: &mut Vec<u8>) {
        self.strip(input, false, out);
    }

    fn complete(&mut self, input: &[u8], out: &mut Vec<u8>) {
        self.strip(input, true, out);
    }

    fn reset(&mut self) {
        self.backup.clear();
        self.mid_line = false;
        self.truncated = false;
        self.lifecycle.reset();
    }
}

/// Strips the signature from a complete buffer.
#[must_use]
pub fn strip_signature(input: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(input.len());
    SignatureStripper::new().complete(input, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(chunks: &[&[u8]]) -> Vec<u8> {
        SignatureStripper::new().run(chunks.iter().copied())
    }

    #[test]
    fn test_strips_signature() {
        assert_eq!(strip_signature(b"Hi there.\n-- \nJohn\n"), b"Hi there.\n");
    }

    #[test]
    fn test_no_signature_is_unchanged() {
        assert_eq!(strip_signature(b"Hi there.\nJohn\n"), b"Hi there.\nJohn\n");
        assert_eq!(strip_signature(b"no newline"), b"no newline");
        assert_eq!(strip_signature(b""), b"");
    }

    #[test]
    fn test_separator_must_be_whole_line() {
        assert_eq!(strip_signature(b"a -- \nb\n"), b"a -- \nb\n");
        assert_eq!(strip_signature(b"--\nb\n"), b"--\nb\n");
        assert_eq!(strip_signature(b"-- x\nb\n"), b"-- x\nb\n");
        assert_eq!(strip_signature(b"-- \r\nb\n"), b"-- \r\nb\n");
        // Unterminated at end of stream is not a separator
        assert_eq!(strip_signature(b"a\n-- "), b"a\n-- ");
    }

    #[test]
    fn test_separator_at_start() {
        assert_eq!(strip_signature(b"-- \nsig\n"), b"");
    }

    #[test]
    fn test_separator_split_across_chunks() {
        assert_eq!(run(&[b"Hi there.\n-", b"- \nJohn\n"]), b"Hi there.\n");
        assert_eq!(run(&[b"Hi there.\n-- ", b"\nJohn\n"]), b"Hi there.\n");
        assert_eq!(run(&[b"Hi", b" there.\n", b"-", b"-", b" ", b"\n", b"John"]), b"Hi there.\n");
    }

    #[test]
    fn test_long_line_passes_through_mid_line() {
        let mut stripper = SignatureStripper::new();
        let mut out = Vec::new();
        stripper.filter(b"a long line", &mut out);
        assert_eq!(out, b"a long line");
        stripper.filter(b" continues -- \n", &mut out);
        stripper.filter(b"-- \nsig", &mut out);
        assert!(stripper.is_truncated());
        stripper.complete(b"more", &mut out);
        assert_eq!(out, b"a long line continues -- \n");
    }

    #[test]
    fn test_reset() {
        let mut stripper = SignatureStripper::new();
        let mut out = Vec::new();
        stripper.filter(b"x\n-- \n", &mut out);
        assert!(stripper.is_truncated());
        stripper.reset();
        assert!(!stripper.is_truncated());

        out.clear();
        stripper.complete(b"fresh\n", &mut out);
        assert_eq!(out, b"fresh\n");
    }

    #[test]
    #[should_panic(expected = "after complete()")]
    fn test_complete_twice_panics() {
        let mut stripper = SignatureStripper::new();
        let mut out = Vec::new();
        stripper.complete(b"", &mut out);
        stripper.complete(b"", &mut out);
    }
}
