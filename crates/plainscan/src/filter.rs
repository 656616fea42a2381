//! Streaming filter contract.
//!
//! A filter is fed a logical byte stream in arbitrary chunks: zero or more
//! [`Filter::filter`] calls followed by exactly one [`Filter::complete`].
//! Output is appended to a caller-owned buffer. Bytes a filter cannot decide
//! on yet are kept in a [`Backup`] and re-presented in front of the next
//! chunk, so results never depend on where the chunk boundaries fall.

use std::borrow::Cow;

/// Push-based incremental transform.
pub trait Filter {
    /// Processes a non-final chunk, appending whatever output is ready to `out`.
    ///
    /// # Panics
    ///
    /// Panics if the stream was already completed and not reset.
    fn filter(&mut self, input: &[u8], out: &mut Vec<u8>);

    /// Processes the final chunk and flushes everything still buffered.
    ///
    /// # Panics
    ///
    /// Panics if the stream was already completed and not reset.
    fn complete(&mut self, input: &[u8], out: &mut Vec<u8>);

    /// Clears all state so the instance can process a fresh stream.
    fn reset(&mut self);

    /// Feeds every chunk in order, completes the stream and returns the output.
    fn run<I, B>(&mut self, chunks: I) -> Vec<u8>
    where
        Self: Sized,
        I: IntoIterator<Item = B>,
        B: AsRef<[u8]>,
    {
        let mut out = Vec::new();
        for chunk in chunks {
            self.filter(chunk.as_ref(), &mut out);
        }
        self.complete(&[], &mut out);
        out
    }
}

/// Pushback buffer: unconsumed trailing bytes of one chunk, re-delivered as
/// the prefix of the next.
#[derive(Debug, Clone, Default)]
pub struct Backup {
    buf: Vec<u8>,
}

impl Backup {
    /// Creates an empty pushback buffer.
    #[must_use]
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Stores `bytes` for re-delivery, replacing anything held before.
    pub fn save(&mut self, bytes: &[u8]) {
        self.buf.clear();
        self.buf.extend_from_slice(bytes);
    }

    /// Returns `input` with the held bytes in front of it, emptying the buffer.
    ///
    /// Borrows `input` unchanged when nothing is held.
    pub fn prepend<'a>(&mut self, input: &'a [u8]) -> Cow<'a, [u8]> {
        if self.buf.is_empty() {
            return Cow::Borrowed(input);
        }
        let mut joined = std::mem::take(&mut self.buf);
        joined.extend_from_slice(input);
        Cow::Owned(joined)
    }

    /// Returns the held bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Returns the number of held bytes.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing is held.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Drops the held bytes.
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Tracks the filter lifecycle so misuse fails loudly.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Lifecycle {
    completed: bool,
}

impl Lifecycle {
    /// Asserts the stream is still open; marks it closed when `is_final`.
    pub(crate) fn enter(&mut self, is_final: bool) {
        assert!(
            !self.completed,
            "filter fed after complete(); call reset() before starting a new stream"
        );
        self.completed = is_final;
    }

    pub(crate) fn reset(&mut self) {
        self.completed = false;
    }
}

/// Returns the index just past the next `\n` in `data`, if any.
pub(crate) fn next_line_end(data: &[u8]) -> Option<usize> {
    data.iter().position(|&b| b == b'\n').map(|i| i + 1)
}

/// Strips trailing `\r` and `\n` bytes from a line.
pub(crate) fn trim_eol(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&b| b != b'\n' && b != b'\r')
        .map_or(0, |i| i + 1);
    &line[..end]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_prepend_borrows_when_empty() {
        let mut backup = Backup::new();
        let joined = backup.prepend(b"abc");
        assert!(matches!(joined, Cow::Borrowed(b"abc")));
    }

    #[test]
    fn test_backup_prepend_joins_and_empties() {
        let mut backup = Backup::new();
        backup.save(b"beg");
        assert_eq!(backup.len(), 3);
        assert_eq!(backup.as_bytes(), b"beg");

        let joined = backup.prepend(b"in 644 x\n");
        assert_eq!(joined.as_ref(), b"begin 644 x\n");
        assert!(backup.is_empty());
    }

    #[test]
    fn test_backup_save_replaces() {
        let mut backup = Backup::new();
        backup.save(b"one");
        backup.save(b"two");
        assert_eq!(backup.as_bytes(), b"two");
        backup.clear();
        assert!(backup.is_empty());
    }

    #[test]
    fn test_lifecycle() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.enter(false);
        lifecycle.enter(true);
        lifecycle.reset();
        lifecycle.enter(true);
    }

    #[test]
    #[should_panic(expected = "after complete()")]
    fn test_lifecycle_double_complete_panics() {
        let mut lifecycle = Lifecycle::default();
        lifecycle.enter(true);
        lifecycle.enter(true);
    }

    #[test]
    fn test_line_helpers() {
        assert_eq!(next_line_end(b"ab\ncd"), Some(3));
        assert_eq!(next_line_end(b"abcd"), None);
        assert_eq!(trim_eol(b"end\r\n"), b"end");
        assert_eq!(trim_eol(b"end"), b"end");
        assert_eq!(trim_eol(b"\r\n"), b"");
    }
}
