//! Scanner states and the line patterns that move between them.

use std::fmt;

use plainscan_mime::TransferEncoding;

/// The kind of region the scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum ScanState {
    /// Ordinary text.
    #[default]
    Plain,
    /// Between `begin NNN name` and `end`.
    Uuencode,
    /// After the BinHex 4.0 banner.
    BinHex,
    /// Inside a `%!PS-Adobe-` document.
    PostScript,
    /// Inside a PGP clear-signed message.
    PgpSigned,
    /// Inside a PGP encrypted message.
    PgpEncrypted,
}

impl ScanState {
    /// Returns true for states whose parts keep the enclosing type and encoding.
    #[must_use]
    pub const fn is_plain_like(self) -> bool {
        matches!(self, Self::Plain | Self::PgpSigned | Self::PgpEncrypted)
    }

    /// Returns the fixed `(type, subtype, encoding)` for encoded states.
    #[must_use]
    pub const fn fixed_type(self) -> Option<(&'static str, &'static str, TransferEncoding)> {
        match self {
            Self::Uuencode => Some(("application", "octet-stream", TransferEncoding::Uuencode)),
            Self::BinHex => Some(("application", "mac-binhex40", TransferEncoding::SevenBit)),
            Self::PostScript => Some(("application", "postscript", TransferEncoding::SevenBit)),
            Self::Plain | Self::PgpSigned | Self::PgpEncrypted => None,
        }
    }

    /// Returns the short lowercase name used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Uuencode => "uuencode",
            Self::BinHex => "binhex",
            Self::PostScript => "postscript",
            Self::PgpSigned => "pgp-signed",
            Self::PgpEncrypted => "pgp-encrypted",
        }
    }

    /// Returns true if `line` (terminator stripped) closes a block of this kind.
    ///
    /// Uuencode is handled separately because its data lines are validated.
    pub(crate) fn is_end_line(self, line: &[u8]) -> bool {
        match self {
            Self::Plain => false,
            Self::Uuencode => line == b"end",
            Self::BinHex => line.ends_with(b":"),
            Self::PostScript => line == b"%%EOF",
            Self::PgpSigned => line == b"-----END PGP SIGNATURE-----",
            Self::PgpEncrypted => line == b"-----END PGP MESSAGE-----",
        }
    }
}

impl fmt::Display for ScanState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a start marker is compared against a line.
#[derive(Clone, Copy)]
enum Match {
    Exact,
    Prefix,
}

/// Fixed start markers, checked only while plain.
const START_MARKERS: &[(&[u8], Match, ScanState)] = &[
    (
        b"(This file must be converted with BinHex 4.0)",
        Match::Exact,
        ScanState::BinHex,
    ),
    (b"%!PS-Adobe-", Match::Prefix, ScanState::PostScript),
    (
        b"-----BEGIN PGP SIGNED MESSAGE-----",
        Match::Exact,
        ScanState::PgpSigned,
    ),
    (
        b"-----BEGIN PGP MESSAGE-----",
        Match::Exact,
        ScanState::PgpEncrypted,
    ),
];

/// A block opening detected on a plain line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Start<'a> {
    /// `begin NNN name`, carrying the raw name bytes.
    Uuencode(&'a [u8]),
    /// One of the fixed banners.
    Banner(ScanState),
}

impl Start<'_> {
    pub(crate) const fn state(self) -> ScanState {
        match self {
            Self::Uuencode(_) => ScanState::Uuencode,
            Self::Banner(state) => state,
        }
    }
}

/// Classifies a plain line (terminator stripped) as a block opening.
pub(crate) fn detect_start(line: &[u8]) -> Option<Start<'_>> {
    if let Some(name) = uuencode_begin(line) {
        return Some(Start::Uuencode(name));
    }
    START_MARKERS
        .iter()
        .find(|(marker, how, _)| match how {
            Match::Exact => line == *marker,
            Match::Prefix => line.starts_with(marker),
        })
        .map(|&(_, _, state)| Start::Banner(state))
}

/// Matches `begin <3 octal digits> <name>` and returns the name.
fn uuencode_begin(line: &[u8]) -> Option<&[u8]> {
    let rest = line.strip_prefix(b"begin ")?;
    let (mode, rest) = rest.split_at_checked(3)?;
    if !mode.iter().all(|b| (b'0'..=b'7').contains(b)) {
        return None;
    }
    let name = rest.strip_prefix(b" ")?.trim_ascii();
    (!name.is_empty()).then_some(name)
}

/// Checks a uuencode data line (terminator stripped) against its length byte.
///
/// The first character declares `n = (c - 0x20) & 0x3f` decoded bytes; the
/// remaining characters carry up to `ceil(len / 4) * 3` bytes. Encoders pad
/// the last group, so `n` may be up to two less than that capacity.
pub(crate) fn is_uuencode_data(line: &[u8]) -> bool {
    let Some((&first, data)) = line.split_first() else {
        return false;
    };
    let declared = usize::from(first.wrapping_sub(b' ') & 0x3f);
    let capacity = data.len().div_ceil(4) * 3;
    (capacity.saturating_sub(2)..=capacity).contains(&declared)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_uuencode_begin() {
        assert_eq!(detect_start(b"begin 644 x"), Some(Start::Uuencode(b"x")));
        assert_eq!(
            detect_start(b"begin 600 my file.zip "),
            Some(Start::Uuencode(b"my file.zip"))
        );
        assert_eq!(detect_start(b"begin 644"), None);
        assert_eq!(detect_start(b"begin 644 "), None);
        assert_eq!(detect_start(b"begin 648 x"), None);
        assert_eq!(detect_start(b"begin 64 x"), None);
        assert_eq!(detect_start(b"beginning 644 x"), None);
    }

    #[test]
    fn test_detect_banners() {
        assert_eq!(
            detect_start(b"(This file must be converted with BinHex 4.0)"),
            Some(Start::Banner(ScanState::BinHex))
        );
        assert_eq!(
            detect_start(b"%!PS-Adobe-3.0"),
            Some(Start::Banner(ScanState::PostScript))
        );
        assert_eq!(
            detect_start(b"-----BEGIN PGP SIGNED MESSAGE-----"),
            Some(Start::Banner(ScanState::PgpSigned))
        );
        assert_eq!(
            detect_start(b"-----BEGIN PGP MESSAGE-----"),
            Some(Start::Banner(ScanState::PgpEncrypted))
        );
        assert_eq!(detect_start(b" -----BEGIN PGP MESSAGE-----"), None);
        assert_eq!(detect_start(b"-----BEGIN PGP MESSAGE----- trailing"), None);
        assert_eq!(detect_start(b"hello"), None);
    }

    #[test]
    fn test_end_lines() {
        assert!(ScanState::Uuencode.is_end_line(b"end"));
        assert!(!ScanState::Uuencode.is_end_line(b"end "));
        assert!(ScanState::BinHex.is_end_line(b"!!!:"));
        assert!(ScanState::PostScript.is_end_line(b"%%EOF"));
        assert!(ScanState::PgpSigned.is_end_line(b"-----END PGP SIGNATURE-----"));
        assert!(ScanState::PgpEncrypted.is_end_line(b"-----END PGP MESSAGE-----"));
        assert!(!ScanState::Plain.is_end_line(b"end"));
    }

    #[test]
    fn test_uuencode_length_check() {
        // 45 bytes in 60 characters, the standard full line
        let full = [b"M".as_slice(), &[b'A'; 60][..]].concat();
        assert!(is_uuencode_data(&full));
        // One byte in a single padded group
        assert!(is_uuencode_data(b"!!!!"));
        assert!(is_uuencode_data(b"!!!!!"));
        // Zero-length terminator lines
        assert!(is_uuencode_data(b"`"));
        assert!(is_uuencode_data(b" "));
        // Prose
        assert!(!is_uuencode_data(
            b"This is just prose that happens to start like that."
        ));
        assert!(!is_uuencode_data(b""));
    }

    #[test]
    fn test_fixed_types() {
        assert!(ScanState::Plain.is_plain_like());
        assert!(ScanState::PgpSigned.is_plain_like());
        assert!(!ScanState::BinHex.is_plain_like());
        assert_eq!(
            ScanState::Uuencode.fixed_type(),
            Some(("application", "octet-stream", TransferEncoding::Uuencode))
        );
        assert_eq!(ScanState::PgpEncrypted.fixed_type(), None);
        assert_eq!(ScanState::PostScript.to_string(), "postscript");
    }
}
