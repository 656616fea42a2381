//! MIME decoding utilities.
//!
//! Supports Base64, the RFC 2047 `Q` encoding and charset conversion of
//! encoded words, which together make up the filename decoder used for
//! uuencode `begin` lines.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use charset::Charset;

/// Decodes Base64 data.
///
/// # Errors
///
/// Returns an error if the input is not valid Base64.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    STANDARD.decode(data).map_err(Into::into)
}

/// Decodes the RFC 2047 `Q` encoding (quoted-printable with `_` for space).
///
/// # Errors
///
/// Returns an error if the input contains an invalid escape sequence.
pub fn decode_q(text: &str) -> Result<Vec<u8>> {
    let bytes = text.as_bytes();
    let mut result = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'_' => {
                result.push(b' ');
                i += 1;
            }
            b'=' => {
                let hex = bytes
                    .get(i + 1..i + 3)
                    .ok_or_else(|| Error::InvalidEncoding("Incomplete escape sequence".to_string()))?;
                let byte = std::str::from_utf8(hex)
                    .ok()
                    .and_then(|h| u8::from_str_radix(h, 16).ok())
                    .ok_or_else(|| {
                        Error::InvalidEncoding(format!(
                            "Invalid hex: {}",
                            String::from_utf8_lossy(hex)
                        ))
                    })?;
                result.push(byte);
                i += 3;
            }
            b => {
                result.push(b);
                i += 1;
            }
        }
    }

    Ok(result)
}

/// Converts bytes in the named charset to a string.
///
/// Malformed sequences are replaced rather than rejected.
///
/// # Errors
///
/// Returns an error if the charset label is unknown.
pub fn decode_charset(bytes: &[u8], label: &str) -> Result<String> {
    let charset = Charset::for_label_no_replacement(label.trim().as_bytes())
        .ok_or_else(|| Error::UnknownCharset(label.to_string()))?;
    let (decoded, _malformed) = charset.decode_without_bom_handling(bytes);
    Ok(decoded.into_owned())
}

/// A parsed `=?charset?encoding?text?=` word, borrowed from its source.
struct EncodedWord<'a> {
    charset: &'a str,
    encoding: u8,
    text: &'a str,
}

impl EncodedWord<'_> {
    fn decode(&self) -> Result<String> {
        let bytes = match self.encoding.to_ascii_uppercase() {
            b'B' => decode_base64(self.text)?,
            b'Q' => decode_q(self.text)?,
            other => {
                return Err(Error::InvalidEncoding(format!(
                    "Unknown encoding: {}",
                    char::from(other)
                )));
            }
        };
        // RFC 2231 allows a language suffix: charset*lang
        let charset = self.charset.split('*').next().unwrap_or(self.charset);
        decode_charset(&bytes, charset)
    }
}

/// Parses an encoded word at the start of `s`, returning it and its length.
fn parse_encoded_word(s: &str) -> Option<(EncodedWord<'_>, usize)> {
    let inner = s.strip_prefix("=?")?;
    let charset_end = inner.find('?')?;
    let charset = &inner[..charset_end];
    if charset.is_empty() || charset.contains(char::is_whitespace) {
        return None;
    }

    let after = &inner[charset_end + 1..];
    let bytes = after.as_bytes();
    if bytes.len() < 2 || !bytes[0].is_ascii_alphabetic() || bytes[1] != b'?' {
        return None;
    }
    let encoding = bytes[0];

    let body = &after[2..];
    let text_end = body.find("?=")?;
    let text = &body[..text_end];
    if text.contains(char::is_whitespace) {
        return None;
    }

    let consumed = 2 + charset_end + 1 + 2 + text_end + 2;
    Some((
        EncodedWord {
            charset,
            encoding,
            text,
        },
        consumed,
    ))
}

/// Decodes every RFC 2047 encoded word in a header value.
///
/// Text outside encoded words is kept as is. Whitespace between two adjacent
/// encoded words is dropped, as RFC 2047 section 6.2 requires.
///
/// # Errors
///
/// Returns an error if an encoded word has an unknown encoding, an unknown
/// charset, or an invalid payload.
pub fn decode_rfc2047(text: &str) -> Result<String> {
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    let mut after_word = false;

    while let Some(start) = rest.find("=?") {
        let literal = &rest[..start];
        if let Some((word, consumed)) = parse_encoded_word(&rest[start..]) {
            if !(after_word && literal.chars().all(char::is_whitespace)) {
                result.push_str(literal);
            }
            result.push_str(&word.decode()?);
            rest = &rest[start + consumed..];
            after_word = true;
        } else {
            result.push_str(&rest[..start + 2]);
            rest = &rest[start + 2..];
            after_word = false;
        }
    }

    result.push_str(rest);
    Ok(result)
}

/// Decodes a raw header fragment into a display filename.
///
/// Raw bytes that are not UTF-8 are interpreted in `charset_hint` (usually
/// the charset of the enclosing text part), falling back to lossy UTF-8.
/// Encoded words are then decoded; if that fails the undecoded text is
/// returned. This never fails.
#[must_use]
pub fn decode_filename(raw: &[u8], charset_hint: Option<&str>) -> String {
    let text = match std::str::from_utf8(raw) {
        Ok(s) => s.to_string(),
        Err(_) => charset_hint
            .and_then(|label| decode_charset(raw, label).ok())
            .unwrap_or_else(|| String::from_utf8_lossy(raw).into_owned()),
    };

    let text = text.trim();
    decode_rfc2047(text).unwrap_or_else(|_| text.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decode() {
        assert_eq!(decode_base64("SGVsbG8sIFdvcmxkIQ==").unwrap(), b"Hello, World!");
        assert!(decode_base64("not base64!").is_err());
    }

    #[test]
    fn test_decode_q() {
        assert_eq!(decode_q("H=C3=A9llo_world").unwrap(), "Héllo world".as_bytes());
        assert!(decode_q("bad=G1").is_err());
        assert!(decode_q("short=4").is_err());
    }

    #[test]
    fn test_decode_charset() {
        assert_eq!(decode_charset(&[0x63, 0x61, 0x66, 0xE9], "iso-8859-1").unwrap(), "café");
        assert!(matches!(
            decode_charset(b"x", "no-such-charset"),
            Err(Error::UnknownCharset(_))
        ));
    }

    #[test]
    fn test_rfc2047_plain_text_untouched() {
        assert_eq!(decode_rfc2047("report.pdf").unwrap(), "report.pdf");
        assert_eq!(decode_rfc2047("a =? b").unwrap(), "a =? b");
    }

    #[test]
    fn test_rfc2047_base64() {
        assert_eq!(decode_rfc2047("=?utf-8?B?SMOpbGxv?=").unwrap(), "Héllo");
    }

    #[test]
    fn test_rfc2047_quoted_printable() {
        assert_eq!(decode_rfc2047("=?utf-8?Q?H=C3=A9llo?=").unwrap(), "Héllo");
        assert_eq!(decode_rfc2047("=?ISO-8859-1?q?caf=E9?=").unwrap(), "café");
    }

    #[test]
    fn test_rfc2047_adjacent_words_and_literals() {
        let decoded = decode_rfc2047("=?utf-8?Q?foo?= =?utf-8?Q?bar?=.txt").unwrap();
        assert_eq!(decoded, "foobar.txt");

        let decoded = decode_rfc2047("my =?utf-8?Q?file?= name").unwrap();
        assert_eq!(decoded, "my file name");
    }

    #[test]
    fn test_rfc2047_language_suffix() {
        assert_eq!(decode_rfc2047("=?utf-8*en?Q?hi?=").unwrap(), "hi");
    }

    #[test]
    fn test_rfc2047_unknown_encoding() {
        assert!(decode_rfc2047("=?utf-8?X?abc?=").is_err());
    }

    #[test]
    fn test_decode_filename_fallbacks() {
        assert_eq!(decode_filename(b"  x.zip \r", None), "x.zip");
        assert_eq!(decode_filename(b"=?utf-8?B?SMOpbGxv?=.txt", None), "Héllo.txt");
        assert_eq!(decode_filename(&[0x63, 0x61, 0x66, 0xE9], Some("iso-8859-1")), "café");
        assert_eq!(decode_filename(&[0x61, 0xFF], None), "a\u{FFFD}");
        // Undecodable words are kept verbatim
        assert_eq!(decode_filename(b"=?bogus?Q?x?=", None), "=?bogus?Q?x?=");
    }

    proptest::proptest! {
        #[test]
        fn test_text_without_encoded_words_is_unchanged(text in "[^=]*") {
            proptest::prop_assert_eq!(decode_rfc2047(&text).unwrap(), text);
        }

        #[test]
        fn test_decode_filename_never_panics(raw in proptest::collection::vec(proptest::prelude::any::<u8>(), 0..64)) {
            let _ = decode_filename(&raw, Some("iso-8859-1"));
            let _ = decode_filename(&raw, None);
        }
    }
}
