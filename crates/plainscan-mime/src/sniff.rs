//! Best-guess content type detection.
//!
//! The scanner only asks for a guess when a part would otherwise be labelled
//! `application/octet-stream`, so a sniffer returning `None` (or the same
//! generic type) simply leaves the part as it was.

use crate::content_type::ContentType;

/// Guesses a MIME type from a buffer and/or a filename.
pub trait TypeSniffer {
    /// Returns a best-guess content type, or `None` when nothing is known.
    fn sniff(&self, data: &[u8], filename: Option<&str>) -> Option<ContentType>;
}

impl<F> TypeSniffer for F
where
    F: Fn(&[u8], Option<&str>) -> Option<ContentType>,
{
    fn sniff(&self, data: &[u8], filename: Option<&str>) -> Option<ContentType> {
        self(data, filename)
    }
}

/// Filename extension table, lowercase extension to `type/subtype`.
const EXTENSIONS: &[(&str, &str, &str)] = &[
    ("jpg", "image", "jpeg"),
    ("jpeg", "image", "jpeg"),
    ("png", "image", "png"),
    ("gif", "image", "gif"),
    ("webp", "image", "webp"),
    ("svg", "image", "svg+xml"),
    ("tif", "image", "tiff"),
    ("tiff", "image", "tiff"),
    ("mp4", "video", "mp4"),
    ("webm", "video", "webm"),
    ("mp3", "audio", "mpeg"),
    ("ogg", "audio", "ogg"),
    ("wav", "audio", "wav"),
    ("pdf", "application", "pdf"),
    ("ps", "application", "postscript"),
    ("zip", "application", "zip"),
    ("gz", "application", "gzip"),
    ("tgz", "application", "gzip"),
    ("tar", "application", "x-tar"),
    ("hqx", "application", "mac-binhex40"),
    ("doc", "application", "msword"),
    ("rtf", "application", "rtf"),
    ("txt", "text", "plain"),
    ("html", "text", "html"),
    ("htm", "text", "html"),
    ("csv", "text", "csv"),
];

/// Leading magic bytes to `type/subtype`.
const MAGIC: &[(&[u8], &str, &str)] = &[
    (b"%PDF-", "application", "pdf"),
    (b"%!PS", "application", "postscript"),
    (b"\x89PNG\r\n\x1a\n", "image", "png"),
    (b"GIF87a", "image", "gif"),
    (b"GIF89a", "image", "gif"),
    (b"\xff\xd8\xff", "image", "jpeg"),
    (b"PK\x03\x04", "application", "zip"),
    (b"\x1f\x8b", "application", "gzip"),
];

/// Default sniffer: filename extension first, then leading magic bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionSniffer;

impl ExtensionSniffer {
    /// Looks up a filename's extension.
    #[must_use]
    pub fn from_filename(filename: &str) -> Option<ContentType> {
        let (_, ext) = filename.trim().rsplit_once('.')?;
        let ext = ext.to_ascii_lowercase();
        EXTENSIONS
            .iter()
            .find(|(e, _, _)| *e == ext)
            .map(|(_, main, sub)| ContentType::new(*main, *sub))
    }

    /// Looks for a known signature at the start of `data`.
    #[must_use]
    pub fn from_magic(data: &[u8]) -> Option<ContentType> {
        MAGIC
            .iter()
            .find(|(magic, _, _)| data.starts_with(magic))
            .map(|(_, main, sub)| ContentType::new(*main, *sub))
    }
}

impl TypeSniffer for ExtensionSniffer {
    fn sniff(&self, data: &[u8], filename: Option<&str>) -> Option<ContentType> {
        filename
            .and_then(Self::from_filename)
            .or_else(|| Self::from_magic(data))
    }
}
