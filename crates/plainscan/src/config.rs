//! Scanner configuration types.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::scanner::ScanState;

/// Which inline legacy formats the scanner recognises.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[allow(clippy::struct_excessive_bools)] // One switch per format reads better than a bitmask
pub struct Detectors {
    /// `begin NNN name` ... `end` blocks.
    pub uuencode: bool,
    /// BinHex 4.0 banners.
    pub binhex: bool,
    /// `%!PS-Adobe-` documents.
    pub postscript: bool,
    /// PGP clear-signed messages.
    pub pgp_signed: bool,
    /// PGP encrypted messages.
    pub pgp_encrypted: bool,
}

impl Detectors {
    /// Every detector enabled.
    pub const ALL: Self = Self {
        uuencode: true,
        binhex: true,
        postscript: true,
        pgp_signed: true,
        pgp_encrypted: true,
    };

    /// Every detector disabled; the whole stream stays plain.
    pub const NONE: Self = Self {
        uuencode: false,
        binhex: false,
        postscript: false,
        pgp_signed: false,
        pgp_encrypted: false,
    };

    /// Returns true if blocks entering `state` should be recognised.
    #[must_use]
    pub const fn enabled(self, state: ScanState) -> bool {
        match state {
            ScanState::Plain => true,
            ScanState::Uuencode => self.uuencode,
            ScanState::BinHex => self.binhex,
            ScanState::PostScript => self.postscript,
            ScanState::PgpSigned => self.pgp_signed,
            ScanState::PgpEncrypted => self.pgp_encrypted,
        }
    }
}

impl Default for Detectors {
    fn default() -> Self {
        Self::ALL
    }
}

impl FromStr for Detectors {
    type Err = Error;

    /// Parses a comma-separated list such as `uuencode, pgp`.
    ///
    /// Accepted names: `uuencode`, `binhex`, `postscript`, `pgp-signed`,
    /// `pgp-encrypted`, `pgp` (both PGP kinds), `all` and `none`.
    fn from_str(s: &str) -> Result<Self> {
        let mut detectors = Self::NONE;
        for name in s.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            match name.to_ascii_lowercase().as_str() {
                "uuencode" | "uue" => detectors.uuencode = true,
                "binhex" => detectors.binhex = true,
                "postscript" | "ps" => detectors.postscript = true,
                "pgp-signed" => detectors.pgp_signed = true,
                "pgp-encrypted" => detectors.pgp_encrypted = true,
                "pgp" => {
                    detectors.pgp_signed = true;
                    detectors.pgp_encrypted = true;
                }
                "all" => detectors = Self::ALL,
                "none" => detectors = Self::NONE,
                other => return Err(Error::Config(format!("unknown detector: {other}"))),
            }
        }
        Ok(detectors)
    }
}

/// Inline scanner configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ScannerConfig {
    /// Recognised formats.
    pub detectors: Detectors,
    /// Ask the type sniffer to refine `application/octet-stream` parts.
    pub sniff_octet_stream: bool,
}

impl ScannerConfig {
    /// Creates the default configuration: all detectors on, sniffing on.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            detectors: Detectors::ALL,
            sniff_octet_stream: true,
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub const fn builder() -> ScannerConfigBuilder {
        ScannerConfigBuilder::new()
    }
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for scanner configuration.
#[derive(Debug, Clone, Copy)]
pub struct ScannerConfigBuilder {
    config: ScannerConfig,
}

impl ScannerConfigBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            config: ScannerConfig::new(),
        }
    }

    /// Sets the recognised formats.
    #[must_use]
    pub const fn detectors(mut self, detectors: Detectors) -> Self {
        self.config.detectors = detectors;
        self
    }

    /// Sets the recognised formats from a comma-separated list.
    ///
    /// # Errors
    ///
    /// Returns an error if a name is not a known detector.
    pub fn detector_list(self, list: &str) -> Result<Self> {
        Ok(self.detectors(list.parse()?))
    }

    /// Enables or disables type sniffing of `application/octet-stream` parts.
    #[must_use]
    pub const fn sniff_octet_stream(mut self, enabled: bool) -> Self {
        self.config.sniff_octet_stream = enabled;
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub const fn build(self) -> ScannerConfig {
        self.config
    }
}

impl Default for ScannerConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
