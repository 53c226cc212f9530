//! Error types for StatParty

use std::io;
use thiserror::Error;

/// Result type for StatParty operations
pub type Result<T> = std::result::Result<T, StatPartyError>;

/// Errors that can occur in StatParty
#[derive(Debug, Error)]
pub enum StatPartyError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Replay file shorter than the region a field needs
    #[error("Replay truncated: need {needed} bytes, have {actual}")]
    Truncated {
        /// Bytes required to read the field
        needed: usize,
        /// Bytes actually available
        actual: usize,
    },

    /// Magic tag is not `RPLY`
    #[error("Invalid replay format: bad magic tag {found:?}")]
    InvalidFormat {
        /// The four bytes found where the magic tag belongs
        found: [u8; 4],
    },

    /// Replay format version other than the supported one
    #[error("Unsupported replay version {found} (only version {supported} is supported)")]
    UnsupportedVersion {
        /// Version field read from the file
        found: u32,
        /// The single version this decoder accepts
        supported: u32,
    },

    /// Player name bytes are not valid UTF-8
    #[error("Invalid text in {field} name field")]
    InvalidText {
        /// Which name field failed to decode
        field: &'static str,
    },

    /// Result code or map ID missing from its lookup table
    #[error("Unknown {table} value {value}")]
    UnknownEnumValue {
        /// Lookup table the value was checked against
        table: &'static str,
        /// Raw value read from the file
        value: u32,
    },

    /// Watermark/config file is malformed
    #[error("Corrupt watermark file: {0}")]
    ConfigCorrupt(String),
}
