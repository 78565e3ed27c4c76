//! Error types for crclab-core.
//!
//! Every failure is an input-validation failure detected before any
//! division work begins. None are transient: the caller has to supply
//! corrected input.
//!
//! # Error Categories
//!
//! - **Input errors**: `InvalidBitCharacter`, `InvalidHexCharacter`, `EmptyInput`,
//!   `CodewordTooShort`, `VectorTooLong`, `MalformedPosition`
//! - **Config errors**: `UnsupportedWidth`, `MalformedPolynomial`, `UnknownPolynomial`,
//!   `DuplicatePolynomial`, `InvalidSetting`

/// Result type alias for crclab-core operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed bit/hex text, empty data, codeword shorter than the CRC width.
    InvalidInput,
    /// Width out of the supported range, malformed or unknown polynomial.
    InvalidConfig,
}

/// Errors that can occur during crclab-core operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    // ==================== Input Errors ====================
    /// A bit string contained something other than `'0'` or `'1'`.
    #[error("invalid bit character {character:?} at position {position}")]
    InvalidBitCharacter {
        /// The offending character.
        character: char,
        /// Zero-based character index.
        position: usize,
    },

    /// A hex string contained a non-hexadecimal character.
    #[error("invalid hex character {character:?} at position {position}")]
    InvalidHexCharacter {
        /// The offending character.
        character: char,
        /// Zero-based character index.
        position: usize,
    },

    /// Input must contain at least one digit.
    #[error("input cannot be empty")]
    EmptyInput,

    /// Codeword has no room for a CRC field.
    #[error("codeword too short: {len} bits, CRC width is {width}")]
    CodewordTooShort {
        /// Codeword length in bits.
        len: usize,
        /// CRC width of the polynomial.
        width: u32,
    },

    /// Error vector does not fit on the codeword it is applied to.
    #[error("error vector of {vector_len} bits is longer than codeword of {codeword_len} bits")]
    VectorTooLong {
        /// Vector length in bits.
        vector_len: usize,
        /// Codeword length in bits.
        codeword_len: usize,
    },

    /// A bit position in a position list is not a non-negative integer.
    #[error("malformed bit position {token:?}: must be a non-negative integer")]
    MalformedPosition {
        /// The token as written.
        token: String,
    },

    // ==================== Config Errors ====================
    /// CRC width outside `1..=32`.
    #[error("unsupported CRC width {width}: must be between 1 and {max}", max = crate::registry::MAX_WIDTH)]
    UnsupportedWidth {
        /// The rejected width.
        width: u32,
    },

    /// Polynomial does not have exactly `width + 1` significant bits.
    #[error("malformed polynomial {polynomial:#x} for width {width}: leading bit must be bit {width}")]
    MalformedPolynomial {
        /// The rejected polynomial value.
        polynomial: u64,
        /// The declared width.
        width: u32,
    },

    /// No registry entry with this name.
    #[error("unknown polynomial {name:?}")]
    UnknownPolynomial {
        /// Requested name.
        name: String,
    },

    /// A registry entry with this name already exists.
    #[error("polynomial {name:?} is already registered")]
    DuplicatePolynomial {
        /// Conflicting name.
        name: String,
    },

    /// A configuration value could not be parsed.
    #[error("invalid value {value:?} for setting {key}")]
    InvalidSetting {
        /// Setting (environment variable) name.
        key: String,
        /// The value as found.
        value: String,
    },
}

impl Error {
    /// Classify this error as an input or a configuration problem.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidBitCharacter { .. }
            | Error::InvalidHexCharacter { .. }
            | Error::EmptyInput
            | Error::CodewordTooShort { .. }
            | Error::VectorTooLong { .. }
            | Error::MalformedPosition { .. } => ErrorKind::InvalidInput,
            Error::UnsupportedWidth { .. }
            | Error::MalformedPolynomial { .. }
            | Error::UnknownPolynomial { .. }
            | Error::DuplicatePolynomial { .. }
            | Error::InvalidSetting { .. } => ErrorKind::InvalidConfig,
        }
    }
}
