//! Generator polynomial configurations and the named registry.
//!
//! A [`PolynomialConfig`] is validated on construction: the width lies in
//! `1..=MAX_WIDTH` and the polynomial has exactly `width + 1` significant
//! bits. Engine functions can therefore treat any config they are handed
//! as well-formed.
//!
//! The registry is a plain value. Callers build one (usually through
//! [`Registry::standard`] or [`crate::config::LabConfig::registry`]) and
//! pass it where it is needed.

use std::fmt;

use serde::Serialize;

use crate::bits::BitString;
use crate::error::{Error, Result};

/// Largest supported CRC width in bits.
pub const MAX_WIDTH: u32 = 32;

/// Name given to configs built ad hoc from a binary polynomial string.
pub const CUSTOM_NAME: &str = "custom";

/// Standard registry entries as `(name, polynomial, width)`.
const STANDARD: [(&str, u64, u32); 4] = [
    ("CRC-4", 0b1_0011, 4),
    ("CRC-5-ITU", 0b10_0101, 5),
    ("CRC-7", 0b1000_1001, 7),
    ("CRC-8", 0b1_0000_0111, 8),
];

/// Check a width/polynomial pair.
///
/// # Errors
///
/// - `UnsupportedWidth` if `width` is 0 or above [`MAX_WIDTH`]
/// - `MalformedPolynomial` if bit `width` is not the highest set bit
pub fn validate(polynomial: u64, width: u32) -> Result<()> {
    if width == 0 || width > MAX_WIDTH {
        return Err(Error::UnsupportedWidth { width });
    }
    if polynomial >> width != 1 {
        return Err(Error::MalformedPolynomial { polynomial, width });
    }
    Ok(())
}

/// A named generator polynomial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolynomialConfig {
    name: String,
    polynomial: u64,
    width: u32,
    binary_repr: String,
    formula: String,
}

impl PolynomialConfig {
    /// Build a config from a polynomial value including its leading bit.
    ///
    /// `0b10011` with width 4 is x^4 + x + 1.
    pub fn new(name: impl Into<String>, polynomial: u64, width: u32) -> Result<Self> {
        validate(polynomial, width)?;
        Ok(Self::assemble(name.into(), polynomial, width))
    }

    /// Derive the display fields. Callers have already validated the pair.
    fn assemble(name: String, polynomial: u64, width: u32) -> Self {
        Self {
            name,
            polynomial,
            width,
            binary_repr: format!("{:0len$b}", polynomial, len = width as usize + 1),
            formula: formula(polynomial, width),
        }
    }

    /// Build a config from binary text such as `"100000111"`.
    ///
    /// The width is one less than the number of digits, so the text must
    /// start with `1`.
    pub fn from_binary(name: impl Into<String>, binary: &str) -> Result<Self> {
        let bits: BitString = binary.trim().parse()?;
        if bits.is_empty() {
            return Err(Error::EmptyInput);
        }
        // Too many digits to be any supported width
        if bits.len() > MAX_WIDTH as usize + 1 {
            return Err(Error::UnsupportedWidth {
                width: u32::try_from(bits.len() - 1).unwrap_or(u32::MAX),
            });
        }
        let width = (bits.len() - 1) as u32;
        let polynomial = bits
            .bits()
            .fold(0u64, |acc, bit| (acc << 1) | u64::from(bit));
        Self::new(name, polynomial, width)
    }

    /// Registry name, e.g. `"CRC-8"`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Polynomial value with the leading `1 << width` bit included.
    pub fn polynomial(&self) -> u64 {
        self.polynomial
    }

    /// CRC width in bits (degree of the polynomial).
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The `width + 1` digit binary form.
    pub fn binary_repr(&self) -> &str {
        &self.binary_repr
    }

    /// Human readable form, e.g. `"x^4 + x + 1"`.
    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// The polynomial as a bit string of length `width + 1`.
    pub fn to_bits(&self) -> BitString {
        BitString::from_register(self.polynomial, self.width + 1)
    }
}

impl fmt::Display for PolynomialConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.name, self.binary_repr, self.formula)
    }
}

fn formula(polynomial: u64, width: u32) -> String {
    (0..=width)
        .rev()
        .filter(|&power| polynomial >> power & 1 == 1)
        .map(|power| match power {
            0 => "1".to_string(),
            1 => "x".to_string(),
            p => format!("x^{p}"),
        })
        .collect::<Vec<_>>()
        .join(" + ")
}

/// An immutable table of named polynomial configs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Registry {
    entries: Vec<PolynomialConfig>,
}

impl Registry {
    /// The built-in table: CRC-4, CRC-5-ITU, CRC-7 and CRC-8.
    ///
    /// The table holds only valid width/polynomial pairs, so no entry
    /// goes through the fallible constructor.
    pub fn standard() -> Self {
        let entries = STANDARD
            .iter()
            .map(|&(name, polynomial, width)| {
                PolynomialConfig::assemble(name.to_owned(), polynomial, width)
            })
            .collect();
        Self { entries }
    }

    /// A registry with no entries.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// This registry plus `config`.
    ///
    /// # Errors
    ///
    /// `DuplicatePolynomial` if the name (case-insensitive) is taken.
    pub fn with_custom(mut self, config: PolynomialConfig) -> Result<Self> {
        if self.get(config.name()).is_some() {
            return Err(Error::DuplicatePolynomial {
                name: config.name().to_owned(),
            });
        }
        self.entries.push(config);
        Ok(self)
    }

    /// Look up an entry by name, ignoring ASCII case.
    pub fn get(&self, name: &str) -> Option<&PolynomialConfig> {
        self.entries
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    /// Look up an entry by name.
    ///
    /// # Errors
    ///
    /// `UnknownPolynomial` if there is no such entry.
    pub fn require(&self, name: &str) -> Result<&PolynomialConfig> {
        self.get(name).ok_or_else(|| Error::UnknownPolynomial {
            name: name.to_owned(),
        })
    }

    /// Resolve caller text to a config.
    ///
    /// Registry names win. Text made only of binary digits is taken as a
    /// custom polynomial named [`CUSTOM_NAME`].
    pub fn resolve(&self, text: &str) -> Result<PolynomialConfig> {
        if let Some(config) = self.get(text) {
            return Ok(config.clone());
        }
        let trimmed = text.trim();
        if !trimmed.is_empty() && trimmed.bytes().all(|b| b == b'0' || b == b'1') {
            return PolynomialConfig::from_binary(CUSTOM_NAME, trimmed);
        }
        Err(Error::UnknownPolynomial {
            name: text.to_owned(),
        })
    }

    /// Entry names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(PolynomialConfig::name).collect()
    }

    /// Iterate over entries in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &PolynomialConfig> {
        self.entries.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::standard()
    }
}
