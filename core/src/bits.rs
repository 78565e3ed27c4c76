//! Bit strings and their textual forms.
//!
//! A [`BitString`] is the canonical representation of every bit sequence
//! handled by the engine: data words, codewords, remainders and error
//! vectors. It is an owned string of `'0'`/`'1'` characters, most
//! significant bit first. The character invariant is checked once, at
//! construction, so the division engine never sees malformed input.
//!
//! # Hex Conversion
//!
//! Each hex digit maps to exactly 4 bits and leading zero digits are
//! preserved, so for every valid hex string `h`:
//!
//! ```
//! use crclab_core::bits::{binary_to_hex, hex_to_binary};
//!
//! let bits = hex_to_binary("0b1d").unwrap();
//! assert_eq!(bits.as_str(), "0000101100011101");
//! assert_eq!(binary_to_hex(&bits), "0B1D");
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An ordered sequence of bits, MSB first.
#[derive(Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BitString(String);

impl BitString {
    /// A string of `len` zero bits.
    pub fn zeros(len: usize) -> Self {
        Self("0".repeat(len))
    }

    /// Build from a hexadecimal string. See [`hex_to_binary`].
    pub fn from_hex(hex: &str) -> Result<Self> {
        hex_to_binary(hex)
    }

    /// Render as uppercase hexadecimal. See [`binary_to_hex`].
    pub fn to_hex(&self) -> String {
        binary_to_hex(self)
    }

    /// The low `len` bits of `value`, zero-padded on the left.
    ///
    /// Bits of `value` above `len` are dropped.
    pub(crate) fn from_register(value: u64, len: u32) -> Self {
        let masked = if len >= 64 {
            value
        } else {
            value & ((1u64 << len) - 1)
        };
        Self(format!("{:0width$b}", masked, width = len as usize))
    }

    pub(crate) fn from_bits<I: IntoIterator<Item = bool>>(bits: I) -> Self {
        Self(bits.into_iter().map(|b| if b { '1' } else { '0' }).collect())
    }

    /// The bits as `'0'`/`'1'` text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no bits at all.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if every bit is zero (vacuously true when empty).
    pub fn is_zero(&self) -> bool {
        self.0.bytes().all(|b| b == b'0')
    }

    /// Iterate over the bits, MSB first.
    pub fn bits(&self) -> impl Iterator<Item = bool> + '_ {
        self.0.bytes().map(|b| b == b'1')
    }

    /// Bit at `index`, or `None` past the end.
    pub fn get(&self, index: usize) -> Option<bool> {
        self.0.as_bytes().get(index).map(|&b| b == b'1')
    }

    /// `self` followed by `other`.
    pub fn concat(&self, other: &BitString) -> BitString {
        let mut s = String::with_capacity(self.len() + other.len());
        s.push_str(&self.0);
        s.push_str(&other.0);
        BitString(s)
    }

    /// Split into the first `mid` bits and the rest.
    ///
    /// # Panics
    ///
    /// Panics if `mid > self.len()`.
    pub fn split_at(&self, mid: usize) -> (BitString, BitString) {
        let (head, tail) = self.0.split_at(mid);
        (BitString(head.to_owned()), BitString(tail.to_owned()))
    }

    /// Number of positions at which `self` and `other` differ.
    ///
    /// Only the common prefix is compared.
    pub fn hamming_distance(&self, other: &BitString) -> usize {
        self.bits().zip(other.bits()).filter(|(a, b)| a != b).count()
    }
}

impl FromStr for BitString {
    type Err = Error;

    /// Parse `'0'`/`'1'` text. The empty string is accepted; operations
    /// that need bits reject it themselves.
    fn from_str(s: &str) -> Result<Self> {
        if let Some((position, character)) = s
            .chars()
            .enumerate()
            .find(|&(_, c)| c != '0' && c != '1')
        {
            return Err(Error::InvalidBitCharacter {
                character,
                position,
            });
        }
        Ok(Self(s.to_owned()))
    }
}

impl TryFrom<String> for BitString {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<BitString> for String {
    fn from(bits: BitString) -> Self {
        bits.0
    }
}

impl AsRef<str> for BitString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({})", self.0)
    }
}

/// Convert hexadecimal text to bits.
///
/// Input is case-insensitive. Every digit becomes exactly 4 bits, so
/// `"0F"` yields `"00001111"`.
///
/// # Errors
///
/// - `EmptyInput` if `hex` is empty
/// - `InvalidHexCharacter` on the first non-hex character
pub fn hex_to_binary(hex: &str) -> Result<BitString> {
    if hex.is_empty() {
        return Err(Error::EmptyInput);
    }

    let mut bits = String::with_capacity(hex.len() * 4);
    for (position, character) in hex.chars().enumerate() {
        let digit = character
            .to_digit(16)
            .ok_or(Error::InvalidHexCharacter {
                character,
                position,
            })?;
        bits.push_str(&format!("{:04b}", digit));
    }
    Ok(BitString(bits))
}

/// Convert bits to uppercase hexadecimal text.
///
/// The bits are left-padded with zeros to a multiple of 4 first, so
/// `"101"` yields `"5"` and `"00001"` yields `"01"`. Empty input yields
/// an empty string.
pub fn binary_to_hex(bits: &BitString) -> String {
    let pad = (4 - bits.len() % 4) % 4;
    let padded: Vec<u8> = std::iter::repeat(b'0')
        .take(pad)
        .chain(bits.as_str().bytes())
        .collect();

    padded
        .chunks(4)
        .map(|nibble| {
            let value = nibble
                .iter()
                .fold(0u32, |acc, &b| (acc << 1) | u32::from(b == b'1'));
            // value < 16 by construction
            char::from_digit(value, 16)
                .unwrap_or('0')
                .to_ascii_uppercase()
        })
        .collect()
}

/// A list of bit positions to flip, parsed from caller text.
///
/// Positions are 0-indexed from the MSB. Duplicates are kept: flipping a
/// bit twice cancels. Range checking against a codeword is the injector's
/// job, not the parser's.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ErrorPattern(Vec<usize>);

impl ErrorPattern {
    /// Pattern from already-validated positions.
    pub fn new(positions: Vec<usize>) -> Self {
        Self(positions)
    }

    /// The positions in input order.
    pub fn positions(&self) -> &[usize] {
        &self.0
    }

    /// True if no positions were given.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for ErrorPattern {
    type Err = Error;

    /// Parse a comma-separated list such as `"0, 3,7"`.
    ///
    /// Whitespace around tokens and empty tokens are ignored. A position too
    /// large for `usize` saturates to `usize::MAX`, which no codeword
    /// reaches, so the injector ignores it like any other out-of-range bit.
    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(|token| {
                // usize parsing accepts a leading '+'; reject it with the rest
                if !token.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(Error::MalformedPosition {
                        token: token.to_owned(),
                    });
                }
                // all digits and non-empty: the only failure left is overflow
                Ok(token.parse::<usize>().unwrap_or(usize::MAX))
            })
            .collect::<Result<Vec<_>>>()
            .map(Self)
    }
}

impl From<Vec<usize>> for ErrorPattern {
    fn from(positions: Vec<usize>) -> Self {
        Self(positions)
    }
}

impl<'a> IntoIterator for &'a ErrorPattern {
    type Item = usize;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, usize>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    #[test]
    fn parse_accepts_binary() {
        let b = bits("10110");
        assert_eq!(b.as_str(), "10110");
        assert_eq!(b.len(), 5);
        assert_eq!(
            b.bits().collect::<Vec<_>>(),
            vec![true, false, true, true, false]
        );
    }

    #[test]
    fn parse_rejects_non_binary() {
        let err = "1021".parse::<BitString>().unwrap_err();
        assert_eq!(
            err,
            Error::InvalidBitCharacter {
                character: '2',
                position: 2
            }
        );

        assert!(" 101".parse::<BitString>().is_err());
    }

    #[test]
    fn parse_accepts_empty() {
        let b = bits("");
        assert!(b.is_empty());
        assert!(b.is_zero());
    }

    #[test]
    fn from_register_pads_and_masks() {
        assert_eq!(BitString::from_register(0b101, 4).as_str(), "0101");
        assert_eq!(BitString::from_register(0b1_1101, 4).as_str(), "1101");
        assert_eq!(BitString::from_register(0, 8).as_str(), "00000000");
        assert_eq!(
            BitString::from_register(u64::from(u32::MAX), 32).as_str(),
            "1".repeat(32)
        );
    }

    #[test]
    fn concat_split_and_distance() {
        let a = bits("1010");
        let b = bits("1101");
        let joined = a.concat(&b);
        assert_eq!(joined.as_str(), "10101101");

        let (head, tail) = joined.split_at(4);
        assert_eq!(head, a);
        assert_eq!(tail, b);

        assert_eq!(a.hamming_distance(&b), 3);
        assert_eq!(a.hamming_distance(&a), 0);
    }

    #[test]
    fn hex_to_binary_four_bits_per_digit() {
        assert_eq!(hex_to_binary("B1D").unwrap().as_str(), "101100011101");
        assert_eq!(hex_to_binary("0").unwrap().as_str(), "0000");
        assert_eq!(hex_to_binary("0f").unwrap().as_str(), "00001111");
        assert_eq!(hex_to_binary("aF").unwrap().as_str(), "10101111");
    }

    #[test]
    fn hex_to_binary_rejects_bad_input() {
        assert_eq!(hex_to_binary(""), Err(Error::EmptyInput));
        assert_eq!(
            hex_to_binary("12G4"),
            Err(Error::InvalidHexCharacter {
                character: 'G',
                position: 2
            })
        );
        assert!(hex_to_binary("0x12").is_err());
    }

    #[test]
    fn binary_to_hex_pads_left() {
        assert_eq!(binary_to_hex(&bits("101100011101")), "B1D");
        assert_eq!(binary_to_hex(&bits("101")), "5");
        assert_eq!(binary_to_hex(&bits("00001")), "01");
        assert_eq!(binary_to_hex(&bits("11111111")), "FF");
        assert_eq!(binary_to_hex(&bits("")), "");
    }

    #[test]
    fn hex_round_trip_uppercases() {
        for hex in ["B1D", "b1d", "0", "00", "0a0B", "DEADbeef", "123456789abcdef"] {
            let converted = hex_to_binary(hex).unwrap();
            assert_eq!(binary_to_hex(&converted), hex.to_uppercase(), "hex {hex}");
            assert_eq!(BitString::from_hex(hex).unwrap().to_hex(), hex.to_uppercase());
        }
    }

    #[test]
    fn error_pattern_parses_lists() {
        let p: ErrorPattern = "0, 3,7".parse().unwrap();
        assert_eq!(p.positions(), &[0, 3, 7]);

        let p: ErrorPattern = " 2 ,, 2 ,".parse().unwrap();
        assert_eq!(p.positions(), &[2, 2]);

        let p: ErrorPattern = "".parse().unwrap();
        assert!(p.is_empty());
    }

    #[test]
    fn error_pattern_saturates_oversized_positions() {
        let p: ErrorPattern = "1, 18446744073709551616".parse().unwrap();
        assert_eq!(p.positions(), &[1, usize::MAX]);

        let p: ErrorPattern = "99999999999999999999999999".parse().unwrap();
        assert_eq!(p.positions(), &[usize::MAX]);
    }

    #[test]
    fn error_pattern_rejects_non_integers() {
        for bad in ["-1", "1.5", "abc", "3, x", "+4"] {
            let err = bad.parse::<ErrorPattern>().unwrap_err();
            assert!(
                matches!(err, Error::MalformedPosition { .. }),
                "input {bad:?} gave {err:?}"
            );
        }
    }

    #[test]
    fn serde_uses_plain_strings() {
        let b = bits("0110");
        let json = serde_json::to_string(&b).unwrap();
        assert_eq!(json, "\"0110\"");

        let back: BitString = serde_json::from_str(&json).unwrap();
        assert_eq!(back, b);

        assert!(serde_json::from_str::<BitString>("\"01a0\"").is_err());
    }
}
