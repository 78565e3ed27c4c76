//! Codeword encoding and verification.
//!
//! ```text
//! +---------------------------+------------------+
//! |   Data                    |   CRC            |
//! |   (data_len bits)         |   (width bits)   |
//! +---------------------------+------------------+
//! ```
//!
//! The CRC is the remainder of `data` shifted left by `width` bits,
//! divided by the generator. Dividing the whole codeword then always
//! leaves a zero remainder.

use serde::Serialize;

use crate::bits::BitString;
use crate::division::divide;
use crate::error::{Error, Result};
use crate::registry::PolynomialConfig;

/// Output of [`encode`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Encoded {
    /// The checksum, exactly `width` bits.
    pub crc: BitString,
    /// `data` followed by `crc`.
    pub codeword: BitString,
}

impl Encoded {
    /// Number of data bits in the codeword.
    pub fn data_len(&self) -> usize {
        self.codeword.len() - self.crc.len()
    }
}

/// Output of [`verify`].
///
/// `is_valid` means no *detectable* error occurred. An error pattern that
/// is a multiple of the generator polynomial leaves the remainder at zero
/// too, so a valid verification is not proof that the codeword arrived
/// unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    /// Remainder of the codeword, exactly `width` bits.
    pub remainder: BitString,
    /// True if the remainder is all zeros.
    pub is_valid: bool,
}

impl Verification {
    /// True if the check caught an error.
    pub fn error_detected(&self) -> bool {
        !self.is_valid
    }
}

/// Compute the CRC of `data` and append it.
///
/// # Errors
///
/// - `EmptyInput` if `data` has no bits
/// - config errors from [`divide`]
///
/// # Example
///
/// ```
/// use crclab_core::{codec, Registry};
///
/// let registry = Registry::standard();
/// let crc4 = registry.require("CRC-4").unwrap();
/// let encoded = codec::encode(&"1010".parse().unwrap(), crc4).unwrap();
/// assert_eq!(encoded.crc.as_str(), "1101");
/// assert_eq!(encoded.codeword.as_str(), "10101101");
/// ```
pub fn encode(data: &BitString, config: &PolynomialConfig) -> Result<Encoded> {
    if data.is_empty() {
        return Err(Error::EmptyInput);
    }

    let shifted = data.concat(&BitString::zeros(config.width() as usize));
    let crc = divide(&shifted, config.polynomial(), config.width())?;
    let codeword = data.concat(&crc);

    tracing::debug!(
        polynomial = %config.name(),
        width = config.width(),
        data_len = data.len(),
        crc = %crc,
        "encoded"
    );
    Ok(Encoded { crc, codeword })
}

/// Divide a received codeword and report whether the remainder is zero.
///
/// A codeword of exactly `width` bits has an empty data portion. It is
/// divided as-is and is valid only if every bit is zero, which is what
/// encoding empty data would produce.
///
/// # Errors
///
/// - `CodewordTooShort` if `codeword` has fewer than `width` bits
/// - config errors from [`divide`]
pub fn verify(codeword: &BitString, config: &PolynomialConfig) -> Result<Verification> {
    if codeword.len() < config.width() as usize {
        return Err(Error::CodewordTooShort {
            len: codeword.len(),
            width: config.width(),
        });
    }

    let remainder = divide(codeword, config.polynomial(), config.width())?;
    let is_valid = remainder.is_zero();

    tracing::debug!(
        polynomial = %config.name(),
        codeword_len = codeword.len(),
        remainder = %remainder,
        valid = is_valid,
        "verified"
    );
    Ok(Verification {
        remainder,
        is_valid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::Registry;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    fn crc4() -> PolynomialConfig {
        Registry::standard().require("CRC-4").unwrap().clone()
    }

    #[test]
    fn encode_crc4_reference() {
        let encoded = encode(&bits("1010"), &crc4()).unwrap();
        assert_eq!(encoded.crc.as_str(), "1101");
        assert_eq!(encoded.codeword.as_str(), "10101101");
        assert_eq!(encoded.data_len(), 4);
    }

    #[test]
    fn encode_crc5_reference() {
        let config = Registry::standard().require("CRC-5-ITU").unwrap().clone();
        let encoded = encode(&bits("110101"), &config).unwrap();
        assert_eq!(encoded.crc.as_str(), "11010");
        assert_eq!(encoded.codeword.as_str(), "11010111010");
    }

    #[test]
    fn encode_rejects_empty_data() {
        assert_eq!(encode(&bits(""), &crc4()), Err(Error::EmptyInput));
    }

    #[test]
    fn encoded_codeword_verifies() {
        let config = crc4();
        let encoded = encode(&bits("110011"), &config).unwrap();
        let verification = verify(&encoded.codeword, &config).unwrap();
        assert!(verification.is_valid);
        assert!(!verification.error_detected());
        assert_eq!(verification.remainder.as_str(), "0000");
    }

    #[test]
    fn verify_reports_nonzero_remainder() {
        // last bit of 10101101 flipped
        let verification = verify(&bits("10101100"), &crc4()).unwrap();
        assert!(!verification.is_valid);
        assert!(verification.error_detected());
        assert_eq!(verification.remainder.as_str(), "0001");
    }

    #[test]
    fn verify_codeword_of_exactly_width_bits() {
        let config = crc4();
        assert!(verify(&bits("0000"), &config).unwrap().is_valid);

        let verification = verify(&bits("0110"), &config).unwrap();
        assert!(!verification.is_valid);
        assert_eq!(verification.remainder.as_str(), "0110");
    }

    #[test]
    fn verify_rejects_short_codeword() {
        assert_eq!(
            verify(&bits("101"), &crc4()),
            Err(Error::CodewordTooShort { len: 3, width: 4 })
        );
        assert_eq!(
            verify(&bits(""), &crc4()),
            Err(Error::CodewordTooShort { len: 0, width: 4 })
        );
    }

    #[test]
    fn verification_serializes_camel_case() {
        let verification = verify(&bits("10101101"), &crc4()).unwrap();
        let json = serde_json::to_value(&verification).unwrap();
        assert_eq!(json["remainder"], "0000");
        assert_eq!(json["isValid"], true);
    }
}
