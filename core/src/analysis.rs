//! Error injection and detectability analysis.
//!
//! A CRC detects an error pattern `e(x)` exactly when `e(x)` is not a
//! multiple of the generator `g(x)`. This module flips bits in codewords,
//! re-verifies them, and builds patterns that are multiples of `g(x)` to
//! show the blind spot.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::bits::BitString;
use crate::codec::{verify, Verification};
use crate::division::divide;
use crate::error::{Error, Result};
use crate::registry::PolynomialConfig;

/// Trailing zero bits appended to generated undetectable vectors.
pub const DEFAULT_VECTOR_PADDING: usize = 3;

/// Return a copy of `codeword` with the bit at each position flipped.
///
/// Positions are 0-indexed from the MSB. A position listed twice is
/// flipped twice and so left unchanged. Positions at or past the end of
/// the codeword are ignored.
pub fn inject_errors<I>(codeword: &BitString, positions: I) -> BitString
where
    I: IntoIterator<Item = usize>,
{
    let mut flipped: Vec<bool> = codeword.bits().collect();
    for position in positions {
        if let Some(bit) = flipped.get_mut(position) {
            *bit = !*bit;
        }
    }
    BitString::from_bits(flipped)
}

/// Result of corrupting a codeword and verifying it again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorAnalysis {
    /// The codeword after corruption.
    pub corrupted: BitString,
    /// Positions whose bit actually changed, ascending.
    pub applied: Vec<usize>,
    /// Requested positions past the end of the codeword, ascending.
    pub ignored: Vec<usize>,
    /// Verification of `corrupted`.
    pub verification: Verification,
    /// True if the verifier caught the corruption.
    pub detected: bool,
}

impl ErrorAnalysis {
    fn new(
        original: &BitString,
        corrupted: BitString,
        ignored: Vec<usize>,
        verification: Verification,
    ) -> Self {
        let applied = original
            .bits()
            .zip(corrupted.bits())
            .enumerate()
            .filter(|(_, (a, b))| a != b)
            .map(|(i, _)| i)
            .collect();
        let detected = verification.error_detected();
        Self {
            corrupted,
            applied,
            ignored,
            verification,
            detected,
        }
    }

    /// True if bits changed and the verifier still passed the codeword.
    pub fn is_silent_corruption(&self) -> bool {
        !self.applied.is_empty() && !self.detected
    }
}

/// Flip `positions` in `codeword` and verify the result.
///
/// # Errors
///
/// Whatever [`verify`] returns for the corrupted codeword.
pub fn analyze<I>(
    codeword: &BitString,
    positions: I,
    config: &PolynomialConfig,
) -> Result<ErrorAnalysis>
where
    I: IntoIterator<Item = usize>,
{
    let positions: Vec<usize> = positions.into_iter().collect();
    let ignored: Vec<usize> = positions
        .iter()
        .copied()
        .filter(|&p| p >= codeword.len())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    if !ignored.is_empty() {
        tracing::debug!(?ignored, codeword_len = codeword.len(), "ignoring out-of-range positions");
    }

    let corrupted = inject_errors(codeword, positions);
    let verification = verify(&corrupted, config)?;
    let analysis = ErrorAnalysis::new(codeword, corrupted, ignored, verification);

    tracing::debug!(
        polynomial = %config.name(),
        flipped = analysis.applied.len(),
        detected = analysis.detected,
        "analyzed error pattern"
    );
    Ok(analysis)
}

/// A bit pattern that is a multiple of the generator polynomial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UndetectableVector {
    /// The generator's bits followed by zero padding.
    pub vector: BitString,
    /// Remainder of `vector` under the generator.
    pub remainder: BitString,
    /// True if `remainder` is all zeros.
    pub is_undetectable: bool,
}

/// Build an error vector the CRC cannot see, with the default padding.
///
/// See [`generate_undetectable_vector_with_padding`].
pub fn generate_undetectable_vector(config: &PolynomialConfig) -> Result<UndetectableVector> {
    generate_undetectable_vector_with_padding(config, DEFAULT_VECTOR_PADDING)
}

/// Build an error vector the CRC cannot see.
///
/// The vector is the generator itself followed by `padding` zero bits,
/// i.e. `g(x) * x^padding`. Its length is `width + 1 + padding` no matter
/// what data it is later combined with. Being a multiple of `g(x)` it
/// always divides to zero; the division is run anyway so the result
/// carries its own proof.
///
/// # Errors
///
/// Config errors from [`divide`].
pub fn generate_undetectable_vector_with_padding(
    config: &PolynomialConfig,
    padding: usize,
) -> Result<UndetectableVector> {
    let vector = config.to_bits().concat(&BitString::zeros(padding));
    let remainder = divide(&vector, config.polynomial(), config.width())?;
    let is_undetectable = remainder.is_zero();

    tracing::debug!(
        polynomial = %config.name(),
        vector = %vector,
        undetectable = is_undetectable,
        "generated undetectable vector"
    );
    Ok(UndetectableVector {
        vector,
        remainder,
        is_undetectable,
    })
}

/// Add `vector` to `codeword` modulo 2, aligned to the codeword's end.
///
/// # Errors
///
/// `VectorTooLong` if `vector` has more bits than `codeword`.
pub fn apply_error_vector(codeword: &BitString, vector: &BitString) -> Result<BitString> {
    if vector.len() > codeword.len() {
        return Err(Error::VectorTooLong {
            vector_len: vector.len(),
            codeword_len: codeword.len(),
        });
    }

    let offset = codeword.len() - vector.len();
    let positions = vector
        .bits()
        .enumerate()
        .filter(|&(_, bit)| bit)
        .map(|(i, _)| offset + i);
    Ok(inject_errors(codeword, positions))
}

/// Apply `vector` to `codeword` and verify the result.
///
/// With a vector from [`generate_undetectable_vector`] and a valid
/// codeword this reports changed bits and `detected == false`.
///
/// # Errors
///
/// `VectorTooLong` from [`apply_error_vector`], or whatever [`verify`]
/// returns.
pub fn analyze_vector(
    codeword: &BitString,
    vector: &BitString,
    config: &PolynomialConfig,
) -> Result<ErrorAnalysis> {
    let corrupted = apply_error_vector(codeword, vector)?;
    let verification = verify(&corrupted, config)?;
    let analysis = ErrorAnalysis::new(codeword, corrupted, Vec::new(), verification);

    tracing::debug!(
        polynomial = %config.name(),
        flipped = analysis.applied.len(),
        detected = analysis.detected,
        "analyzed error vector"
    );
    Ok(analysis)
}

/// Which single-bit errors a codeword's check catches.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DetectionReport {
    /// Positions whose flip was detected.
    pub detected: Vec<usize>,
    /// Positions whose flip went unnoticed.
    pub undetected: Vec<usize>,
}

impl DetectionReport {
    /// True if every single-bit error was detected.
    pub fn detects_all(&self) -> bool {
        self.undetected.is_empty()
    }
}

/// Flip each bit of `codeword` on its own and verify.
///
/// # Errors
///
/// Whatever [`verify`] returns; a too-short codeword fails before any
/// flipping.
pub fn single_bit_sweep(codeword: &BitString, config: &PolynomialConfig) -> Result<DetectionReport> {
    let mut report = DetectionReport::default();
    for position in 0..codeword.len() {
        let corrupted = inject_errors(codeword, [position]);
        if verify(&corrupted, config)?.error_detected() {
            report.detected.push(position);
        } else {
            report.undetected.push(position);
        }
    }
    // An empty codeword still has to be checked against the width
    if codeword.is_empty() {
        verify(codeword, config)?;
    }

    tracing::debug!(
        polynomial = %config.name(),
        codeword_len = codeword.len(),
        undetected = report.undetected.len(),
        "single-bit sweep"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::registry::Registry;

    fn bits(s: &str) -> BitString {
        s.parse().unwrap()
    }

    fn config(name: &str) -> PolynomialConfig {
        Registry::standard().require(name).unwrap().clone()
    }

    #[test]
    fn inject_flips_listed_positions() {
        let codeword = bits("10101101");
        assert_eq!(inject_errors(&codeword, [0]).as_str(), "00101101");
        assert_eq!(inject_errors(&codeword, [1, 7]).as_str(), "11101100");
        assert_eq!(inject_errors(&codeword, Vec::new()).as_str(), "10101101");
    }

    #[test]
    fn inject_twice_restores_original() {
        let codeword = bits("10101101");
        assert_eq!(inject_errors(&codeword, [3, 3]), codeword);
        assert_eq!(inject_errors(&codeword, [2, 5, 2]), inject_errors(&codeword, [5]));
    }

    #[test]
    fn inject_ignores_out_of_range() {
        let codeword = bits("10101101");
        assert_eq!(inject_errors(&codeword, [8, 100]), codeword);
        assert_eq!(inject_errors(&codeword, [0, 8]).as_str(), "00101101");
    }

    #[test]
    fn inject_leaves_input_untouched() {
        let codeword = bits("1111");
        let _ = inject_errors(&codeword, [0, 1, 2, 3]);
        assert_eq!(codeword.as_str(), "1111");
    }

    #[test]
    fn analyze_reports_detection() {
        let crc4 = config("CRC-4");
        let analysis = analyze(&bits("10101101"), vec![1, 20, 20, 9], &crc4).unwrap();
        assert_eq!(analysis.corrupted.as_str(), "11101101");
        assert_eq!(analysis.applied, vec![1]);
        assert_eq!(analysis.ignored, vec![9, 20]);
        assert!(analysis.detected);
        assert!(!analysis.verification.is_valid);
        assert!(!analysis.is_silent_corruption());
    }

    #[test]
    fn analyze_cancelled_flips_change_nothing() {
        let crc4 = config("CRC-4");
        let analysis = analyze(&bits("10101101"), vec![4, 4], &crc4).unwrap();
        assert!(analysis.applied.is_empty());
        assert!(!analysis.detected);
        assert!(!analysis.is_silent_corruption());
    }

    #[test]
    fn analyze_two_bit_blind_spot() {
        // x^0 + x^15 is divisible by x^4 + x + 1 (period 15), so flipping
        // positions 0 and 15 of a 16-bit codeword goes unnoticed
        let crc4 = config("CRC-4");
        let encoded = encode(&bits("101100111000"), &crc4).unwrap();
        assert_eq!(encoded.codeword.len(), 16);

        let analysis = analyze(&encoded.codeword, vec![0, 15], &crc4).unwrap();
        assert_eq!(analysis.applied, vec![0, 15]);
        assert!(analysis.is_silent_corruption());
    }

    #[test]
    fn generated_vectors_are_undetectable() {
        for config in Registry::standard().iter() {
            let generated = generate_undetectable_vector(config).unwrap();
            assert!(generated.is_undetectable, "{}", config.name());
            assert!(generated.remainder.is_zero());
            assert_eq!(
                generated.vector.len(),
                config.width() as usize + 1 + DEFAULT_VECTOR_PADDING
            );
            assert!(generated.vector.as_str().starts_with(config.binary_repr()));
        }
    }

    #[test]
    fn generated_vector_crc4_value() {
        let generated = generate_undetectable_vector(&config("CRC-4")).unwrap();
        assert_eq!(generated.vector.as_str(), "10011000");
        assert_eq!(generated.remainder.as_str(), "0000");
    }

    #[test]
    fn padding_is_configurable() {
        let crc8 = config("CRC-8");
        for padding in [0, 1, 16] {
            let generated = generate_undetectable_vector_with_padding(&crc8, padding).unwrap();
            assert_eq!(generated.vector.len(), 9 + padding);
            assert!(generated.is_undetectable);
        }
    }

    #[test]
    fn apply_vector_right_aligned() {
        let applied = apply_error_vector(&bits("10101101"), &bits("10011000")).unwrap();
        assert_eq!(applied.as_str(), "00110101");

        let applied = apply_error_vector(&bits("10101101"), &bits("11")).unwrap();
        assert_eq!(applied.as_str(), "10101110");
    }

    #[test]
    fn apply_vector_too_long() {
        assert_eq!(
            apply_error_vector(&bits("1010"), &bits("10011")),
            Err(Error::VectorTooLong {
                vector_len: 5,
                codeword_len: 4
            })
        );
    }

    #[test]
    fn undetectable_vector_slips_past_verifier() {
        let crc4 = config("CRC-4");
        let encoded = encode(&bits("1010"), &crc4).unwrap();
        let generated = generate_undetectable_vector(&crc4).unwrap();

        let analysis = analyze_vector(&encoded.codeword, &generated.vector, &crc4).unwrap();
        assert_eq!(analysis.corrupted.as_str(), "00110101");
        assert_eq!(analysis.applied, vec![0, 3, 4]);
        assert!(analysis.verification.is_valid);
        assert!(analysis.is_silent_corruption());
    }

    #[test]
    fn sweep_crc4_detects_every_single_bit() {
        let report = single_bit_sweep(&bits("10101101"), &config("CRC-4")).unwrap();
        assert_eq!(report.detected, (0..8).collect::<Vec<_>>());
        assert!(report.detects_all());
    }

    #[test]
    fn sweep_degenerate_generator_misses_errors() {
        // g(x) = x divides every pattern ending in 0, so only the last
        // bit is covered
        let x = PolynomialConfig::from_binary("x", "10").unwrap();
        let report = single_bit_sweep(&bits("1010"), &x).unwrap();
        assert_eq!(report.detected, vec![3]);
        assert_eq!(report.undetected, vec![0, 1, 2]);
        assert!(!report.detects_all());
    }

    #[test]
    fn sweep_rejects_short_codeword() {
        let crc4 = config("CRC-4");
        assert!(matches!(
            single_bit_sweep(&bits("10"), &crc4),
            Err(Error::CodewordTooShort { .. })
        ));
        assert!(matches!(
            single_bit_sweep(&bits(""), &crc4),
            Err(Error::CodewordTooShort { .. })
        ));
    }
}
