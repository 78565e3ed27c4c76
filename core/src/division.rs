//! Modulo-2 polynomial long division.
//!
//! Implemented as a linear-feedback shift register over a `u64`. The
//! register never holds more than `width + 1` significant bits, which for
//! widths up to 32 leaves ample headroom. No tables, no big integers.

use crate::bits::BitString;
use crate::error::Result;
use crate::registry;

/// Divide `bits` by `polynomial` over GF(2) and return the remainder.
///
/// `polynomial` includes its leading `1 << width` bit. The remainder is
/// exactly `width` bits, zero-padded on the left.
///
/// # Algorithm
///
/// For each input bit, MSB first:
/// 1. Shift the register left by one and OR in the bit
/// 2. If bit `width` is now set, XOR the register with `polynomial`
///
/// Step 2 clears bit `width` again, so the register stays below
/// `1 << (width + 1)`.
///
/// # Errors
///
/// - `UnsupportedWidth` if `width` is 0 or above 32
/// - `MalformedPolynomial` if `polynomial` does not have exactly
///   `width + 1` significant bits
///
/// # Example
///
/// ```
/// use crclab_core::division::divide;
///
/// let bits = "10100000".parse().unwrap();
/// let remainder = divide(&bits, 0b10011, 4).unwrap();
/// assert_eq!(remainder.as_str(), "1101");
/// ```
pub fn divide(bits: &BitString, polynomial: u64, width: u32) -> Result<BitString> {
    registry::validate(polynomial, width)?;

    let top = 1u64 << width;
    let mut register = 0u64;
    for bit in bits.bits() {
        register = (register << 1) | u64::from(bit);
        if register & top != 0 {
            register ^= polynomial;
        }
    }

    let remainder = BitString::from_register(register, width);
    tracing::trace!(
        input_len = bits.len(),
        polynomial,
        width,
        remainder = %remainder,
        "divided"
    );
    Ok(remainder)
}

/// Parse `bits` as binary text, then [`divide`].
///
/// # Errors
///
/// `InvalidBitCharacter` for any character other than `'0'`/`'1'`, plus
/// everything [`divide`] returns.
pub fn divide_str(bits: &str, polynomial: u64, width: u32) -> Result<BitString> {
    let bits: BitString = bits.parse()?;
    divide(&bits, polynomial, width)
}
