//! crclab Core - binary CRC engine for teaching and analysis.
//!
//! This library provides:
//! - Modulo-2 polynomial division of bit strings (widths 1 to 32)
//! - Codeword encoding and verification
//! - Error injection and detectability analysis
//! - Construction of error vectors the CRC provably cannot detect
//! - Hex/binary conversion for caller input
//!
//! # Properties
//!
//! - Every operation is a pure function of its inputs
//! - Bit-exact: no tables, no floating point, no big integers
//! - Text is validated once, at the [`BitString`] / [`ErrorPattern`]
//!   boundary, before it reaches the division engine
//!
//! # Constraints
//!
//! This library intentionally does NOT:
//! - Implement table-driven or standard-compliant CRC-32/64 variants
//! - Access the network
//! - Store data persistently
//! - Hold state between calls
//!
//! # Example: Encode, Corrupt, Verify
//!
//! ```
//! use crclab_core::{analysis, codec, BitString, ErrorPattern, Registry};
//!
//! let registry = Registry::standard();
//! let crc8 = registry.require("CRC-8").unwrap();
//!
//! // Caller input arrives as hex
//! let data = BitString::from_hex("B1D").unwrap();
//! let encoded = codec::encode(&data, crc8).unwrap();
//! assert_eq!(encoded.codeword.as_str(), "10110001110111000100");
//! assert!(codec::verify(&encoded.codeword, crc8).unwrap().is_valid);
//!
//! // A single flipped bit is caught
//! let pattern: ErrorPattern = "5".parse().unwrap();
//! let report = analysis::analyze(&encoded.codeword, &pattern, crc8).unwrap();
//! assert!(report.detected);
//!
//! // A multiple of the generator is not
//! let vector = analysis::generate_undetectable_vector(crc8).unwrap();
//! let silent = analysis::analyze_vector(&encoded.codeword, &vector.vector, crc8).unwrap();
//! assert!(silent.is_silent_corruption());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod bits;
pub mod codec;
pub mod config;
pub mod division;
pub mod error;
pub mod registry;

pub use analysis::{
    analyze, analyze_vector, apply_error_vector, generate_undetectable_vector,
    generate_undetectable_vector_with_padding, inject_errors, single_bit_sweep, DetectionReport,
    ErrorAnalysis, UndetectableVector, DEFAULT_VECTOR_PADDING,
};
pub use bits::{binary_to_hex, hex_to_binary, BitString, ErrorPattern};
pub use codec::{encode, verify, Encoded, Verification};
pub use config::LabConfig;
pub use division::{divide, divide_str};
pub use error::{Error, ErrorKind, Result};
pub use registry::{PolynomialConfig, Registry, MAX_WIDTH};
