//! WebAssembly bindings for the crclab CRC engine.
//!
//! This crate exposes the engine to JavaScript for the browser-based
//! teaching UI. All text coming from form fields is validated here, at
//! the boundary, through the core's typed parsers; the UI only ever sees
//! plain strings, numbers and booleans.
//!
//! A `polynomial` argument is either a registry name (`"CRC-8"`) or a
//! binary generator such as `"1011"`.
//!
//! The free functions use the standard registry and default settings.
//! A [`Lab`] carries caller settings instead: extra named polynomials,
//! the default polynomial and the undetectable-vector padding, in the
//! same form `LabConfig` reads them from the environment.

use wasm_bindgen::prelude::*;

use crclab_core::{
    analysis, codec, BitString, ErrorAnalysis, ErrorPattern, LabConfig, PolynomialConfig,
    Registry,
};

/// Description of a generator polynomial.
#[wasm_bindgen(getter_with_clone)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolynomialInfo {
    /// Registry name, or `"custom"`.
    pub name: String,
    /// The `width + 1` digit binary form.
    pub binary: String,
    /// Display formula, e.g. `x^4 + x + 1`.
    pub formula: String,
    /// CRC width in bits.
    pub width: u32,
}

/// Result of [`encode`] and [`encode_hex`].
#[wasm_bindgen(getter_with_clone)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeOutput {
    /// CRC bits.
    pub crc: String,
    /// Data bits followed by the CRC.
    pub codeword: String,
    /// Codeword in hex, for display.
    #[wasm_bindgen(js_name = "codewordHex")]
    pub codeword_hex: String,
}

/// Result of [`verify`].
#[wasm_bindgen(getter_with_clone)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyOutput {
    /// Remainder bits.
    pub remainder: String,
    /// True when no error was *detected*.
    #[wasm_bindgen(js_name = "isValid")]
    pub is_valid: bool,
}

/// Result of [`analyze_errors`] and [`apply_error_vector`].
#[wasm_bindgen(getter_with_clone)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutput {
    /// Codeword after corruption.
    pub corrupted: String,
    /// Positions that actually changed.
    pub applied: Vec<u32>,
    /// Requested positions past the end of the codeword.
    pub ignored: Vec<u32>,
    /// Remainder of the corrupted codeword.
    pub remainder: String,
    /// True if the check caught the corruption.
    pub detected: bool,
}

/// Result of [`generate_undetectable_vector`].
#[wasm_bindgen(getter_with_clone)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VectorOutput {
    /// Generator bits followed by zero padding.
    pub vector: String,
    /// Remainder of the vector (always zeros).
    pub remainder: String,
    /// True if the vector divides to zero.
    #[wasm_bindgen(js_name = "isUndetectable")]
    pub is_undetectable: bool,
}

/// Result of [`single_bit_sweep`].
#[wasm_bindgen(getter_with_clone)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOutput {
    /// Positions whose flip was detected.
    pub detected: Vec<u32>,
    /// Positions whose flip went unnoticed.
    pub undetected: Vec<u32>,
}

fn to_js(e: crclab_core::Error) -> JsError {
    JsError::new(&e.to_string())
}

fn positions_u32(positions: &[usize]) -> Vec<u32> {
    positions
        .iter()
        .map(|&p| u32::try_from(p).unwrap_or(u32::MAX))
        .collect()
}

/// Settings plus the registry they produce.
#[wasm_bindgen]
#[derive(Debug, Clone)]
pub struct Lab {
    config: LabConfig,
    registry: Registry,
}

impl Lab {
    fn from_config(config: LabConfig) -> crclab_core::Result<Self> {
        let registry = config.registry()?;
        // fail early on a default that names nothing
        config.default_config(&registry)?;
        Ok(Self { config, registry })
    }

    fn from_settings(
        default_polynomial: &str,
        custom_polynomials: &str,
        vector_padding: &str,
    ) -> crclab_core::Result<Self> {
        let config = LabConfig::from_lookup(|key| {
            let value = match key {
                crclab_core::config::ENV_DEFAULT_POLYNOMIAL => default_polynomial,
                crclab_core::config::ENV_CUSTOM_POLYNOMIALS => custom_polynomials,
                crclab_core::config::ENV_VECTOR_PADDING => vector_padding,
                _ => "",
            };
            Some(value.trim().to_owned()).filter(|v| !v.is_empty())
        })?;
        Self::from_config(config)
    }

    fn resolve(&self, polynomial: &str) -> crclab_core::Result<PolynomialConfig> {
        if polynomial.trim().is_empty() {
            return self.config.default_config(&self.registry);
        }
        self.registry.resolve(polynomial)
    }
}

impl Default for Lab {
    fn default() -> Self {
        Self {
            config: LabConfig::default(),
            registry: Registry::standard(),
        }
    }
}

fn parse_bits(text: &str) -> crclab_core::Result<BitString> {
    text.trim().parse()
}

impl From<ErrorAnalysis> for AnalysisOutput {
    fn from(analysis: ErrorAnalysis) -> Self {
        Self {
            corrupted: analysis.corrupted.into(),
            applied: positions_u32(&analysis.applied),
            ignored: positions_u32(&analysis.ignored),
            remainder: analysis.verification.remainder.into(),
            detected: analysis.detected,
        }
    }
}

// === Core operations without the JS error wrapper ===

fn describe_inner(lab: &Lab, polynomial: &str) -> crclab_core::Result<PolynomialInfo> {
    let config = lab.resolve(polynomial)?;
    Ok(PolynomialInfo {
        name: config.name().to_owned(),
        binary: config.binary_repr().to_owned(),
        formula: config.formula().to_owned(),
        width: config.width(),
    })
}

fn encode_inner(
    lab: &Lab,
    polynomial: &str,
    data: &BitString,
) -> crclab_core::Result<EncodeOutput> {
    let config = lab.resolve(polynomial)?;
    let encoded = codec::encode(data, &config)?;
    Ok(EncodeOutput {
        codeword_hex: encoded.codeword.to_hex(),
        crc: encoded.crc.into(),
        codeword: encoded.codeword.into(),
    })
}

fn verify_inner(lab: &Lab, polynomial: &str, codeword: &str) -> crclab_core::Result<VerifyOutput> {
    let config = lab.resolve(polynomial)?;
    let verification = codec::verify(&parse_bits(codeword)?, &config)?;
    Ok(VerifyOutput {
        remainder: verification.remainder.into(),
        is_valid: verification.is_valid,
    })
}

fn inject_inner(codeword: &str, positions: &str) -> crclab_core::Result<String> {
    let codeword = parse_bits(codeword)?;
    let pattern: ErrorPattern = positions.parse()?;
    Ok(analysis::inject_errors(&codeword, &pattern).into())
}

fn analyze_inner(
    lab: &Lab,
    polynomial: &str,
    codeword: &str,
    positions: &str,
) -> crclab_core::Result<AnalysisOutput> {
    let config = lab.resolve(polynomial)?;
    let codeword = parse_bits(codeword)?;
    let pattern: ErrorPattern = positions.parse()?;
    Ok(analysis::analyze(&codeword, &pattern, &config)?.into())
}

fn vector_inner(lab: &Lab, polynomial: &str) -> crclab_core::Result<VectorOutput> {
    let config = lab.resolve(polynomial)?;
    let generated = lab.config.undetectable_vector(&config)?;
    Ok(VectorOutput {
        vector: generated.vector.into(),
        remainder: generated.remainder.into(),
        is_undetectable: generated.is_undetectable,
    })
}

fn apply_vector_inner(
    lab: &Lab,
    polynomial: &str,
    codeword: &str,
    vector: &str,
) -> crclab_core::Result<AnalysisOutput> {
    let config = lab.resolve(polynomial)?;
    let codeword = parse_bits(codeword)?;
    let vector = parse_bits(vector)?;
    Ok(analysis::analyze_vector(&codeword, &vector, &config)?.into())
}

fn sweep_inner(lab: &Lab, polynomial: &str, codeword: &str) -> crclab_core::Result<SweepOutput> {
    let config = lab.resolve(polynomial)?;
    let report = analysis::single_bit_sweep(&parse_bits(codeword)?, &config)?;
    Ok(SweepOutput {
        detected: positions_u32(&report.detected),
        undetected: positions_u32(&report.undetected),
    })
}

// === Registry ===

/// Names of the built-in polynomials, in display order.
#[wasm_bindgen]
pub fn polynomial_names() -> Vec<String> {
    Registry::standard()
        .names()
        .into_iter()
        .map(str::to_owned)
        .collect()
}

/// Describe a registry entry or a binary polynomial.
#[wasm_bindgen]
pub fn describe_polynomial(polynomial: &str) -> Result<PolynomialInfo, JsError> {
    describe_inner(&Lab::default(), polynomial).map_err(to_js)
}

// === Conversion ===

/// Convert hex text (any case) to bits, 4 per digit.
#[wasm_bindgen]
pub fn hex_to_binary(hex: &str) -> Result<String, JsError> {
    crclab_core::hex_to_binary(hex.trim())
        .map(String::from)
        .map_err(to_js)
}

/// Convert bits to uppercase hex, zero-padding on the left.
#[wasm_bindgen]
pub fn binary_to_hex(bits: &str) -> Result<String, JsError> {
    parse_bits(bits)
        .map(|b| crclab_core::binary_to_hex(&b))
        .map_err(to_js)
}

// === CRC ===

/// Compute the CRC of binary `data` and build the codeword.
#[wasm_bindgen]
pub fn encode(polynomial: &str, data: &str) -> Result<EncodeOutput, JsError> {
    parse_bits(data)
        .and_then(|bits| encode_inner(&Lab::default(), polynomial, &bits))
        .map_err(to_js)
}

/// Compute the CRC of hex `data` and build the codeword.
#[wasm_bindgen]
pub fn encode_hex(polynomial: &str, data: &str) -> Result<EncodeOutput, JsError> {
    crclab_core::hex_to_binary(data.trim())
        .and_then(|bits| encode_inner(&Lab::default(), polynomial, &bits))
        .map_err(to_js)
}

/// Verify a received codeword.
///
/// `isValid` means no error was *detected*; see
/// [`generate_undetectable_vector`].
#[wasm_bindgen]
pub fn verify(polynomial: &str, codeword: &str) -> Result<VerifyOutput, JsError> {
    verify_inner(&Lab::default(), polynomial, codeword).map_err(to_js)
}

// === Error Analysis ===

/// Flip the comma-separated `positions` in `codeword`.
///
/// Positions past the end are ignored; a position listed twice cancels.
#[wasm_bindgen]
pub fn inject_errors(codeword: &str, positions: &str) -> Result<String, JsError> {
    inject_inner(codeword, positions).map_err(to_js)
}

/// Flip `positions` in `codeword` and report whether the CRC notices.
#[wasm_bindgen]
pub fn analyze_errors(
    polynomial: &str,
    codeword: &str,
    positions: &str,
) -> Result<AnalysisOutput, JsError> {
    analyze_inner(&Lab::default(), polynomial, codeword, positions).map_err(to_js)
}

/// Build an error vector that the polynomial cannot detect.
#[wasm_bindgen]
pub fn generate_undetectable_vector(polynomial: &str) -> Result<VectorOutput, JsError> {
    vector_inner(&Lab::default(), polynomial).map_err(to_js)
}

/// XOR `vector` onto the end of `codeword` and verify the result.
#[wasm_bindgen]
pub fn apply_error_vector(
    polynomial: &str,
    codeword: &str,
    vector: &str,
) -> Result<AnalysisOutput, JsError> {
    apply_vector_inner(&Lab::default(), polynomial, codeword, vector).map_err(to_js)
}

/// Try every single-bit error on `codeword`.
#[wasm_bindgen]
pub fn single_bit_sweep(polynomial: &str, codeword: &str) -> Result<SweepOutput, JsError> {
    sweep_inner(&Lab::default(), polynomial, codeword).map_err(to_js)
}

// === Configured Lab ===

#[wasm_bindgen]
impl Lab {
    /// Build a lab from caller settings.
    ///
    /// * `default_polynomial` - used when a `polynomial` argument is empty;
    ///   empty means `CRC-4`
    /// * `custom_polynomials` - `NAME=binary;NAME=binary`, may be empty
    /// * `vector_padding` - zero bits after undetectable vectors; empty
    ///   means the default of 3
    #[wasm_bindgen(constructor)]
    pub fn new(
        default_polynomial: &str,
        custom_polynomials: &str,
        vector_padding: &str,
    ) -> Result<Lab, JsError> {
        Self::from_settings(default_polynomial, custom_polynomials, vector_padding).map_err(to_js)
    }

    /// Names of all polynomials in this lab, built-in first.
    pub fn polynomial_names(&self) -> Vec<String> {
        self.registry
            .names()
            .into_iter()
            .map(str::to_owned)
            .collect()
    }

    /// Describe a polynomial known to this lab.
    pub fn describe_polynomial(&self, polynomial: &str) -> Result<PolynomialInfo, JsError> {
        describe_inner(self, polynomial).map_err(to_js)
    }

    /// Compute the CRC of binary `data` and build the codeword.
    pub fn encode(&self, polynomial: &str, data: &str) -> Result<EncodeOutput, JsError> {
        parse_bits(data)
            .and_then(|bits| encode_inner(self, polynomial, &bits))
            .map_err(to_js)
    }

    /// Compute the CRC of hex `data` and build the codeword.
    pub fn encode_hex(&self, polynomial: &str, data: &str) -> Result<EncodeOutput, JsError> {
        crclab_core::hex_to_binary(data.trim())
            .and_then(|bits| encode_inner(self, polynomial, &bits))
            .map_err(to_js)
    }

    /// Verify a received codeword.
    pub fn verify(&self, polynomial: &str, codeword: &str) -> Result<VerifyOutput, JsError> {
        verify_inner(self, polynomial, codeword).map_err(to_js)
    }

    /// Flip `positions` in `codeword` and report whether the CRC notices.
    pub fn analyze_errors(
        &self,
        polynomial: &str,
        codeword: &str,
        positions: &str,
    ) -> Result<AnalysisOutput, JsError> {
        analyze_inner(self, polynomial, codeword, positions).map_err(to_js)
    }

    /// Build an undetectable error vector with this lab's padding.
    pub fn generate_undetectable_vector(&self, polynomial: &str) -> Result<VectorOutput, JsError> {
        vector_inner(self, polynomial).map_err(to_js)
    }

    /// XOR `vector` onto the end of `codeword` and verify the result.
    pub fn apply_error_vector(
        &self,
        polynomial: &str,
        codeword: &str,
        vector: &str,
    ) -> Result<AnalysisOutput, JsError> {
        apply_vector_inner(self, polynomial, codeword, vector).map_err(to_js)
    }

    /// Try every single-bit error on `codeword`.
    pub fn single_bit_sweep(&self, polynomial: &str, codeword: &str) -> Result<SweepOutput, JsError> {
        sweep_inner(self, polynomial, codeword).map_err(to_js)
    }
}
