//! Configuration for crclab callers.
//!
//! All configuration is loaded from environment variables, optionally
//! seeded from a `.env` file by [`LabConfig::load`].
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `CRCLAB_DEFAULT_POLYNOMIAL` | `CRC-4` | Registry entry preselected by callers |
//! | `CRCLAB_VECTOR_PADDING` | `3` | Zero bits after generated undetectable vectors |
//! | `CRCLAB_CUSTOM_POLYNOMIALS` | empty | Extra entries, `NAME=binary;NAME=binary` |

use crate::analysis::{self, UndetectableVector, DEFAULT_VECTOR_PADDING};
use crate::error::{Error, Result};
use crate::registry::{PolynomialConfig, Registry};

/// Environment variable naming the default polynomial.
pub const ENV_DEFAULT_POLYNOMIAL: &str = "CRCLAB_DEFAULT_POLYNOMIAL";
/// Environment variable for undetectable-vector padding.
pub const ENV_VECTOR_PADDING: &str = "CRCLAB_VECTOR_PADDING";
/// Environment variable listing custom polynomials.
pub const ENV_CUSTOM_POLYNOMIALS: &str = "CRCLAB_CUSTOM_POLYNOMIALS";

/// Registry name used when nothing else is configured.
pub const DEFAULT_POLYNOMIAL: &str = "CRC-4";

/// Caller-facing settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabConfig {
    /// Registry entry callers preselect
    pub default_polynomial: String,

    /// Zero bits appended to generated undetectable vectors (default: 3)
    pub vector_padding: usize,

    /// Extra `(name, binary)` polynomials added on top of the standard table
    pub custom_polynomials: Vec<(String, String)>,
}

impl LabConfig {
    /// Read a `.env` file if present, then the process environment.
    pub fn load() -> Result<Self> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_env()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup`, which maps a variable name to
    /// its value.
    ///
    /// # Errors
    ///
    /// `InvalidSetting` for a non-numeric padding or a custom entry that is
    /// not `NAME=binary`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let default_polynomial = lookup(ENV_DEFAULT_POLYNOMIAL)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_POLYNOMIAL.to_string());

        let vector_padding = match lookup(ENV_VECTOR_PADDING) {
            Some(value) => value.trim().parse().map_err(|_| Error::InvalidSetting {
                key: ENV_VECTOR_PADDING.to_string(),
                value,
            })?,
            None => DEFAULT_VECTOR_PADDING,
        };

        let custom_polynomials = match lookup(ENV_CUSTOM_POLYNOMIALS) {
            Some(value) => parse_custom(&value)?,
            None => Vec::new(),
        };

        let config = Self {
            default_polynomial,
            vector_padding,
            custom_polynomials,
        };
        tracing::debug!(
            default_polynomial = %config.default_polynomial,
            vector_padding = config.vector_padding,
            custom = config.custom_polynomials.len(),
            "loaded configuration"
        );
        Ok(config)
    }

    /// The standard registry plus the configured custom entries.
    ///
    /// # Errors
    ///
    /// Config errors for a malformed custom polynomial or a name clash.
    pub fn registry(&self) -> Result<Registry> {
        self.custom_polynomials
            .iter()
            .try_fold(Registry::standard(), |registry, (name, binary)| {
                registry.with_custom(PolynomialConfig::from_binary(name.as_str(), binary)?)
            })
    }

    /// Resolve `default_polynomial` against `registry`.
    pub fn default_config(&self, registry: &Registry) -> Result<PolynomialConfig> {
        registry.resolve(&self.default_polynomial)
    }

    /// Generate an undetectable vector with the configured padding.
    pub fn undetectable_vector(&self, config: &PolynomialConfig) -> Result<UndetectableVector> {
        analysis::generate_undetectable_vector_with_padding(config, self.vector_padding)
    }
}

impl Default for LabConfig {
    fn default() -> Self {
        Self {
            default_polynomial: DEFAULT_POLYNOMIAL.to_string(),
            vector_padding: DEFAULT_VECTOR_PADDING,
            custom_polynomials: Vec::new(),
        }
    }
}

fn parse_custom(value: &str) -> Result<Vec<(String, String)>> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| match entry.split_once('=') {
            Some((name, binary)) if !name.trim().is_empty() => {
                Ok((name.trim().to_owned(), binary.trim().to_owned()))
            }
            _ => Err(Error::InvalidSetting {
                key: ENV_CUSTOM_POLYNOMIALS.to_string(),
                value: entry.to_owned(),
            }),
        })
        .collect()
}
