//! Feature configuration for constant-expression processing.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Proposals that widen the set of legal constant-expression opcodes.
///
/// A disabled proposal makes its opcodes reject exactly like any other
/// opcode that is illegal in a constant expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Features {
    /// `v128.const`.
    pub simd: bool,
    /// `struct.new*`, `array.new*`, `ref.i31`, `any.convert_extern`,
    /// `extern.convert_any`.
    pub gc: bool,
    /// `i32/i64.add`, `sub`, `mul`.
    pub extended_const: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            simd: true,
            gc: true,
            extended_const: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstExprConfig {
    pub features: Features,
}

impl ConstExprConfig {
    #[must_use]
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Parse a configuration from JSON; missing keys keep their defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}
