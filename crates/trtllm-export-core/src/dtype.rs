//! Engine data type codes.
//!
//! Configs name the engine precision with a two-letter code. The toolchain
//! expects its own spelling, so every code maps to exactly one toolchain name.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{ExportError, Result};

/// Precision of the generated engine, by config code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Dtype {
    /// `fp`
    #[default]
    Float16,
    /// `bf`
    BFloat16,
    /// `f8`
    Float8,
    /// `w4`: 4-bit weights, 16-bit activations
    W4A16,
    /// `w8`: 8-bit weights, 16-bit activations
    W8A16,
    /// `a8`: 8-bit weights and activations
    W8A8,
}

impl Dtype {
    pub const ALL: [Dtype; 6] = [
        Dtype::Float16,
        Dtype::BFloat16,
        Dtype::Float8,
        Dtype::W4A16,
        Dtype::W8A16,
        Dtype::W8A8,
    ];

    /// Look up a config code.
    pub fn from_code(code: &str) -> Result<Self> {
        match code {
            "fp" => Ok(Dtype::Float16),
            "bf" => Ok(Dtype::BFloat16),
            "f8" => Ok(Dtype::Float8),
            "w4" => Ok(Dtype::W4A16),
            "w8" => Ok(Dtype::W8A16),
            "a8" => Ok(Dtype::W8A8),
            other => Err(ExportError::UnknownDtype {
                code: other.to_string(),
            }),
        }
    }

    /// The two-letter code used in configs.
    pub fn code(&self) -> &'static str {
        match self {
            Dtype::Float16 => "fp",
            Dtype::BFloat16 => "bf",
            Dtype::Float8 => "f8",
            Dtype::W4A16 => "w4",
            Dtype::W8A16 => "w8",
            Dtype::W8A8 => "a8",
        }
    }

    /// The name passed to the toolchain's `--dtype` flag and used in output names.
    pub fn toolchain_name(&self) -> &'static str {
        match self {
            Dtype::Float16 => "float16",
            Dtype::BFloat16 => "bfloat16",
            Dtype::Float8 => "float8",
            Dtype::W4A16 => "w4a16",
            Dtype::W8A16 => "w8a16",
            Dtype::W8A8 => "w8a8",
        }
    }
}

/// Map a config code straight to the toolchain name.
pub fn map_dtype(code: &str) -> Result<&'static str> {
    Dtype::from_code(code).map(|d| d.toolchain_name())
}

impl FromStr for Dtype {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        Dtype::from_code(s)
    }
}

impl TryFrom<String> for Dtype {
    type Error = ExportError;

    fn try_from(value: String) -> Result<Self> {
        Dtype::from_code(&value)
    }
}

impl From<Dtype> for String {
    fn from(dtype: Dtype) -> Self {
        dtype.code().to_string()
    }
}

impl fmt::Display for Dtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_table() {
        assert_eq!(map_dtype("fp").unwrap(), "float16");
        assert_eq!(map_dtype("bf").unwrap(), "bfloat16");
        assert_eq!(map_dtype("f8").unwrap(), "float8");
        assert_eq!(map_dtype("w4").unwrap(), "w4a16");
        assert_eq!(map_dtype("w8").unwrap(), "w8a16");
        assert_eq!(map_dtype("a8").unwrap(), "w8a8");
    }

    #[test]
    fn test_codes_and_names_are_distinct() {
        let names: std::collections::HashSet<_> =
            Dtype::ALL.iter().map(|d| d.toolchain_name()).collect();
        assert_eq!(names.len(), 6);
        for dtype in Dtype::ALL {
            assert_eq!(Dtype::from_code(dtype.code()).unwrap(), dtype);
        }
    }

    #[test]
    fn test_unknown_codes_fail() {
        for code in ["", "float16", "FP", "q4", "w16"] {
            let err = map_dtype(code).unwrap_err();
            assert!(matches!(err, ExportError::UnknownDtype { .. }), "{code}");
        }
    }

    #[test]
    fn test_default_is_float16() {
        assert_eq!(Dtype::default().toolchain_name(), "float16");
    }
}
