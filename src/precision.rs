//! Mapping from abstract numeric types to concrete shading-language tokens.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CodegenError;

/// Numeric representation width used when resolving abstract types to
/// concrete type tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    Full,
    Half,
}

impl Precision {
    /// Scalar type token substituted for the `$precision` placeholder.
    pub fn scalar_token(self) -> &'static str {
        match self {
            Precision::Full => "float",
            Precision::Half => "half",
        }
    }

    /// Concrete type token for a value with `components` components.
    ///
    /// Total over the supported cross-product {1..=4} x {Full, Half};
    /// anything else fails with [`CodegenError::UnsupportedPrecision`].
    pub fn concrete_type(self, components: u8) -> Result<&'static str, CodegenError> {
        let token = match (self, components) {
            (Precision::Full, 1) => "float",
            (Precision::Full, 2) => "float2",
            (Precision::Full, 3) => "float3",
            (Precision::Full, 4) => "float4",
            (Precision::Half, 1) => "half",
            (Precision::Half, 2) => "half2",
            (Precision::Half, 3) => "half3",
            (Precision::Half, 4) => "half4",
            _ => {
                return Err(CodegenError::UnsupportedPrecision {
                    components,
                    precision: self,
                });
            }
        };
        Ok(token)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Precision::Full => "full",
            Precision::Half => "half",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concrete_type_covers_supported_cross_product() {
        let expected = [
            (Precision::Full, 1, "float"),
            (Precision::Full, 2, "float2"),
            (Precision::Full, 3, "float3"),
            (Precision::Full, 4, "float4"),
            (Precision::Half, 1, "half"),
            (Precision::Half, 2, "half2"),
            (Precision::Half, 3, "half3"),
            (Precision::Half, 4, "half4"),
        ];
        for (precision, components, token) in expected {
            assert_eq!(precision.concrete_type(components).unwrap(), token);
        }
    }

    #[test]
    fn concrete_type_is_pure() {
        assert_eq!(
            Precision::Half.concrete_type(4).unwrap(),
            Precision::Half.concrete_type(4).unwrap()
        );
    }

    #[test]
    fn unsupported_arity_is_rejected() {
        for components in [0u8, 5, 16] {
            let err = Precision::Full.concrete_type(components).unwrap_err();
            assert!(matches!(
                err,
                CodegenError::UnsupportedPrecision { components: c, .. } if c == components
            ));
        }
    }

    #[test]
    fn serde_round_trip() {
        let json = serde_json::to_string(&Precision::Half).unwrap();
        assert_eq!(json, "\"half\"");
        let back: Precision = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Precision::Half);
    }
}
