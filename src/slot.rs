//! Slot descriptors: typed ports binding function parameters to graph ports.

use serde::{Deserialize, Serialize};

use crate::error::CodegenError;
use crate::precision::Precision;
use crate::util::fmt_f32;

/// Slot ids are a node-wide identity used to persist graph edges; they are
/// stable across configuration changes and must never be renumbered once
/// published.
pub type SlotId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotDirection {
    Input,
    Output,
}

/// Where an input slot takes its value from when no edge feeds it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BindingSource {
    /// No external binding; the slot falls back to its default value.
    None,
    /// Bound to a mesh UV channel of the enclosing program.
    MeshUv(u8),
}

/// Immutable metadata binding one function parameter to a graph port.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SlotDescriptor {
    pub id: SlotId,
    /// Identifier the body template refers to this slot by.
    pub name: String,
    pub direction: SlotDirection,
    pub binding: BindingSource,
    /// Component count of the slot's value, 1..=4.
    pub components: u8,
    /// Fallback value for inputs left unconnected; always `None` for outputs.
    pub default_value: Option<[f32; 4]>,
}

impl SlotDescriptor {
    pub fn input(id: SlotId, name: impl Into<String>, components: u8) -> Self {
        Self::input_with_default(id, name, components, [0.0; 4])
    }

    pub fn input_with_default(
        id: SlotId,
        name: impl Into<String>,
        components: u8,
        default_value: [f32; 4],
    ) -> Self {
        Self {
            id,
            name: name.into(),
            direction: SlotDirection::Input,
            binding: BindingSource::None,
            components,
            default_value: Some(default_value),
        }
    }

    /// Input taking its value from an external semantic source when left
    /// unconnected.
    pub fn input_bound(
        id: SlotId,
        name: impl Into<String>,
        components: u8,
        binding: BindingSource,
    ) -> Self {
        Self {
            binding,
            ..Self::input(id, name, components)
        }
    }

    pub fn output(id: SlotId, name: impl Into<String>, components: u8) -> Self {
        Self {
            id,
            name: name.into(),
            direction: SlotDirection::Output,
            binding: BindingSource::None,
            components,
            default_value: None,
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == SlotDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == SlotDirection::Output
    }

    /// Literal expression for this slot's default value, e.g. `float4(1, 1, 1, 1)`.
    pub fn default_literal(&self, precision: Precision) -> Result<String, CodegenError> {
        let v = self.default_value.unwrap_or([0.0; 4]);
        if self.components == 1 {
            return Ok(fmt_f32(v[0]));
        }
        // Resolve the type first so an out-of-range arity errors instead
        // of panicking on the slice below.
        let ty = precision.concrete_type(self.components)?;
        let parts: Vec<String> = v[..self.components as usize]
            .iter()
            .copied()
            .map(fmt_f32)
            .collect();
        Ok(format!("{}({})", ty, parts.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_literal_scalar_and_vector() {
        let opacity = SlotDescriptor::input_with_default(3, "Opacity", 1, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(opacity.default_literal(Precision::Full).unwrap(), "1");

        let base = SlotDescriptor::input(0, "Base", 4);
        assert_eq!(
            base.default_literal(Precision::Half).unwrap(),
            "half4(0, 0, 0, 0)"
        );

        let tiling = SlotDescriptor::input_with_default(2, "Tiling", 2, [8.0, 8.0, 8.0, 8.0]);
        assert_eq!(
            tiling.default_literal(Precision::Full).unwrap(),
            "float2(8, 8)"
        );
    }

    #[test]
    fn default_literal_rejects_out_of_range_arity() {
        let mut slot = SlotDescriptor::input(0, "Base", 4);
        slot.components = 7;
        let err = slot.default_literal(Precision::Full).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::UnsupportedPrecision { components: 7, .. }
        ));
    }

    #[test]
    fn outputs_carry_no_default() {
        let out = SlotDescriptor::output(2, "Out", 4);
        assert!(out.is_output());
        assert!(out.default_value.is_none());
    }

    #[test]
    fn serde_round_trip() {
        let slot = SlotDescriptor::input_bound(0, "UV", 2, BindingSource::MeshUv(0));
        let json = serde_json::to_string(&slot).unwrap();
        let back: SlotDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, slot);
    }
}
