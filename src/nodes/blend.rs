//! Blend color node: one function variant per blend mode.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::slot::SlotDescriptor;
use crate::variant::NodeDefinition;

/// The configuration enumeration of the blend color node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlendMode {
    Burn,
    Darken,
    Difference,
    Dodge,
    Divide,
    Exclusion,
    HardLight,
    HardMix,
    Lighten,
    LinearBurn,
    LinearDodge,
    LinearLight,
    LinearLightAddSub,
    Multiply,
    Negation,
    #[default]
    Overlay,
    PinLight,
    Screen,
    SoftLight,
    VividLight,
    Subtract,
    Overwrite,
}

impl BlendMode {
    pub const ALL: [BlendMode; 22] = [
        BlendMode::Burn,
        BlendMode::Darken,
        BlendMode::Difference,
        BlendMode::Dodge,
        BlendMode::Divide,
        BlendMode::Exclusion,
        BlendMode::HardLight,
        BlendMode::HardMix,
        BlendMode::Lighten,
        BlendMode::LinearBurn,
        BlendMode::LinearDodge,
        BlendMode::LinearLight,
        BlendMode::LinearLightAddSub,
        BlendMode::Multiply,
        BlendMode::Negation,
        BlendMode::Overlay,
        BlendMode::PinLight,
        BlendMode::Screen,
        BlendMode::SoftLight,
        BlendMode::VividLight,
        BlendMode::Subtract,
        BlendMode::Overwrite,
    ];

    /// The enumeration member name, which is also the configuration value.
    pub fn name(self) -> &'static str {
        match self {
            BlendMode::Burn => "Burn",
            BlendMode::Darken => "Darken",
            BlendMode::Difference => "Difference",
            BlendMode::Dodge => "Dodge",
            BlendMode::Divide => "Divide",
            BlendMode::Exclusion => "Exclusion",
            BlendMode::HardLight => "HardLight",
            BlendMode::HardMix => "HardMix",
            BlendMode::Lighten => "Lighten",
            BlendMode::LinearBurn => "LinearBurn",
            BlendMode::LinearDodge => "LinearDodge",
            BlendMode::LinearLight => "LinearLight",
            BlendMode::LinearLightAddSub => "LinearLightAddSub",
            BlendMode::Multiply => "Multiply",
            BlendMode::Negation => "Negation",
            BlendMode::Overlay => "Overlay",
            BlendMode::PinLight => "PinLight",
            BlendMode::Screen => "Screen",
            BlendMode::SoftLight => "SoftLight",
            BlendMode::VividLight => "VividLight",
            BlendMode::Subtract => "Subtract",
            BlendMode::Overwrite => "Overwrite",
        }
    }
}

/// Every blend variant shares the same slot set; slot ids are the node-wide
/// port identity and never change.
fn slots() -> Vec<SlotDescriptor> {
    vec![
        SlotDescriptor::input(0, "Base", 4),
        SlotDescriptor::input(1, "Blend", 4),
        SlotDescriptor::input_with_default(3, "Opacity", 1, [1.0, 1.0, 1.0, 1.0]),
        SlotDescriptor::output(2, "Out", 4),
    ]
}

/// The blend color node definition: 22 variants, one per [`BlendMode`].
pub fn definition() -> Arc<NodeDefinition> {
    let mut builder = NodeDefinition::builder("Blend Color", "Blend");
    for mode in BlendMode::ALL {
        builder = builder.variant(mode.name(), slots(), body(mode));
    }
    Arc::new(
        builder
            .expect_configurations(BlendMode::ALL.map(BlendMode::name))
            .build()
            .expect("blend variant table covers every blend mode"),
    )
}

fn body(mode: BlendMode) -> &'static str {
    match mode {
        BlendMode::Burn => {
            "{
    Out.rgb = 1.0 - (1.0 - Blend.rgb)/(Base.rgb + 0.000000000001);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Darken => {
            "{
    Out.rgb = min(Blend.rgb, Base.rgb);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Difference => {
            "{
    Out.rgb = abs(Blend.rgb - Base.rgb);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Dodge => {
            "{
    Out.rgb = Base.rgb / (1.0 - clamp(Blend.rgb, 0.000001, 0.999999));
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Divide => {
            "{
    Out.rgb = Base.rgb / (Blend.rgb + 0.000000000001);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Exclusion => {
            "{
    Out.rgb = Blend.rgb + Base.rgb - (2.0 * Blend.rgb * Base.rgb);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::HardLight => {
            "{
    $precision{slot2dimension} result1 = 1.0 - 2.0 * (1.0 - Base) * (1.0 - Blend);
    $precision{slot2dimension} result2 = 2.0 * Base * Blend;
    $precision{slot2dimension} zeroOrOne = step(Blend, 0.5);
    Out.rgb = result2 * zeroOrOne + (1 - zeroOrOne) * result1;
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::HardMix => {
            "{
    Out.rgb = step(1 - Base.rgb, Blend.rgb);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Lighten => {
            "{
    Out.rgb = max(Blend.rgb, Base.rgb);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::LinearBurn => {
            "{
    Out.rgb = Base.rgb + Blend.rgb - 1.0;
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::LinearDodge => {
            "{
    Out.rgb = Base.rgb + Blend.rgb;
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::LinearLight => {
            "{
    Out.rgb = Blend.rgb < 0.5 ? max(Base.rgb + (2 * Blend.rgb) - 1, 0) : min(Base.rgb + 2 * (Blend.rgb - 0.5), 1);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::LinearLightAddSub => {
            "{
    Out.rgb = Blend.rgb + 2.0 * Base.rgb - 1.0;
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Multiply => {
            "{
    Out.rgb = Base.rgb * Blend.rgb;
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Negation => {
            "{
    Out.rgb = 1.0 - abs(1.0 - Blend.rgb - Base.rgb);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Overlay => {
            "{
    $precision{slot2dimension} result1 = 1.0 - 2.0 * (1.0 - Base) * (1.0 - Blend);
    $precision{slot2dimension} result2 = 2.0 * Base * Blend;
    $precision{slot2dimension} zeroOrOne = step(Base, 0.5);
    Out.rgb = result2.rgb * zeroOrOne.rgb + (1 - zeroOrOne.rgb) * result1.rgb;
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::PinLight => {
            "{
    $precision{slot2dimension} check = step(0.5, Blend);
    $precision{slot2dimension} result1 = check * max(2.0 * (Base - 0.5), Blend);
    Out.rgb = result1.rgb + (1.0 - check.rgb) * min(2.0 * Base.rgb, Blend.rgb);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Screen => {
            "{
    Out.rgb = 1.0 - (1.0 - Blend.rgb) * (1.0 - Base.rgb);
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::SoftLight => {
            "{
    $precision{slot2dimension} result1 = 2.0 * Base * Blend + Base * Base * (1.0 - 2.0 * Blend);
    $precision{slot2dimension} result2 = sqrt(Base) * (2.0 * Blend - 1.0) + 2.0 * Base * (1.0 - Blend);
    $precision{slot2dimension} zeroOrOne = step(0.5, Blend);
    Out.rgb = result2.rgb * zeroOrOne.rgb + (1 - zeroOrOne.rgb) * result1.rgb;
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::VividLight => {
            "{
    Base.rgb = clamp(Base.rgb, 0.000001, 0.999999);
    $precision{slot2dimension} result1 = 1.0 - (1.0 - Blend) / (2.0 * Base);
    $precision{slot2dimension} result2 = Blend / (2.0 * (1.0 - Base));
    $precision{slot2dimension} zeroOrOne = step(0.5, Base);
    Out.rgb = result2.rgb * zeroOrOne.rgb + (1 - zeroOrOne.rgb) * result1.rgb;
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Subtract => {
            "{
    Out.rgb = Base.rgb - Blend.rgb;
    Out.rgb = lerp(Base.rgb, Out.rgb, Opacity);
    Out.a = Base.a;
}"
        }
        BlendMode::Overwrite => {
            "{
    Out.rgb = lerp(Base.rgb, Blend.rgb, Opacity);
    Out.a = Base.a;
}"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emitter::{self, SlotBindings};
    use crate::precision::Precision;
    use crate::registry::FunctionRegistry;

    #[test]
    fn every_mode_resolves_to_its_variant() {
        let def = definition();
        for mode in BlendMode::ALL {
            let variant = def.resolve(mode.name()).unwrap();
            assert_eq!(variant.name, format!("Blend_{}", mode.name()));
        }
    }

    #[test]
    fn dimension_tokens_resolve_against_the_out_slot() {
        let def = definition();
        let variant = def.resolve("Overlay").unwrap();
        let bindings = SlotBindings::from([
            (0, "base".to_string()),
            (1, "blend".to_string()),
            (2, "result".to_string()),
            (3, "1".to_string()),
        ]);
        let mut registry = FunctionRegistry::new();
        let text = emitter::emit(variant, &bindings, Precision::Full, &mut registry).unwrap();
        assert!(text.contains("float4 result1 = 1.0 - 2.0 * (1.0 - base) * (1.0 - blend);"));
        assert!(text.contains("result.rgb = lerp(base.rgb, result.rgb, 1);"));
        assert!(!text.contains("$precision"));
        assert!(!text.contains("dimension}"));
    }
}
