//! Tiling gradient noise node.
//!
//! Single-variant node whose template calls a shared direction-hash helper;
//! the helper goes through the function registry under a precision-suffixed
//! key, so any number of noise nodes in one program share one copy.

use std::sync::Arc;

use crate::slot::{BindingSource, SlotDescriptor};
use crate::variant::{HelperFunction, NodeDefinition};

/// Registry key of the shared direction-hash helper (before precision
/// substitution).
pub const DIR_HELPER_KEY: &str = "TilingGradientNoise_Dir_$precision";

const DIR_HELPER_SOURCE: &str = "\
$precision2 TilingGradientNoise_Dir_$precision($precision2 p, $precision2 tiling)
{
    p.xy = p.xy % tiling.xy;
    p = p % 289;
    $precision x = (34 * p.x + 1) * p.x % 289 + p.y;
    x = (34 * x + 1) * x % 289;
    x = frac(x / 41) * 2 - 1;
    return normalize($precision2(x - floor(x + 0.5), abs(x) - 0.5));
}
";

const BODY: &str = "{
    $precision2 p = UV * Scale;
    $precision2 ip = floor(p);
    $precision2 fp = frac(p);
    $precision2 tiling = Tiling;
    $precision d00 = dot(TilingGradientNoise_Dir_$precision(ip, tiling), fp);
    $precision d01 = dot(TilingGradientNoise_Dir_$precision(ip + $precision2(0, 1), tiling), fp - $precision2(0, 1));
    $precision d10 = dot(TilingGradientNoise_Dir_$precision(ip + $precision2(1, 0), tiling), fp - $precision2(1, 0));
    $precision d11 = dot(TilingGradientNoise_Dir_$precision(ip + $precision2(1, 1), tiling), fp - $precision2(1, 1));
    fp = fp * fp * fp * (fp * (fp * 6 - 15) + 10);
    Out = lerp(lerp(d00, d01, fp.y), lerp(d10, d11, fp.y), fp.x) + 0.5;
}";

pub fn definition() -> Arc<NodeDefinition> {
    Arc::new(
        NodeDefinition::builder("Tiling Gradient Noise", "TilingGradientNoise")
            .variant_with_helpers(
                "Default",
                vec![
                    SlotDescriptor::input_bound(0, "UV", 2, BindingSource::MeshUv(0)),
                    SlotDescriptor::input_with_default(1, "Scale", 1, [10.0, 10.0, 10.0, 10.0]),
                    SlotDescriptor::input_with_default(2, "Tiling", 2, [8.0, 8.0, 8.0, 8.0]),
                    SlotDescriptor::output(3, "Out", 1),
                ],
                BODY,
                vec![HelperFunction::new(DIR_HELPER_KEY, DIR_HELPER_SOURCE)],
            )
            .build()
            .expect("noise definition is well-formed"),
    )
}
