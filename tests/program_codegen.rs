use anyhow::Result;

use shadegen::nodes::{blend, noise};
use shadegen::{Endpoint, Precision, ShaderGraph};

#[test]
fn screen_configuration_selects_the_screen_variant() -> Result<()> {
    let mut graph = ShaderGraph::new();
    graph.add_node("blend1", blend::definition())?;
    graph.set_configuration("blend1", "Screen")?;

    assert_eq!(graph.node("blend1").unwrap().resolve()?.name, "Blend_Screen");

    let program = graph.compile(Precision::Full)?;
    let (node_id, block) = &program.node_blocks[0];
    assert_eq!(node_id, "blend1");
    // The screen formula, with both color inputs on their defaults.
    assert!(block.contains(
        "blend1_Out.rgb = 1.0 - (1.0 - float4(0, 0, 0, 0).rgb) * (1.0 - float4(0, 0, 0, 0).rgb);"
    ));
    Ok(())
}

#[test]
fn vector4_full_precision_substitutes_every_placeholder() -> Result<()> {
    let mut graph = ShaderGraph::new();
    graph.add_node("blend1", blend::definition())?;
    graph.set_configuration("blend1", "Overlay")?;

    let text = graph.compile(Precision::Full)?.assemble();
    assert!(text.contains("float4 blend1_Out;"));
    // `$precision{slot2dimension}` resolves to the Out slot's arity at full
    // precision, everywhere it appears.
    assert_eq!(text.matches("float4 result1").count(), 1);
    assert_eq!(text.matches("float4 result2").count(), 1);
    assert_eq!(text.matches("float4 zeroOrOne").count(), 1);
    assert!(!text.contains("$precision"));
    assert!(!text.contains("dimension}"));
    Ok(())
}

#[test]
fn shared_helper_appears_exactly_once_across_nodes() -> Result<()> {
    let mut graph = ShaderGraph::new();
    graph.add_node("noise1", noise::definition())?;
    graph.add_node("noise2", noise::definition())?;
    graph.add_node("blend1", blend::definition())?;
    graph.connect(Endpoint::new("noise1", 3), Endpoint::new("blend1", 0))?;
    graph.connect(Endpoint::new("noise2", 3), Endpoint::new("blend1", 1))?;

    let program = graph.compile(Precision::Full)?;
    let text = program.assemble();

    // Both noise nodes registered the direction helper; it is defined once.
    let signature = "float2 TilingGradientNoise_Dir_float(float2 p, float2 tiling)";
    assert_eq!(text.matches(signature).count(), 1);
    // ...and called from both node bodies.
    assert!(text.matches("dot(TilingGradientNoise_Dir_float(ip, tiling), fp)").count() >= 2);

    // The helper block precedes every node body.
    let helper_at = text.find(signature).unwrap();
    let first_body_at = text.find("noise1_Out;").unwrap();
    assert!(helper_at < first_body_at);
    Ok(())
}

#[test]
fn connected_inputs_read_the_upstream_output_variable() -> Result<()> {
    let mut graph = ShaderGraph::new();
    graph.add_node("noise1", noise::definition())?;
    graph.add_node("blend1", blend::definition())?;
    graph.set_configuration("blend1", "Multiply")?;
    graph.connect(Endpoint::new("noise1", 3), Endpoint::new("blend1", 0))?;

    let text = graph.compile(Precision::Full)?.assemble();
    // The noise node's unconnected UV slot reads its mesh semantic source.
    assert!(text.contains("float2 p = IN.uv0 * 10;"));
    // The blend node's Base input is wired to the noise output variable.
    assert!(text.contains("blend1_Out.rgb = noise1_Out.rgb *"));
    Ok(())
}

#[test]
fn half_precision_programs_use_half_tokens_throughout() -> Result<()> {
    let mut graph = ShaderGraph::new();
    graph.add_node("noise1", noise::definition())?;
    graph.add_node("blend1", blend::definition())?;
    graph.connect(Endpoint::new("noise1", 3), Endpoint::new("blend1", 1))?;

    let text = graph.compile(Precision::Half)?.assemble();
    assert!(text.contains("half2 TilingGradientNoise_Dir_half(half2 p, half2 tiling)"));
    assert!(text.contains("half4 blend1_Out;"));
    assert!(!text.contains("float"));
    Ok(())
}

#[test]
fn reconfiguring_one_mode_reemits_only_that_node() -> Result<()> {
    let mut graph = ShaderGraph::new();
    graph.add_node("noise1", noise::definition())?;
    graph.add_node("blend1", blend::definition())?;
    graph.connect(Endpoint::new("noise1", 3), Endpoint::new("blend1", 0))?;
    graph.set_configuration("blend1", "Multiply")?;

    let first = graph.compile(Precision::Full)?;
    graph.set_configuration("blend1", "Darken")?;
    assert!(!graph.node("noise1").unwrap().is_dirty());
    assert!(graph.node("blend1").unwrap().is_dirty());

    let second = graph.compile(Precision::Full)?;
    // Upstream block is byte-identical (cache reuse); the blend block changed.
    assert_eq!(first.node_blocks[0], second.node_blocks[0]);
    assert!(second.node_blocks[1].1.contains("min("));
    Ok(())
}
