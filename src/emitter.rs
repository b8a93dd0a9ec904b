//! Rendering a resolved function variant into shader text.

use std::collections::HashMap;

use crate::error::CodegenError;
use crate::precision::Precision;
use crate::registry::FunctionRegistry;
use crate::slot::SlotId;
use crate::template;
use crate::variant::FunctionVariant;

/// Variable name bound to each slot id, supplied by the graph compiler.
pub type SlotBindings = HashMap<SlotId, String>;

/// Render `variant`'s body with every placeholder substituted and every
/// slot reference rewritten to its bound variable.
///
/// Deterministic for identical inputs; performs no validation of the
/// resulting shader syntax. As a side effect, the variant's shared helpers
/// are registered through `registry` (with `$precision` resolved in both
/// key and source) rather than inlined per call site.
pub fn emit(
    variant: &FunctionVariant,
    bindings: &SlotBindings,
    precision: Precision,
    registry: &mut FunctionRegistry,
) -> Result<String, CodegenError> {
    for slot in &variant.slots {
        if !bindings.contains_key(&slot.id) {
            return Err(CodegenError::SlotBinding {
                function: variant.name.clone(),
                slot: slot.id,
            });
        }
    }

    register_helpers(variant, precision, registry)?;

    let text = template::substitute_dimensions(&variant.body, &variant.name, &variant.slots, precision)?;
    let text = template::substitute_precision(&text, precision);

    let rename: HashMap<&str, &str> = variant
        .slots
        .iter()
        .map(|slot| (slot.name.as_str(), bindings[&slot.id].as_str()))
        .collect();
    Ok(template::substitute_identifiers(&text, &rename))
}

/// Register the variant's shared helpers without emitting its body. The
/// compile pass uses this for nodes whose cached body is still valid, since
/// the registry is rebuilt from scratch every pass.
pub fn register_helpers(
    variant: &FunctionVariant,
    precision: Precision,
    registry: &mut FunctionRegistry,
) -> Result<(), CodegenError> {
    for helper in &variant.helpers {
        let key = template::substitute_precision(&helper.name, precision);
        let source = template::substitute_precision(&helper.source, precision);
        registry.provide(&key, |s| s.push_str(&source))?;
    }
    Ok(())
}
