//! Placeholder substitution over body templates.
//!
//! Token grammar (kept bit-exact with the existing template corpus):
//! - `$precision` becomes the scalar type token of the active precision
//!   (`float` / `half`). Plain substring substitution, so `$precision2`
//!   yields `float2` and `Noise_Dir_$precision` yields `Noise_Dir_float`.
//! - `{slot<id>dimension}` becomes the component-count token (`1`..`4`) of
//!   the slot with that id, commonly directly after `$precision`.
//! - Bare slot names are rewritten to their bound variable identifiers,
//!   whole identifiers only.
//!
//! The substitutions are purely textual; nothing here validates the
//! resulting shader syntax.

use std::collections::HashMap;

use crate::error::CodegenError;
use crate::precision::Precision;
use crate::slot::{SlotDescriptor, SlotId};

pub fn substitute_precision(text: &str, precision: Precision) -> String {
    text.replace("$precision", precision.scalar_token())
}

/// Replace every `{slot<id>dimension}` token with the component-count token
/// of the matching slot. A token naming a slot the variant does not declare
/// is a template-authoring error and fails with [`CodegenError::SlotBinding`].
pub fn substitute_dimensions(
    text: &str,
    function: &str,
    slots: &[SlotDescriptor],
    precision: Precision,
) -> Result<String, CodegenError> {
    const OPEN: &str = "{slot";
    const CLOSE: &str = "dimension}";

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(OPEN) {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + OPEN.len()..];
        let digits = after.chars().take_while(|c| c.is_ascii_digit()).count();
        if digits > 0
            && after[digits..].starts_with(CLOSE)
            && let Ok(id) = after[..digits].parse::<SlotId>()
        {
            let slot = slots
                .iter()
                .find(|s| s.id == id)
                .ok_or_else(|| CodegenError::SlotBinding {
                    function: function.to_string(),
                    slot: id,
                })?;
            out.push_str(dimension_token(slot.components, precision)?);
            rest = &after[digits + CLOSE.len()..];
        } else {
            // A plain shader-code brace, not a token.
            out.push_str(OPEN);
            rest = after;
        }
    }
    out.push_str(rest);
    Ok(out)
}

/// Rewrite whole identifiers according to `rename`, leaving everything else
/// untouched. Member accesses after `.` are never rewritten, so a slot named
/// `Out` rewrites in `Out.rgb` but not in `foo.Out` or `zeroOrOne`.
pub fn substitute_identifiers(text: &str, rename: &HashMap<&str, &str>) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    let mut span_start = 0;
    while i < bytes.len() {
        let b = bytes[i];
        if b.is_ascii_alphabetic() || b == b'_' {
            // Identifier start bytes are ASCII, so the span boundary is
            // always a char boundary even around multibyte text.
            out.push_str(&text[span_start..i]);
            let prev = if i > 0 { bytes[i - 1] } else { 0 };
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            let ident = &text[start..i];
            match rename.get(ident) {
                Some(replacement) if prev != b'.' => out.push_str(replacement),
                _ => out.push_str(ident),
            }
            span_start = i;
        } else {
            i += 1;
        }
    }
    out.push_str(&text[span_start..]);
    out
}

fn dimension_token(components: u8, precision: Precision) -> Result<&'static str, CodegenError> {
    match components {
        1 => Ok("1"),
        2 => Ok("2"),
        3 => Ok("3"),
        4 => Ok("4"),
        _ => Err(CodegenError::UnsupportedPrecision {
            components,
            precision,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::SlotDescriptor;

    fn slots() -> Vec<SlotDescriptor> {
        vec![
            SlotDescriptor::input(0, "Base", 4),
            SlotDescriptor::output(2, "Out", 4),
            SlotDescriptor::input(3, "Opacity", 1),
        ]
    }

    #[test]
    fn precision_token_is_substring_substitution() {
        assert_eq!(
            substitute_precision("$precision2 p = UV;", Precision::Full),
            "float2 p = UV;"
        );
        assert_eq!(
            substitute_precision("Noise_Dir_$precision", Precision::Half),
            "Noise_Dir_half"
        );
    }

    #[test]
    fn dimension_token_resolves_against_slot_arity() {
        let text = "$precision{slot2dimension} r = x; $precision{slot3dimension} o = y;";
        let out = substitute_dimensions(text, "f", &slots(), Precision::Full).unwrap();
        assert_eq!(out, "$precision4 r = x; $precision1 o = y;");
    }

    #[test]
    fn plain_braces_pass_through() {
        let text = "{\n    Out = {slotty};\n}";
        let out = substitute_dimensions(text, "f", &slots(), Precision::Full).unwrap();
        assert_eq!(out, text);
    }

    #[test]
    fn unknown_slot_in_dimension_token_is_an_authoring_error() {
        let err = substitute_dimensions("{slot9dimension}", "f", &slots(), Precision::Full)
            .unwrap_err();
        assert!(matches!(err, CodegenError::SlotBinding { slot: 9, .. }));
    }

    #[test]
    fn identifiers_rewrite_whole_words_only() {
        let rename = HashMap::from([("Out", "n1_Out"), ("Base", "n0_Out")]);
        let text = "Out.rgb = Base.rgb; zeroOrOne = OutPut + s.Out;";
        assert_eq!(
            substitute_identifiers(text, &rename),
            "n1_Out.rgb = n0_Out.rgb; zeroOrOne = OutPut + s.Out;"
        );
    }

    #[test]
    fn non_ascii_text_outside_identifiers_survives_unchanged() {
        let rename = HashMap::from([("Out", "n_Out")]);
        let text = "// café gradient, für später\nOut = 1.0;";
        assert_eq!(
            substitute_identifiers(text, &rename),
            "// café gradient, für später\nn_Out = 1.0;"
        );
    }
}
