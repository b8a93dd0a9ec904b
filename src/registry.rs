//! Per-compile deduplication of shared helper functions.

use std::collections::HashMap;

use crate::error::CodegenError;

/// Deduplication table for helper routines shared across node emissions.
///
/// One instance lives for exactly one compile pass: the pass constructs it,
/// threads it through every emission, collects it, and discards it. It is
/// never shared across passes, so no synchronization is involved.
///
/// Registered sources are kept in first-registration order and collected
/// into a single block that the assembled program places ahead of all node
/// bodies, which keeps every helper syntactically available to its callers.
#[derive(Default)]
pub struct FunctionRegistry {
    order: Vec<String>,
    sources: HashMap<String, String>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `key`, running `generate` to produce its source on first
    /// registration. Later registrations under the same key contribute
    /// nothing to the output.
    ///
    /// Generators must be pure: a repeated registration re-runs the
    /// generator into a scratch buffer and rejects the registration with
    /// [`CodegenError::DuplicateRegistration`] if the produced text differs
    /// from what the key already holds.
    pub fn provide(
        &mut self,
        key: &str,
        generate: impl FnOnce(&mut String),
    ) -> Result<(), CodegenError> {
        if let Some(existing) = self.sources.get(key) {
            let mut scratch = String::new();
            generate(&mut scratch);
            if scratch != *existing {
                return Err(CodegenError::DuplicateRegistration {
                    key: key.to_string(),
                });
            }
            return Ok(());
        }
        let mut source = String::new();
        generate(&mut source);
        log::trace!("registry: providing function `{key}`");
        self.order.push(key.to_string());
        self.sources.insert(key.to_string(), source);
        Ok(())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.sources.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All registered sources concatenated in first-registration order.
    pub fn collect(&self) -> String {
        let mut out = String::new();
        for key in &self.order {
            let source = &self.sources[key];
            out.push_str(source);
            if !source.ends_with('\n') {
                out.push('\n');
            }
        }
        out
    }
}
