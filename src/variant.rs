//! Function variants and the configuration-tagged variant table.
//!
//! A node kind declares one [`FunctionVariant`] per configuration value,
//! collected into a [`NodeDefinition`] at definition time. Resolution is a
//! plain table lookup: the variant for a configuration is named
//! `<prefix>_<configuration>` and the table is checked for exhaustiveness
//! when it is built, so a missing variant surfaces while the definition is
//! constructed rather than in the middle of a compile.

use crate::error::CodegenError;
use crate::slot::{SlotDescriptor, SlotDirection, SlotId};

/// A shared helper routine a variant needs at emission time. Name and
/// source may both carry `$precision` tokens; they are resolved against the
/// active precision before the helper reaches the function registry.
#[derive(Clone, Debug, PartialEq)]
pub struct HelperFunction {
    pub name: String,
    pub source: String,
}

impl HelperFunction {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// One concrete, self-contained code template plus its slot descriptors.
#[derive(Clone, Debug)]
pub struct FunctionVariant {
    pub name: String,
    pub slots: Vec<SlotDescriptor>,
    pub body: String,
    pub helpers: Vec<HelperFunction>,
}

impl FunctionVariant {
    pub fn new(name: impl Into<String>, slots: Vec<SlotDescriptor>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots,
            body: body.into(),
            helpers: Vec::new(),
        }
    }

    pub fn with_helper(mut self, helper: HelperFunction) -> Self {
        self.helpers.push(helper);
        self
    }

    pub fn slot(&self, id: SlotId) -> Option<&SlotDescriptor> {
        self.slots.iter().find(|s| s.id == id)
    }

    pub fn input_slots(&self) -> impl Iterator<Item = &SlotDescriptor> {
        self.slots.iter().filter(|s| s.is_input())
    }

    pub fn output_slots(&self) -> impl Iterator<Item = &SlotDescriptor> {
        self.slots.iter().filter(|s| s.is_output())
    }
}

/// Tagged-variant table for one node kind: configuration value to function
/// variant, built and checked once at definition time.
#[derive(Clone, Debug)]
pub struct NodeDefinition {
    name: String,
    function_prefix: String,
    variants: Vec<(String, FunctionVariant)>,
}

impl NodeDefinition {
    pub fn builder(
        name: impl Into<String>,
        function_prefix: impl Into<String>,
    ) -> NodeDefinitionBuilder {
        NodeDefinitionBuilder {
            name: name.into(),
            function_prefix: function_prefix.into(),
            variants: Vec::new(),
            expected: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn function_prefix(&self) -> &str {
        &self.function_prefix
    }

    pub fn configurations(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().map(|(c, _)| c.as_str())
    }

    /// The configuration a freshly created node starts with (first declared).
    pub fn default_configuration(&self) -> &str {
        &self.variants[0].0
    }

    /// The active code-emitting function for a configuration value.
    ///
    /// Pure lookup with no caching; safe to call on every code generation
    /// request. Fails with [`CodegenError::ConfigurationResolution`] when
    /// the configuration has no variant, which indicates the variant table
    /// and the configuration enumeration went out of lock-step.
    pub fn resolve(&self, configuration: &str) -> Result<&FunctionVariant, CodegenError> {
        self.variants
            .iter()
            .find(|(c, _)| c == configuration)
            .map(|(_, v)| v)
            .ok_or_else(|| CodegenError::ConfigurationResolution {
                configuration: configuration.to_string(),
                expected_name: format!("{}_{}", self.function_prefix, configuration),
            })
    }

    /// Direction of a slot id, across all variants (slot ids are node-wide).
    pub fn slot_direction(&self, id: SlotId) -> Option<SlotDirection> {
        self.variants
            .iter()
            .find_map(|(_, v)| v.slot(id))
            .map(|s| s.direction)
    }

    pub(crate) fn slot_name(&self, id: SlotId) -> Option<&str> {
        self.variants
            .iter()
            .find_map(|(_, v)| v.slot(id))
            .map(|s| s.name.as_str())
    }
}

pub struct NodeDefinitionBuilder {
    name: String,
    function_prefix: String,
    variants: Vec<(String, FunctionVariant)>,
    expected: Option<Vec<String>>,
}

impl NodeDefinitionBuilder {
    /// Declare the variant for one configuration value. The variant's
    /// function name is derived from the table's prefix and the
    /// configuration value.
    pub fn variant(
        self,
        configuration: impl Into<String>,
        slots: Vec<SlotDescriptor>,
        body: impl Into<String>,
    ) -> Self {
        self.variant_with_helpers(configuration, slots, body, Vec::new())
    }

    pub fn variant_with_helpers(
        mut self,
        configuration: impl Into<String>,
        slots: Vec<SlotDescriptor>,
        body: impl Into<String>,
        helpers: Vec<HelperFunction>,
    ) -> Self {
        let configuration = configuration.into();
        let mut variant = FunctionVariant::new(
            format!("{}_{}", self.function_prefix, configuration),
            slots,
            body,
        );
        variant.helpers = helpers;
        self.variants.push((configuration, variant));
        self
    }

    /// Declare the full configuration set the table must cover; `build`
    /// then checks exhaustiveness in both directions.
    pub fn expect_configurations<I, S>(mut self, configurations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected = Some(configurations.into_iter().map(Into::into).collect());
        self
    }

    pub fn build(self) -> Result<NodeDefinition, CodegenError> {
        let invalid = |reason: String| CodegenError::InvalidDefinition {
            definition: self.name.clone(),
            reason,
        };

        if self.variants.is_empty() {
            return Err(invalid("definition declares no variants".to_string()));
        }

        for (i, (configuration, variant)) in self.variants.iter().enumerate() {
            if self.variants[..i].iter().any(|(c, _)| c == configuration) {
                return Err(invalid(format!(
                    "configuration `{configuration}` declared twice"
                )));
            }
            for (j, slot) in variant.slots.iter().enumerate() {
                if variant.slots[..j].iter().any(|s| s.id == slot.id) {
                    return Err(invalid(format!(
                        "variant `{}` declares slot id {} twice",
                        variant.name, slot.id
                    )));
                }
                if !(1..=4).contains(&slot.components) {
                    return Err(invalid(format!(
                        "variant `{}` slot `{}` has {} components (must be 1..=4)",
                        variant.name, slot.name, slot.components
                    )));
                }
                match slot.direction {
                    SlotDirection::Input if slot.default_value.is_none() => {
                        return Err(invalid(format!(
                            "variant `{}` input slot `{}` has no default value",
                            variant.name, slot.name
                        )));
                    }
                    SlotDirection::Output if slot.default_value.is_some() => {
                        return Err(invalid(format!(
                            "variant `{}` output slot `{}` must not carry a default value",
                            variant.name, slot.name
                        )));
                    }
                    _ => {}
                }
            }
        }

        if let Some(expected) = &self.expected {
            for configuration in expected {
                if !self.variants.iter().any(|(c, _)| c == configuration) {
                    return Err(invalid(format!(
                        "configuration `{configuration}` has no variant"
                    )));
                }
            }
            for (configuration, _) in &self.variants {
                if !expected.contains(configuration) {
                    return Err(invalid(format!(
                        "variant for `{configuration}` is not in the declared configuration set"
                    )));
                }
            }
        }

        Ok(NodeDefinition {
            name: self.name,
            function_prefix: self.function_prefix,
            variants: self.variants,
        })
    }
}
