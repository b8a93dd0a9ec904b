//! Error taxonomy for the code generation core.
//!
//! Every variant here is fatal to the compile pass it occurs in: the pass
//! aborts with no partial output and no node state committed. None of these
//! are expected during ordinary editing; they indicate an authoring defect
//! in a node definition or a malformed graph.

use thiserror::Error;

use crate::precision::Precision;

#[derive(Debug, Error)]
pub enum CodegenError {
    /// A configuration value has no matching function variant. The variant
    /// table and the configuration enumeration went out of lock-step.
    #[error(
        "no function variant for configuration `{configuration}` (expected `{expected_name}`)"
    )]
    ConfigurationResolution {
        configuration: String,
        expected_name: String,
    },

    /// The requested precision/arity pair has no concrete type token.
    #[error("no concrete type for a {components}-component value at {precision} precision")]
    UnsupportedPrecision { components: u8, precision: Precision },

    /// A function variant references a slot id with no bound variable.
    #[error("function `{function}`: slot {slot} has no bound variable")]
    SlotBinding { function: String, slot: u32 },

    /// Two differing sources were registered under one registry key.
    #[error("conflicting sources registered under function registry key `{key}`")]
    DuplicateRegistration { key: String },

    /// A node definition failed its construction-time checks.
    #[error("invalid definition for node kind `{definition}`: {reason}")]
    InvalidDefinition { definition: String, reason: String },

    #[error("unknown node `{0}`")]
    UnknownNode(String),

    #[error("node id `{0}` is already taken")]
    DuplicateNode(String),

    #[error("node `{node}` declares no slot with id {slot}")]
    UnknownSlot { node: String, slot: u32 },

    #[error("slot {slot} on node `{node}` is not an {expected} slot")]
    SlotDirection {
        node: String,
        slot: u32,
        expected: &'static str,
    },

    #[error("cycle detected in graph (cannot topologically sort)")]
    Cycle,
}
