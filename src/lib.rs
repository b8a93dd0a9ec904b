//! Shader graph node code generation core.
//!
//! Converts declaratively-described graph nodes into fragments of a target
//! shading language. The pipeline is organized into several modules:
//! - `slot`: slot descriptors binding function parameters to graph ports
//! - `precision`: abstract numeric types to concrete type tokens
//! - `variant`: function variants and the configuration-tagged variant table
//! - `template`: placeholder substitution over body templates
//! - `registry`: per-compile deduplication of shared helper functions
//! - `emitter`: rendering a resolved variant into shader text
//! - `node` / `graph`: node lifecycle, dirty propagation, and the compile pass
//! - `nodes`: concrete node definitions (blend color, tiling gradient noise)
//!
//! The main entry point is [`ShaderGraph::compile`], which walks the graph
//! in dependency order and produces a [`CompiledProgram`].

pub mod emitter;
pub mod error;
pub mod graph;
pub mod node;
pub mod nodes;
pub mod precision;
pub mod registry;
pub mod slot;
pub mod template;
pub mod util;
pub mod variant;

pub use emitter::SlotBindings;
pub use error::CodegenError;
pub use graph::{CompiledProgram, Edge, Endpoint, ShaderGraph};
pub use node::{Node, NodeEvent, NodeState};
pub use precision::Precision;
pub use registry::FunctionRegistry;
pub use slot::{BindingSource, SlotDescriptor, SlotDirection, SlotId};
pub use variant::{FunctionVariant, HelperFunction, NodeDefinition, NodeDefinitionBuilder};
