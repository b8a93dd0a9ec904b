//! Node lifecycle: configuration, dirty tracking, change events.

use std::sync::Arc;

use crate::error::CodegenError;
use crate::variant::{FunctionVariant, NodeDefinition};

/// Emission state of a node. Every node starts `Dirty` so it emits at
/// least once; it returns to `Dirty` whenever its configuration changes,
/// an input is rebound, or the graph invalidates it explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    Clean,
    Dirty,
}

/// Change notification a node hands to its owning graph. The graph, not
/// the mutating call, is responsible for scheduling dependent re-emission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeEvent {
    ConfigurationChanged { node: String },
}

/// The addressable unit owning a configuration value and contributing one
/// code fragment per compile.
pub struct Node {
    id: String,
    definition: Arc<NodeDefinition>,
    configuration: String,
    state: NodeState,
    cached_block: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, definition: Arc<NodeDefinition>) -> Self {
        let configuration = definition.default_configuration().to_string();
        Self {
            id: id.into(),
            definition,
            configuration,
            state: NodeState::Dirty,
            cached_block: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn definition(&self) -> &Arc<NodeDefinition> {
        &self.definition
    }

    pub fn configuration(&self) -> &str {
        &self.configuration
    }

    pub fn state(&self) -> NodeState {
        self.state
    }

    pub fn is_dirty(&self) -> bool {
        self.state == NodeState::Dirty
    }

    /// Set the configuration value. Returns the event the owning graph must
    /// consume when the value actually changed; setting the current value
    /// is a no-op. The value is not validated here — an unknown value
    /// surfaces as `ConfigurationResolution` at the next compile.
    pub fn set_configuration(&mut self, value: impl Into<String>) -> Option<NodeEvent> {
        let value = value.into();
        if self.configuration == value {
            return None;
        }
        self.configuration = value;
        Some(NodeEvent::ConfigurationChanged {
            node: self.id.clone(),
        })
    }

    /// The active variant for the current configuration.
    pub fn resolve(&self) -> Result<&FunctionVariant, CodegenError> {
        self.definition.resolve(&self.configuration)
    }

    pub(crate) fn cached_block(&self) -> Option<&str> {
        self.cached_block.as_deref()
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.state = NodeState::Dirty;
        self.cached_block = None;
    }

    pub(crate) fn mark_clean(&mut self, block: String) {
        self.state = NodeState::Clean;
        self.cached_block = Some(block);
    }
}
