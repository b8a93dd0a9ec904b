//! The owning graph: connectivity, dirty propagation, and the compile pass.
//!
//! One compile pass walks the nodes in dependency order, resolves each
//! node's active variant, emits its block, and collects shared helpers in
//! a pass-local [`FunctionRegistry`]. The pass is single-threaded and
//! synchronous; concurrent compiles each own their registry instance. A
//! failed pass aborts cleanly: no node state is committed and no partial
//! program is observable.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;

use crate::emitter::{self, SlotBindings};
use crate::error::CodegenError;
use crate::node::{Node, NodeEvent};
use crate::precision::Precision;
use crate::registry::FunctionRegistry;
use crate::slot::{BindingSource, SlotDirection, SlotId};
use crate::util::sanitize_ident;
use crate::variant::NodeDefinition;

/// One end of an edge: a node id plus the slot id on that node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Endpoint {
    pub node: String,
    pub slot: SlotId,
}

impl Endpoint {
    pub fn new(node: impl Into<String>, slot: SlotId) -> Self {
        Self {
            node: node.into(),
            slot,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Edge {
    pub from: Endpoint,
    pub to: Endpoint,
}

/// The compiled program: deduplicated helper block plus one emitted block
/// per node, in dependency order. Final concatenation into a full shader
/// is the downstream pipeline's job; [`CompiledProgram::assemble`] is the
/// reference layout (helpers ahead of all bodies).
#[derive(Clone, Debug)]
pub struct CompiledProgram {
    /// Helper functions in first-registration order.
    pub functions: String,
    /// `(node id, emitted block)` in dependency order.
    pub node_blocks: Vec<(String, String)>,
}

impl CompiledProgram {
    pub fn assemble(&self) -> String {
        let mut out = String::new();
        if !self.functions.is_empty() {
            out.push_str(&self.functions);
            out.push('\n');
        }
        for (_, block) in &self.node_blocks {
            out.push_str(block);
        }
        out
    }
}

#[derive(Default)]
pub struct ShaderGraph {
    nodes: Vec<Node>,
    index: HashMap<String, usize>,
    edges: Vec<Edge>,
    last_precision: Option<Precision>,
}

impl ShaderGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(
        &mut self,
        id: impl Into<String>,
        definition: Arc<NodeDefinition>,
    ) -> Result<(), CodegenError> {
        let id = id.into();
        if self.index.contains_key(&id) {
            return Err(CodegenError::DuplicateNode(id));
        }
        // Output variables embed the sanitized id, so two ids that
        // sanitize to the same identifier would emit colliding variables.
        let ident = sanitize_ident(&id);
        if self.nodes.iter().any(|n| sanitize_ident(n.id()) == ident) {
            return Err(CodegenError::DuplicateNode(id));
        }
        self.index.insert(id.clone(), self.nodes.len());
        self.nodes.push(Node::new(id, definition));
        Ok(())
    }

    /// Remove a node and every edge touching one of its slots. Former
    /// consumers fall back to their slot defaults and must re-emit.
    pub fn remove_node(&mut self, id: &str) -> Result<(), CodegenError> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| CodegenError::UnknownNode(id.to_string()))?;
        self.mark_dirty_from(id);
        self.edges.retain(|e| e.from.node != id && e.to.node != id);
        self.nodes.remove(idx);
        self.index.clear();
        for (i, node) in self.nodes.iter().enumerate() {
            self.index.insert(node.id().to_string(), i);
        }
        Ok(())
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Connect an output slot to an input slot. An input accepts one edge;
    /// connecting over an existing edge replaces it. The consumer and its
    /// dependents are marked for re-emission.
    pub fn connect(&mut self, from: Endpoint, to: Endpoint) -> Result<(), CodegenError> {
        self.check_endpoint(&from, SlotDirection::Output)?;
        self.check_endpoint(&to, SlotDirection::Input)?;
        let to_node = to.node.clone();
        self.edges.retain(|e| e.to != to);
        self.edges.push(Edge { from, to });
        self.mark_dirty_from(&to_node);
        Ok(())
    }

    /// Remove the edge feeding an input slot, if any.
    pub fn disconnect(&mut self, node: &str, slot: SlotId) -> Result<(), CodegenError> {
        if !self.index.contains_key(node) {
            return Err(CodegenError::UnknownNode(node.to_string()));
        }
        let before = self.edges.len();
        self.edges
            .retain(|e| !(e.to.node == node && e.to.slot == slot));
        if self.edges.len() != before {
            self.mark_dirty_from(node);
        }
        Ok(())
    }

    /// Change a node's configuration value and consume the resulting event.
    pub fn set_configuration(
        &mut self,
        id: &str,
        value: impl Into<String>,
    ) -> Result<(), CodegenError> {
        let idx = *self
            .index
            .get(id)
            .ok_or_else(|| CodegenError::UnknownNode(id.to_string()))?;
        if let Some(event) = self.nodes[idx].set_configuration(value) {
            self.handle_event(event)?;
        }
        Ok(())
    }

    /// Consume a node change notification: the named node and everything
    /// downstream of its outputs re-emit on the next compile.
    pub fn handle_event(&mut self, event: NodeEvent) -> Result<(), CodegenError> {
        match event {
            NodeEvent::ConfigurationChanged { node } => {
                if !self.index.contains_key(&node) {
                    return Err(CodegenError::UnknownNode(node));
                }
                log::debug!("node `{node}`: configuration changed, invalidating dependents");
                self.mark_dirty_from(&node);
                Ok(())
            }
        }
    }

    /// Explicit invalidation of a node and its dependents.
    pub fn invalidate(&mut self, id: &str) -> Result<(), CodegenError> {
        if !self.index.contains_key(id) {
            return Err(CodegenError::UnknownNode(id.to_string()));
        }
        self.mark_dirty_from(id);
        Ok(())
    }

    /// Compile the whole graph at the given precision.
    pub fn compile(&mut self, precision: Precision) -> Result<CompiledProgram, CodegenError> {
        // Cached blocks bake in concrete type tokens; a precision switch
        // invalidates everything.
        if self.last_precision != Some(precision) {
            for node in &mut self.nodes {
                node.mark_dirty();
            }
        }

        let order = self.topo_order()?;
        let mut registry = FunctionRegistry::new();

        let mut incoming: HashMap<(usize, SlotId), &Edge> = HashMap::new();
        for edge in &self.edges {
            incoming.insert((self.index[&edge.to.node], edge.to.slot), edge);
        }

        let mut results: Vec<(usize, String)> = Vec::with_capacity(order.len());
        for idx in order {
            let node = &self.nodes[idx];
            let variant = node.resolve()?;
            // Helpers live in the pass-local registry, so they are
            // re-registered even for nodes whose body block is cached.
            emitter::register_helpers(variant, precision, &mut registry)?;

            if let Some(block) = node.cached_block() {
                log::debug!("node `{}`: clean, reusing cached block", node.id());
                results.push((idx, block.to_string()));
                continue;
            }

            log::debug!("node `{}`: emitting `{}`", node.id(), variant.name);
            let mut bindings = SlotBindings::new();
            let mut declarations = String::new();
            for slot in &variant.slots {
                let var = match slot.direction {
                    SlotDirection::Output => {
                        let var = output_var(node.id(), &slot.name);
                        declarations.push_str(&format!(
                            "{} {};\n",
                            precision.concrete_type(slot.components)?,
                            var
                        ));
                        var
                    }
                    SlotDirection::Input => {
                        if let Some(edge) = incoming.get(&(idx, slot.id)) {
                            let upstream = &self.nodes[self.index[&edge.from.node]];
                            let name = upstream
                                .definition()
                                .slot_name(edge.from.slot)
                                .ok_or_else(|| CodegenError::UnknownSlot {
                                    node: edge.from.node.clone(),
                                    slot: edge.from.slot,
                                })?;
                            output_var(upstream.id(), name)
                        } else {
                            match slot.binding {
                                BindingSource::MeshUv(channel) => format!("IN.uv{channel}"),
                                BindingSource::None => slot.default_literal(precision)?,
                            }
                        }
                    }
                };
                bindings.insert(slot.id, var);
            }

            let body = emitter::emit(variant, &bindings, precision, &mut registry)?;
            let mut block = declarations;
            block.push_str(&body);
            if !block.ends_with('\n') {
                block.push('\n');
            }
            results.push((idx, block));
        }

        // Commit only now that the whole pass succeeded.
        let functions = registry.collect();
        let mut node_blocks = Vec::with_capacity(results.len());
        for (idx, block) in results {
            node_blocks.push((self.nodes[idx].id().to_string(), block.clone()));
            self.nodes[idx].mark_clean(block);
        }
        self.last_precision = Some(precision);
        Ok(CompiledProgram {
            functions,
            node_blocks,
        })
    }

    fn check_endpoint(
        &self,
        endpoint: &Endpoint,
        expected: SlotDirection,
    ) -> Result<(), CodegenError> {
        let idx = self
            .index
            .get(&endpoint.node)
            .ok_or_else(|| CodegenError::UnknownNode(endpoint.node.clone()))?;
        match self.nodes[*idx].definition().slot_direction(endpoint.slot) {
            None => Err(CodegenError::UnknownSlot {
                node: endpoint.node.clone(),
                slot: endpoint.slot,
            }),
            Some(direction) if direction != expected => Err(CodegenError::SlotDirection {
                node: endpoint.node.clone(),
                slot: endpoint.slot,
                expected: match expected {
                    SlotDirection::Output => "output",
                    SlotDirection::Input => "input",
                },
            }),
            Some(_) => Ok(()),
        }
    }

    /// Mark `start` and every transitively downstream consumer dirty.
    fn mark_dirty_from(&mut self, start: &str) {
        let dirty: Vec<usize> = {
            let mut downstream: HashMap<&str, Vec<&str>> = HashMap::new();
            for edge in &self.edges {
                downstream
                    .entry(edge.from.node.as_str())
                    .or_default()
                    .push(edge.to.node.as_str());
            }
            let mut visited: HashSet<&str> = HashSet::new();
            let mut stack: Vec<&str> = vec![start];
            while let Some(n) = stack.pop() {
                if !visited.insert(n) {
                    continue;
                }
                if let Some(nexts) = downstream.get(n) {
                    stack.extend(nexts.iter().copied());
                }
            }
            visited
                .into_iter()
                .filter_map(|n| self.index.get(n).copied())
                .collect()
        };
        for idx in dirty {
            self.nodes[idx].mark_dirty();
        }
    }

    fn topo_order(&self) -> Result<Vec<usize>, CodegenError> {
        let mut indeg = vec![0usize; self.nodes.len()];
        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); self.nodes.len()];
        for edge in &self.edges {
            let from = self.index[&edge.from.node];
            let to = self.index[&edge.to.node];
            indeg[to] += 1;
            outgoing[from].push(to);
        }

        // Seeding the queue in node insertion order keeps the emitted
        // program order deterministic across compiles.
        let mut queue: VecDeque<usize> = (0..self.nodes.len()).filter(|&i| indeg[i] == 0).collect();
        let mut order: Vec<usize> = Vec::with_capacity(self.nodes.len());
        while let Some(n) = queue.pop_front() {
            order.push(n);
            for &m in &outgoing[n] {
                indeg[m] -= 1;
                if indeg[m] == 0 {
                    queue.push_back(m);
                }
            }
        }

        if order.len() != self.nodes.len() {
            return Err(CodegenError::Cycle);
        }
        Ok(order)
    }
}

fn output_var(node_id: &str, slot_name: &str) -> String {
    format!("{}_{}", sanitize_ident(node_id), slot_name)
}
